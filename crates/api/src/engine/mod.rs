//! Transactional checkout engines.
//!
//! Each engine entrypoint maps one ingress call to exactly one database
//! transaction. Row-level `SELECT ... FOR UPDATE` locks serialize stock
//! movements per product and webhook processing per order; transient
//! conflicts (deadlock, lock timeout, idempotency-key races) are retried a
//! bounded number of times before surfacing to the caller.

use std::time::Duration;

use sqlx::{PgPool, Postgres, Transaction};
use surgecart_core::error::CoreError;

pub mod holds;
pub mod orders;
pub mod webhooks;

/// Base delay for transient-conflict retries; doubles per attempt.
const RETRY_BASE_DELAY: Duration = Duration::from_millis(50);

/// Ceiling for the retry backoff.
const RETRY_MAX_DELAY: Duration = Duration::from_secs(1);

/// Open a transaction with the configured row-lock wait bound.
///
/// `SET LOCAL` scopes the timeout to this transaction; a lock wait that
/// exceeds it fails with SQLSTATE 55P03, which classifies as transient.
pub(crate) async fn begin_with_lock_timeout(
    pool: &PgPool,
    lock_timeout_ms: u64,
) -> Result<Transaction<'static, Postgres>, CoreError> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| map_db_err("beginning transaction", e))?;
    // SET does not take bind parameters; the value is a config integer.
    sqlx::query(&format!("SET LOCAL lock_timeout = {lock_timeout_ms}"))
        .execute(&mut *tx)
        .await
        .map_err(|e| map_db_err("setting lock timeout", e))?;
    Ok(tx)
}

/// Classify a database error from inside an engine transaction.
///
/// Serialization failures (40001), deadlocks (40P01), and lock timeouts
/// (55P03) become [`CoreError::TransientConflict`] so the entrypoint retry
/// loop picks them up. Everything else is unexpected and surfaces as
/// internal.
pub(crate) fn map_db_err(context: &'static str, err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if matches!(
            db_err.code().as_deref(),
            Some("40001") | Some("40P01") | Some("55P03")
        ) {
            return CoreError::TransientConflict(format!("{context}: {db_err}"));
        }
    }
    tracing::error!(context, error = %err, "Unexpected database error");
    CoreError::Internal(format!("{context}: {err}"))
}

/// Whether `err` is a unique violation on the named constraint.
pub(crate) fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err)
            if db_err.code().as_deref() == Some("23505")
                && db_err.constraint() == Some(constraint)
    )
}

/// Exponential backoff delay before retry `attempt` (1-based).
pub(crate) fn backoff_delay(attempt: u32) -> Duration {
    let exp = attempt.saturating_sub(1).min(10);
    let delay = RETRY_BASE_DELAY * 2u32.pow(exp);
    delay.min(RETRY_MAX_DELAY)
}
