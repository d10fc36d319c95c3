//! Periodic expiry reaper for abandoned holds.
//!
//! Scans active holds whose `expires_at` has passed and returns their
//! quantity to available stock. Runs on a fixed interval using
//! `tokio::time::interval` until the cancellation token fires.
//!
//! A Postgres advisory lock makes the sweep single-flight across processes.
//! Correctness does not depend on it (every candidate is re-checked under
//! its row lock), but duplicate sweeps are wasted work.

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use surgecart_core::clock::Clock;
use surgecart_db::models::status::HoldStatus;
use surgecart_db::repositories::{HoldRepo, ProductRepo};
use tokio_util::sync::CancellationToken;

/// Advisory lock key identifying the reaper across all server processes.
const REAPER_LOCK_KEY: i64 = 7_430_101;

/// Run the hold reaper loop until `cancel` is triggered.
pub async fn run(
    pool: PgPool,
    clock: Arc<dyn Clock>,
    interval_secs: u64,
    page_size: i64,
    cancel: CancellationToken,
) {
    tracing::info!(interval_secs, page_size, "Hold reaper started");

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Hold reaper stopping");
                break;
            }
            _ = interval.tick() => {
                match sweep(&pool, clock.as_ref(), page_size).await {
                    Ok(expired) => {
                        if expired > 0 {
                            tracing::info!(expired, "Hold reaper: returned stock from expired holds");
                        } else {
                            tracing::debug!("Hold reaper: nothing to expire");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Hold reaper: sweep failed");
                    }
                }
            }
        }
    }
}

/// One reaper pass. Returns the number of holds expired.
///
/// Skips entirely (returning 0) when another process holds the advisory
/// lock.
pub async fn sweep(pool: &PgPool, clock: &dyn Clock, page_size: i64) -> Result<u64, sqlx::Error> {
    // Advisory locks are session-scoped: hold the connection for the whole
    // sweep and unlock on the same session.
    let mut lock_conn = pool.acquire().await?;
    let acquired: bool = sqlx::query_scalar("SELECT pg_try_advisory_lock($1)")
        .bind(REAPER_LOCK_KEY)
        .fetch_one(&mut *lock_conn)
        .await?;
    if !acquired {
        tracing::debug!("Hold reaper: another instance is sweeping, skipping");
        return Ok(0);
    }

    let result = sweep_pages(pool, clock, page_size).await;

    let unlock = sqlx::query("SELECT pg_advisory_unlock($1)")
        .bind(REAPER_LOCK_KEY)
        .execute(&mut *lock_conn)
        .await;
    if let Err(e) = unlock {
        tracing::warn!(error = %e, "Hold reaper: failed to release advisory lock");
    }

    result
}

async fn sweep_pages(pool: &PgPool, clock: &dyn Clock, page_size: i64) -> Result<u64, sqlx::Error> {
    let mut total_expired = 0u64;

    loop {
        let candidates = HoldRepo::list_expired_active_ids(pool, clock.now(), page_size).await?;
        if candidates.is_empty() {
            break;
        }

        let page_len = candidates.len();
        let mut expired_in_page = 0u64;
        for hold_id in candidates {
            match expire_one(pool, clock, hold_id).await {
                Ok(true) => expired_in_page += 1,
                Ok(false) => {} // another actor won the race
                Err(e) => {
                    tracing::error!(hold_id, error = %e, "Hold reaper: failed to expire hold");
                }
            }
        }
        total_expired += expired_in_page;

        // A page that made no progress would be re-selected verbatim; stop
        // and let the next tick retry.
        if expired_in_page == 0 || (page_len as i64) < page_size {
            break;
        }
    }

    Ok(total_expired)
}

/// Expire a single hold in a fresh transaction.
///
/// Returns `Ok(false)` when the hold was consumed, expired, or cancelled
/// between the scan and the row lock.
async fn expire_one(pool: &PgPool, clock: &dyn Clock, hold_id: i64) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let Some(hold) = HoldRepo::find_for_update(&mut *tx, hold_id).await? else {
        return Ok(false);
    };
    // Re-check under the row lock: the hold may have been used or already
    // expired since the scan.
    if hold.status_id != HoldStatus::Active.id() || hold.expires_at > clock.now() {
        return Ok(false);
    }

    ProductRepo::find_for_update(&mut *tx, hold.product_id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;
    ProductRepo::adjust_available(&mut *tx, hold.product_id, hold.qty).await?;
    HoldRepo::set_status(&mut *tx, hold.id, HoldStatus::Expired.id()).await?;

    tx.commit().await?;

    tracing::info!(
        hold_id = hold.id,
        product_id = hold.product_id,
        qty = hold.qty,
        "hold_expired"
    );

    Ok(true)
}
