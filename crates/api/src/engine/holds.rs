//! Hold engine: atomically reserve stock and create a time-bounded hold.
//!
//! Locking the product row serializes all stock decrements for that
//! product, which closes the check-then-decrement race between concurrent
//! buyers. The hold is the unit of reservation: once it exists, the buyer
//! can complete payment without racing other buyers for the same units.

use sqlx::PgPool;
use surgecart_core::clock::Clock;
use surgecart_core::error::CoreError;
use surgecart_core::types::{DbId, Timestamp};
use surgecart_db::models::hold::CreateHold;
use surgecart_db::repositories::{HoldRepo, ProductRepo};

use crate::config::ServerConfig;
use crate::engine::{backoff_delay, begin_with_lock_timeout, map_db_err};

/// Result of a successful hold creation.
#[derive(Debug)]
pub struct CreatedHold {
    pub hold_id: DbId,
    pub expires_at: Timestamp,
}

/// Reserve `qty` units of a product and create an active hold expiring at
/// `now + HOLD_TTL`.
pub async fn create_hold(
    pool: &PgPool,
    clock: &dyn Clock,
    config: &ServerConfig,
    input: &CreateHold,
) -> Result<CreatedHold, CoreError> {
    if input.qty < 1 {
        return Err(CoreError::Validation {
            field: "qty",
            message: format!("qty must be at least 1, got {}", input.qty),
        });
    }

    let mut attempt = 1;
    loop {
        match try_create_hold(pool, clock, config, input).await {
            Err(err) if err.is_transient() && attempt < config.tx_retry_attempts => {
                tracing::warn!(attempt, error = %err, "create_hold retrying after transient conflict");
                tokio::time::sleep(backoff_delay(attempt)).await;
                attempt += 1;
            }
            other => return other,
        }
    }
}

async fn try_create_hold(
    pool: &PgPool,
    clock: &dyn Clock,
    config: &ServerConfig,
    input: &CreateHold,
) -> Result<CreatedHold, CoreError> {
    let mut tx = begin_with_lock_timeout(pool, config.lock_timeout_ms).await?;

    let product = ProductRepo::find_for_update(&mut *tx, input.product_id)
        .await
        .map_err(|e| map_db_err("locking product", e))?
        .ok_or_else(|| CoreError::Validation {
            field: "product_id",
            message: format!("product {} does not exist", input.product_id),
        })?;

    if product.available_stock < input.qty {
        return Err(CoreError::InsufficientStock {
            product_id: product.id,
            requested: input.qty,
            available: product.available_stock,
        });
    }

    ProductRepo::adjust_available(&mut *tx, product.id, -input.qty)
        .await
        .map_err(|e| map_db_err("reserving stock", e))?;

    let expires_at = clock.now() + chrono::Duration::seconds(config.hold_ttl_secs as i64);
    let hold = HoldRepo::insert_active(&mut *tx, product.id, input.qty, expires_at)
        .await
        .map_err(|e| map_db_err("inserting hold", e))?;

    tx.commit()
        .await
        .map_err(|e| map_db_err("committing hold", e))?;

    tracing::info!(
        hold_id = hold.id,
        product_id = product.id,
        qty = hold.qty,
        expires_at = %hold.expires_at,
        "hold_created"
    );

    Ok(CreatedHold {
        hold_id: hold.id,
        expires_at: hold.expires_at,
    })
}
