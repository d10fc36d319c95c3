//! Order engine: convert a valid active hold into a pending order.
//!
//! Stock is not touched here; the hold already owns it. The order captures
//! `amount_cents` from the product's current price at creation time.

use sqlx::PgPool;
use surgecart_core::clock::Clock;
use surgecart_core::error::CoreError;
use surgecart_core::lifecycle::hold_machine;
use surgecart_core::types::DbId;
use surgecart_db::models::order::PlaceOrder;
use surgecart_db::models::status::{HoldStatus, OrderStatus};
use surgecart_db::repositories::{HoldRepo, OrderRepo, ProductRepo};

use crate::config::ServerConfig;
use crate::engine::{backoff_delay, begin_with_lock_timeout, is_unique_violation, map_db_err};

/// Result of a successful order placement.
#[derive(Debug)]
pub struct PlacedOrder {
    pub order_id: DbId,
    pub status: OrderStatus,
}

/// Consume an active, unexpired hold and create a pending order for it.
pub async fn create_order(
    pool: &PgPool,
    clock: &dyn Clock,
    config: &ServerConfig,
    input: &PlaceOrder,
) -> Result<PlacedOrder, CoreError> {
    let mut attempt = 1;
    loop {
        match try_create_order(pool, clock, config, input).await {
            Err(err) if err.is_transient() && attempt < config.tx_retry_attempts => {
                tracing::warn!(attempt, error = %err, "create_order retrying after transient conflict");
                tokio::time::sleep(backoff_delay(attempt)).await;
                attempt += 1;
            }
            other => return other,
        }
    }
}

async fn try_create_order(
    pool: &PgPool,
    clock: &dyn Clock,
    config: &ServerConfig,
    input: &PlaceOrder,
) -> Result<PlacedOrder, CoreError> {
    let mut tx = begin_with_lock_timeout(pool, config.lock_timeout_ms).await?;

    let hold = HoldRepo::find_for_update(&mut *tx, input.hold_id)
        .await
        .map_err(|e| map_db_err("locking hold", e))?
        .ok_or_else(|| CoreError::Validation {
            field: "hold_id",
            message: format!("hold {} does not exist", input.hold_id),
        })?;

    if hold.status_id != HoldStatus::Active.id() {
        return Err(CoreError::HoldNotUsable {
            hold_id: hold.id,
            reason: match HoldStatus::from_id(hold.status_id) {
                Some(HoldStatus::Used) => "hold has already been used",
                Some(HoldStatus::Expired) => "hold has expired",
                Some(HoldStatus::Cancelled) => "hold has been cancelled",
                _ => "hold is not active",
            },
        });
    }
    if hold.expires_at <= clock.now() {
        return Err(CoreError::HoldNotUsable {
            hold_id: hold.id,
            reason: "hold has expired",
        });
    }

    // Price is effectively immutable during the flow, so no product lock.
    let product = ProductRepo::find_by_id_in_tx(&mut *tx, hold.product_id)
        .await
        .map_err(|e| map_db_err("loading product", e))?
        .ok_or_else(|| {
            CoreError::Internal(format!(
                "hold {} references missing product {}",
                hold.id, hold.product_id
            ))
        })?;

    let amount_cents = product.price_cents * i64::from(hold.qty);
    let order = OrderRepo::insert_pending(
        &mut *tx,
        hold.id,
        hold.product_id,
        hold.qty,
        amount_cents,
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e, "uq_orders_hold_id") {
            CoreError::HoldAlreadyConsumed { hold_id: hold.id }
        } else {
            map_db_err("inserting order", e)
        }
    })?;

    hold_machine::validate_transition(hold.status_id, HoldStatus::Used.id())
        .map_err(CoreError::Internal)?;
    HoldRepo::set_status(&mut *tx, hold.id, HoldStatus::Used.id())
        .await
        .map_err(|e| map_db_err("marking hold used", e))?;

    tx.commit()
        .await
        .map_err(|e| map_db_err("committing order", e))?;

    tracing::info!(
        order_id = order.id,
        hold_id = hold.id,
        product_id = hold.product_id,
        amount_cents,
        "order_created"
    );

    Ok(PlacedOrder {
        order_id: order.id,
        status: OrderStatus::Pending,
    })
}
