//! Webhook engine: idempotently apply a terminal payment outcome.
//!
//! The unique index on `idempotency_key` adjudicates first-writer-wins: the
//! losing transaction of a concurrent duplicate delivery observes the
//! violation, retries the whole handler, and lands in the replay path as a
//! no-op. Within a single order, webhook processing is serialized by the
//! order row lock, so the final status is decided by the first persisted
//! webhook; later webhooks observe an absorbing terminal state.

use sqlx::PgPool;
use surgecart_core::clock::Clock;
use surgecart_core::error::CoreError;
use surgecart_core::lifecycle::{hold_machine, order_machine};
use surgecart_core::types::DbId;
use surgecart_db::models::status::{HoldStatus, OrderStatus, WebhookResult};
use surgecart_db::repositories::{HoldRepo, OrderRepo, ProductRepo, WebhookRepo};

use crate::config::ServerConfig;
use crate::engine::{backoff_delay, begin_with_lock_timeout, is_unique_violation, map_db_err};

/// Result of a handled (or replayed) webhook delivery.
#[derive(Debug)]
pub struct WebhookOutcome {
    pub order_id: DbId,
    pub order_status: OrderStatus,
    pub idempotency_key: String,
}

/// Apply a payment outcome to an order, exactly once per idempotency key.
pub async fn handle_webhook(
    pool: &PgPool,
    clock: &dyn Clock,
    config: &ServerConfig,
    idempotency_key: &str,
    order_id: DbId,
    result: WebhookResult,
    payload: &serde_json::Value,
) -> Result<WebhookOutcome, CoreError> {
    let mut attempt = 1;
    loop {
        match try_handle_webhook(pool, clock, config, idempotency_key, order_id, result, payload)
            .await
        {
            Err(err) if err.is_transient() && attempt < config.tx_retry_attempts => {
                tracing::warn!(
                    attempt,
                    idempotency_key,
                    error = %err,
                    "handle_webhook retrying after transient conflict"
                );
                tokio::time::sleep(backoff_delay(attempt)).await;
                attempt += 1;
            }
            other => return other,
        }
    }
}

async fn try_handle_webhook(
    pool: &PgPool,
    clock: &dyn Clock,
    config: &ServerConfig,
    idempotency_key: &str,
    order_id: DbId,
    result: WebhookResult,
    payload: &serde_json::Value,
) -> Result<WebhookOutcome, CoreError> {
    let mut tx = begin_with_lock_timeout(pool, config.lock_timeout_ms).await?;

    // Replay path: the key has been processed before. The same key must not
    // be reused for a different order.
    if let Some(existing) = WebhookRepo::find_by_key(&mut *tx, idempotency_key)
        .await
        .map_err(|e| map_db_err("looking up webhook", e))?
    {
        if existing.order_id != order_id {
            return Err(CoreError::IdempotencyKeyConflict {
                key: idempotency_key.to_owned(),
            });
        }
        let order = OrderRepo::find_by_id_in_tx(&mut *tx, order_id)
            .await
            .map_err(|e| map_db_err("loading order for replay", e))?
            .ok_or_else(|| {
                CoreError::Internal(format!("webhook references missing order {order_id}"))
            })?;
        let order_status = order_status_of(&order)?;
        return Ok(WebhookOutcome {
            order_id,
            order_status,
            idempotency_key: idempotency_key.to_owned(),
        });
    }

    // First-time path. The order lock serializes outcome application; the
    // lookup above stays consistent because the insert below re-checks the
    // key via the unique index.
    let order = OrderRepo::find_for_update(&mut *tx, order_id)
        .await
        .map_err(|e| map_db_err("locking order", e))?
        .ok_or(CoreError::OrderNotFound { order_id })?;

    WebhookRepo::insert(
        &mut *tx,
        idempotency_key,
        order_id,
        result,
        payload,
        clock.now(),
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e, "uq_payment_webhooks_idempotency_key") {
            // Another delivery won the insert race; the retry will replay.
            CoreError::TransientConflict(format!(
                "concurrent delivery of idempotency key {idempotency_key:?}"
            ))
        } else {
            map_db_err("recording webhook", e)
        }
    })?;

    let mut order_status = order_status_of(&order)?;
    match result {
        WebhookResult::Success => {
            if order_status == OrderStatus::Pending {
                transition_order(&mut *tx, order.id, order.status_id, OrderStatus::Paid)
                    .await?;
                order_status = OrderStatus::Paid;
            }
            // Terminal orders absorb the outcome; the webhook row above is
            // still recorded for audit.
        }
        WebhookResult::Failure => {
            if order_status == OrderStatus::Pending {
                transition_order(&mut *tx, order.id, order.status_id, OrderStatus::Cancelled)
                    .await?;
                order_status = OrderStatus::Cancelled;
                restore_reservation(&mut *tx, &order).await?;
            }
        }
    }

    tx.commit()
        .await
        .map_err(|e| map_db_err("committing webhook", e))?;

    tracing::info!(
        order_id,
        idempotency_key,
        result = result.name(),
        order_status = order_status.name(),
        "payment_webhook_handled"
    );

    Ok(WebhookOutcome {
        order_id,
        order_status,
        idempotency_key: idempotency_key.to_owned(),
    })
}

/// Return the hold's quantity to available stock, unless the reaper or a
/// prior cancellation already did.
async fn restore_reservation(
    conn: &mut sqlx::PgConnection,
    order: &surgecart_db::models::order::Order,
) -> Result<(), CoreError> {
    let hold = HoldRepo::find_for_update(conn, order.hold_id)
        .await
        .map_err(|e| map_db_err("locking hold", e))?
        .ok_or_else(|| {
            CoreError::Internal(format!(
                "order {} references missing hold {}",
                order.id, order.hold_id
            ))
        })?;

    // Already expired or cancelled: the quantity is back in available stock.
    if hold.status_id == HoldStatus::Expired.id() || hold.status_id == HoldStatus::Cancelled.id() {
        return Ok(());
    }

    ProductRepo::find_for_update(conn, order.product_id)
        .await
        .map_err(|e| map_db_err("locking product", e))?
        .ok_or_else(|| {
            CoreError::Internal(format!(
                "order {} references missing product {}",
                order.id, order.product_id
            ))
        })?;
    ProductRepo::adjust_available(conn, order.product_id, hold.qty)
        .await
        .map_err(|e| map_db_err("restoring stock", e))?;

    hold_machine::validate_transition(hold.status_id, HoldStatus::Cancelled.id())
        .map_err(CoreError::Internal)?;
    HoldRepo::set_status(conn, hold.id, HoldStatus::Cancelled.id())
        .await
        .map_err(|e| map_db_err("cancelling hold", e))?;

    Ok(())
}

async fn transition_order(
    conn: &mut sqlx::PgConnection,
    order_id: DbId,
    from: i16,
    to: OrderStatus,
) -> Result<(), CoreError> {
    order_machine::validate_transition(from, to.id()).map_err(CoreError::Internal)?;
    OrderRepo::set_status(conn, order_id, to.id())
        .await
        .map_err(|e| map_db_err("updating order status", e))
}

fn order_status_of(order: &surgecart_db::models::order::Order) -> Result<OrderStatus, CoreError> {
    OrderStatus::from_id(order.status_id).ok_or_else(|| {
        CoreError::Internal(format!(
            "order {} has unknown status id {}",
            order.id, order.status_id
        ))
    })
}
