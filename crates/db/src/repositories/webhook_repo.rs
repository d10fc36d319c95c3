//! Repository for the `payment_webhooks` table.
//!
//! Rows are insert-only. The unique index on `idempotency_key` adjudicates
//! first-writer-wins between concurrent deliveries of the same key.

use sqlx::{PgConnection, PgPool};
use surgecart_core::types::{DbId, Timestamp};

use crate::models::payment_webhook::PaymentWebhook;
use crate::models::status::WebhookResult;

/// Column list for `payment_webhooks` queries.
const COLUMNS: &str =
    "id, idempotency_key, order_id, result_id, payload, processed_at, created_at";

/// Provides the duplicate-suppressing webhook ledger.
pub struct WebhookRepo;

impl WebhookRepo {
    /// Record a webhook delivery. A `uq_payment_webhooks_idempotency_key`
    /// violation means another transaction won the race for this key; the
    /// engine retries the whole handler, which then replays.
    pub async fn insert(
        conn: &mut PgConnection,
        idempotency_key: &str,
        order_id: DbId,
        result: WebhookResult,
        payload: &serde_json::Value,
        processed_at: Timestamp,
    ) -> Result<PaymentWebhook, sqlx::Error> {
        let query = format!(
            "INSERT INTO payment_webhooks \
                 (idempotency_key, order_id, result_id, payload, processed_at) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PaymentWebhook>(&query)
            .bind(idempotency_key)
            .bind(order_id)
            .bind(result.id())
            .bind(payload)
            .bind(processed_at)
            .fetch_one(conn)
            .await
    }

    /// Look up a webhook by idempotency key inside an enclosing transaction.
    pub async fn find_by_key(
        conn: &mut PgConnection,
        idempotency_key: &str,
    ) -> Result<Option<PaymentWebhook>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM payment_webhooks WHERE idempotency_key = $1");
        sqlx::query_as::<_, PaymentWebhook>(&query)
            .bind(idempotency_key)
            .fetch_optional(conn)
            .await
    }

    /// Count webhook rows recorded for an order (audit queries and tests).
    pub async fn count_for_order(pool: &PgPool, order_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM payment_webhooks WHERE order_id = $1")
            .bind(order_id)
            .fetch_one(pool)
            .await
    }
}
