//! Payment webhook entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use surgecart_core::types::{DbId, Timestamp};

use super::status::StatusId;

/// A row from the `payment_webhooks` table.
///
/// Created once on first observation of an idempotency key, immutable
/// thereafter. `payload` preserves the gateway's JSON body verbatim.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PaymentWebhook {
    pub id: DbId,
    pub idempotency_key: String,
    pub order_id: DbId,
    pub result_id: StatusId,
    pub payload: serde_json::Value,
    pub processed_at: Timestamp,
    pub created_at: Timestamp,
}

/// Typed fields of the gateway request body for `POST /payments/webhook`.
///
/// The handler deserializes these out of the raw JSON body and passes the
/// original body through as the opaque payload.
#[derive(Debug, Deserialize)]
pub struct WebhookDelivery {
    pub idempotency_key: String,
    pub order_id: DbId,
    pub status: String,
}
