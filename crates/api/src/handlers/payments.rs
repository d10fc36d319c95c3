//! Payment webhook ingress handler.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use surgecart_core::error::CoreError;
use surgecart_core::types::DbId;
use surgecart_db::models::payment_webhook::WebhookDelivery;
use surgecart_db::models::status::WebhookResult;

use crate::engine::webhooks;
use crate::error::AppResult;
use crate::state::AppState;

/// Response body for `POST /payments/webhook`.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub order_id: DbId,
    pub order_status: &'static str,
    pub idempotency_key: String,
}

/// POST /payments/webhook
///
/// Takes the body as raw JSON so the gateway's payload, including fields
/// this service does not model, is persisted verbatim.
pub async fn handle_webhook(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> AppResult<Json<WebhookResponse>> {
    let delivery: WebhookDelivery =
        serde_json::from_value(payload.clone()).map_err(|e| CoreError::Validation {
            field: "body",
            message: format!("malformed webhook body: {e}"),
        })?;

    if delivery.idempotency_key.trim().is_empty() {
        return Err(CoreError::Validation {
            field: "idempotency_key",
            message: "idempotency_key must not be empty".into(),
        }
        .into());
    }
    let result =
        WebhookResult::from_name(&delivery.status).ok_or_else(|| CoreError::Validation {
            field: "status",
            message: format!(
                "status must be \"success\" or \"failure\", got {:?}",
                delivery.status
            ),
        })?;

    let outcome = webhooks::handle_webhook(
        &state.pool,
        state.clock.as_ref(),
        &state.config,
        &delivery.idempotency_key,
        delivery.order_id,
        result,
        &payload,
    )
    .await
    .map_err(|e| {
        tracing::error!(
            order_id = delivery.order_id,
            idempotency_key = %delivery.idempotency_key,
            payload = %payload,
            error = %e,
            "payment_webhook_failed"
        );
        e
    })?;

    Ok(Json(WebhookResponse {
        order_id: outcome.order_id,
        order_status: outcome.order_status.name(),
        idempotency_key: outcome.idempotency_key,
    }))
}
