//! Order placement handler.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use surgecart_core::types::DbId;
use surgecart_db::models::order::PlaceOrder;

use crate::engine::orders;
use crate::error::AppResult;
use crate::state::AppState;

/// Response body for `POST /orders`.
#[derive(Debug, Serialize)]
pub struct OrderPlacedResponse {
    pub order_id: DbId,
    pub status: &'static str,
}

/// POST /orders
pub async fn create_order(
    State(state): State<AppState>,
    Json(input): Json<PlaceOrder>,
) -> AppResult<impl IntoResponse> {
    let placed = orders::create_order(
        &state.pool,
        state.clock.as_ref(),
        &state.config,
        &input,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(OrderPlacedResponse {
            order_id: placed.order_id,
            status: placed.status.name(),
        }),
    ))
}
