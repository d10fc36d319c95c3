//! Hold creation handler.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use surgecart_core::types::DbId;
use surgecart_db::models::hold::CreateHold;

use crate::engine::holds;
use crate::error::AppResult;
use crate::handlers::format_timestamp;
use crate::state::AppState;

/// Response body for `POST /holds`.
#[derive(Debug, Serialize)]
pub struct HoldCreatedResponse {
    pub hold_id: DbId,
    pub expires_at: String,
}

/// POST /holds
pub async fn create_hold(
    State(state): State<AppState>,
    Json(input): Json<CreateHold>,
) -> AppResult<impl IntoResponse> {
    let created = holds::create_hold(
        &state.pool,
        state.clock.as_ref(),
        &state.config,
        &input,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(HoldCreatedResponse {
            hold_id: created.hold_id,
            expires_at: format_timestamp(created.expires_at),
        }),
    ))
}
