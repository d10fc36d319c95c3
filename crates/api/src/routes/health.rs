//! Service health probe.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;
use surgecart_db::repositories::HoldRepo;

use crate::state::AppState;

/// Payload for `GET /health`.
#[derive(Serialize)]
pub struct HealthStatus {
    /// `ok` when the database answers, `degraded` otherwise.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// `up` or `down`.
    pub database: &'static str,
    /// Reservations currently counted against stock. Absent when the
    /// database is unreachable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_holds: Option<i64>,
}

/// GET /health
///
/// Probe for load balancers and deploy checks. A single indexed count over
/// active holds doubles as the database reachability check and gives
/// operators a quick read on how much stock is tied up in reservations.
async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    let version = env!("CARGO_PKG_VERSION");

    match HoldRepo::count_active(&state.pool).await {
        Ok(active_holds) => Json(HealthStatus {
            status: "ok",
            version,
            database: "up",
            active_holds: Some(active_holds),
        }),
        Err(e) => {
            tracing::warn!(error = %e, "Health probe could not reach the database");
            Json(HealthStatus {
                status: "degraded",
                version,
                database: "down",
                active_holds: None,
            })
        }
    }
}

/// Mount the health probe.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
