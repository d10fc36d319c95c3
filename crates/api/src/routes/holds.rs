//! Route definitions for the `/holds` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::holds;
use crate::state::AppState;

/// Routes mounted at `/holds`.
///
/// ```text
/// POST /holds -> create_hold
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/holds", post(holds::create_hold))
}
