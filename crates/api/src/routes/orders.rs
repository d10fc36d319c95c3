//! Route definitions for the `/orders` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::orders;
use crate::state::AppState;

/// Routes mounted at `/orders`.
///
/// ```text
/// POST /orders -> create_order
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/orders", post(orders::create_order))
}
