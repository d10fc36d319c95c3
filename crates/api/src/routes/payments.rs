//! Route definitions for the payment gateway ingress.

use axum::routing::post;
use axum::Router;

use crate::handlers::payments;
use crate::state::AppState;

/// Routes mounted at `/payments`.
///
/// ```text
/// POST /payments/webhook -> handle_webhook
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/payments/webhook", post(payments::handle_webhook))
}
