//! Route definitions.
//!
//! The checkout surface is mounted at the root:
//!
//! ```text
//! GET  /products/{id}       -> get_product
//! POST /holds               -> create_hold
//! POST /orders              -> create_order
//! POST /payments/webhook    -> handle_webhook
//! GET  /health              -> health
//! ```

pub mod health;
pub mod holds;
pub mod orders;
pub mod payments;
pub mod products;

use axum::Router;

use crate::state::AppState;

/// Build the checkout route tree (everything except the health check).
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .merge(products::router())
        .merge(holds::router())
        .merge(orders::router())
        .merge(payments::router())
}
