//! Route definitions for the `/products` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::products;
use crate::state::AppState;

/// Routes mounted at `/products`.
///
/// ```text
/// GET /products/{id} -> get_product
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/products/{id}", get(products::get_product))
}
