//! Product read handlers.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use surgecart_core::error::CoreError;
use surgecart_core::types::DbId;
use surgecart_db::repositories::ProductRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Response body for `GET /products/{id}`.
///
/// `available_stock` is always read fresh from the row, never from a cache.
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: DbId,
    pub name: String,
    pub price_cents: i64,
    pub available_stock: i32,
}

/// GET /products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<DbId>,
) -> AppResult<Json<ProductResponse>> {
    let product = ProductRepo::find_by_id(&state.pool, product_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id: product_id,
        }))?;

    Ok(Json(ProductResponse {
        id: product.id,
        name: product.name,
        price_cents: product.price_cents,
        available_stock: product.available_stock,
    }))
}
