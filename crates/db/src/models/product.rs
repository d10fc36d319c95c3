//! Product entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use surgecart_core::types::{DbId, Timestamp};

/// A row from the `products` table.
///
/// `total_stock` is immutable post-seed; `available_stock` moves as holds
/// are taken, expired, and cancelled. Always read fresh, never cached.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    pub name: String,
    pub total_stock: i32,
    pub available_stock: i32,
    pub price_cents: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for seeding a product (admin tooling and tests).
///
/// `available_stock` starts equal to `total_stock`.
#[derive(Debug, Deserialize)]
pub struct CreateProduct {
    pub name: String,
    pub total_stock: i32,
    pub price_cents: i64,
}
