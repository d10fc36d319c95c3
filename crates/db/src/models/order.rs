//! Order entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use surgecart_core::types::{DbId, Timestamp};

use super::status::StatusId;

/// A row from the `orders` table.
///
/// `amount_cents` is captured at creation as `price_cents * qty` and never
/// recomputed afterwards.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Order {
    pub id: DbId,
    pub hold_id: DbId,
    pub product_id: DbId,
    pub qty: i32,
    pub amount_cents: i64,
    pub status_id: StatusId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for `POST /orders`.
#[derive(Debug, Deserialize)]
pub struct PlaceOrder {
    pub hold_id: DbId,
}
