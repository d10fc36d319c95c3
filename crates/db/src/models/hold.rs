//! Hold entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use surgecart_core::types::{DbId, Timestamp};

use super::status::StatusId;

/// A row from the `holds` table.
///
/// A hold owns its reserved quantity while `active`, or while `used` with a
/// pending order. Expiry and cancellation return the quantity to the
/// product's available stock.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Hold {
    pub id: DbId,
    pub product_id: DbId,
    pub qty: i32,
    pub status_id: StatusId,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for `POST /holds`.
#[derive(Debug, Deserialize)]
pub struct CreateHold {
    pub product_id: DbId,
    pub qty: i32,
}
