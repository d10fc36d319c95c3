//! Repository for the `orders` table.

use sqlx::{PgConnection, PgPool};
use surgecart_core::types::DbId;

use crate::models::order::Order;
use crate::models::status::{OrderStatus, StatusId};

/// Column list for `orders` queries.
const COLUMNS: &str =
    "id, hold_id, product_id, qty, amount_cents, status_id, created_at, updated_at";

/// Provides order rows for the order and webhook flows.
pub struct OrderRepo;

impl OrderRepo {
    /// Insert a pending order consuming `hold_id`.
    ///
    /// The `uq_orders_hold_id` constraint rejects a second order for the
    /// same hold; the engine maps that violation to its business error.
    pub async fn insert_pending(
        conn: &mut PgConnection,
        hold_id: DbId,
        product_id: DbId,
        qty: i32,
        amount_cents: i64,
    ) -> Result<Order, sqlx::Error> {
        let query = format!(
            "INSERT INTO orders (hold_id, product_id, qty, amount_cents, status_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(hold_id)
            .bind(product_id)
            .bind(qty)
            .bind(amount_cents)
            .bind(OrderStatus::Pending.id())
            .fetch_one(conn)
            .await
    }

    /// Find an order by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Order>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders WHERE id = $1");
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an order by its ID inside an enclosing transaction, without
    /// locking the row (webhook replay path).
    pub async fn find_by_id_in_tx(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders WHERE id = $1");
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Lock the order row for the remainder of the enclosing transaction.
    ///
    /// Serializes webhook processing for this order.
    pub async fn find_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Set the order status. Caller must hold the row lock and have
    /// validated the transition.
    pub async fn set_status(
        conn: &mut PgConnection,
        id: DbId,
        status: StatusId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE orders SET status_id = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(conn)
            .await?;
        Ok(())
    }
}
