//! Repository for the `products` table.

use sqlx::{PgConnection, PgPool};
use surgecart_core::types::DbId;

use crate::models::product::{CreateProduct, Product};

/// Column list for `products` queries.
const COLUMNS: &str =
    "id, name, total_stock, available_stock, price_cents, created_at, updated_at";

/// Provides reads and stock adjustments for products.
///
/// Stock is only ever adjusted through [`ProductRepo::adjust_available`]
/// while the caller holds the product row lock.
pub struct ProductRepo;

impl ProductRepo {
    /// Seed a new product. `available_stock` starts equal to `total_stock`.
    pub async fn create(pool: &PgPool, input: &CreateProduct) -> Result<Product, sqlx::Error> {
        let query = format!(
            "INSERT INTO products (name, total_stock, available_stock, price_cents) \
             VALUES ($1, $2, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(&input.name)
            .bind(input.total_stock)
            .bind(input.price_cents)
            .fetch_one(pool)
            .await
    }

    /// Find a product by its ID. Stock fields are read fresh from the row.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a product by its ID inside an enclosing transaction, without
    /// locking the row (price reads during order creation).
    pub async fn find_by_id_in_tx(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Lock the product row for the remainder of the enclosing transaction.
    ///
    /// Serializes all stock movements for this product: concurrent writers
    /// block here until the transaction commits or aborts.
    pub async fn find_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Adjust `available_stock` by `delta` (negative to reserve, positive to
    /// restore). Caller must hold the row lock; the CHECK constraint is the
    /// storage-level backstop against leaving the valid range.
    pub async fn adjust_available(
        conn: &mut PgConnection,
        id: DbId,
        delta: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE products \
             SET available_stock = available_stock + $2, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(delta)
        .execute(conn)
        .await?;
        Ok(())
    }
}
