//! Repository for the `holds` table.
//!
//! Status transitions are validated by the engines against the lifecycle
//! tables in `surgecart_core::lifecycle` before any write lands here.

use sqlx::{PgConnection, PgPool};
use surgecart_core::types::{DbId, Timestamp};

use crate::models::hold::Hold;
use crate::models::status::{HoldStatus, StatusId};

/// Column list for `holds` queries.
const COLUMNS: &str = "id, product_id, qty, status_id, expires_at, created_at, updated_at";

/// Provides reservation rows for the hold and reaper flows.
pub struct HoldRepo;

impl HoldRepo {
    /// Insert a new active hold. Caller already holds the product row lock
    /// and has decremented the available stock in the same transaction.
    pub async fn insert_active(
        conn: &mut PgConnection,
        product_id: DbId,
        qty: i32,
        expires_at: Timestamp,
    ) -> Result<Hold, sqlx::Error> {
        let query = format!(
            "INSERT INTO holds (product_id, qty, status_id, expires_at) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Hold>(&query)
            .bind(product_id)
            .bind(qty)
            .bind(HoldStatus::Active.id())
            .bind(expires_at)
            .fetch_one(conn)
            .await
    }

    /// Find a hold by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Hold>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM holds WHERE id = $1");
        sqlx::query_as::<_, Hold>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lock the hold row for the remainder of the enclosing transaction.
    pub async fn find_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Hold>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM holds WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Hold>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Set the hold status. Caller must hold the row lock and have validated
    /// the transition.
    pub async fn set_status(
        conn: &mut PgConnection,
        id: DbId,
        status: StatusId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE holds SET status_id = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Count holds currently in `active` status (health probe and ops
    /// visibility).
    pub async fn count_active(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM holds WHERE status_id = $1")
            .bind(HoldStatus::Active.id())
            .fetch_one(pool)
            .await
    }

    /// IDs of active holds whose expiry has passed, ordered by id, limited
    /// to one reaper page. Plain read; each candidate is re-checked under
    /// its row lock before being expired.
    pub async fn list_expired_active_ids(
        pool: &PgPool,
        now: Timestamp,
        limit: i64,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT id FROM holds \
             WHERE status_id = $1 AND expires_at < $2 \
             ORDER BY id \
             LIMIT $3",
        )
        .bind(HoldStatus::Active.id())
        .bind(now)
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
