//! Cart entries created by order actions.

use serde::Serialize;
use sqlx::sqlite::SqlitePool;

#[derive(Clone)]
pub struct CartStore {
    pool: SqlitePool,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    #[serde(rename = "_id")]
    #[sqlx(rename = "uuid")]
    pub id: String,
    pub email: String,
    pub food_id: String,
    pub quantity: i64,
    pub added_at: String,
}

#[derive(Debug, Clone)]
pub struct NewCartEntry {
    pub email: String,
    pub food_id: String,
    pub quantity: i64,
    /// Client-supplied timestamp; the store uses the current time when absent.
    pub added_at: Option<String>,
}

impl CartStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Add an entry. Returns its UUID. The food reference is not checked.
    pub async fn insert(&self, entry: &NewCartEntry) -> Result<String, sqlx::Error> {
        let uuid = uuid::Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO cart_entries (uuid, email, food_id, quantity, added_at)
             VALUES (?, ?, ?, ?, COALESCE(?, datetime('now')))",
        )
        .bind(&uuid)
        .bind(&entry.email)
        .bind(&entry.food_id)
        .bind(entry.quantity)
        .bind(&entry.added_at)
        .execute(&self.pool)
        .await?;
        Ok(uuid)
    }

    /// All entries owned by an email, oldest first.
    pub async fn list_by_email(&self, email: &str) -> Result<Vec<CartEntry>, sqlx::Error> {
        sqlx::query_as(
            "SELECT uuid, email, food_id, quantity, added_at FROM cart_entries WHERE email = ? ORDER BY id",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await
    }

    /// Delete one entry. Returns the number of entries removed.
    pub async fn delete(&self, uuid: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cart_entries WHERE uuid = ?")
            .bind(uuid)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete entries whose food no longer exists.
    pub async fn cleanup_orphaned(&self) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM cart_entries WHERE NOT EXISTS (SELECT 1 FROM foods WHERE foods.uuid = cart_entries.food_id)",
        )
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
