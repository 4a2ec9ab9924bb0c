//! Food listings.

use serde::Serialize;
use sqlx::QueryBuilder;
use sqlx::sqlite::{Sqlite, SqlitePool};

use crate::query::{FoodQuery, Pagination};

const FOOD_COLUMNS: &str =
    "uuid, name, category, origin, price, quantity, image, description, user_email, order_count";

#[derive(Clone)]
pub struct FoodStore {
    pool: SqlitePool,
}

/// A food listing as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Food {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub category: String,
    pub origin: String,
    pub price: f64,
    pub quantity: i64,
    pub image: String,
    pub description: String,
    pub user_email: String,
    pub order_count: i64,
}

/// Writable fields of a food listing.
#[derive(Debug, Clone)]
pub struct FoodFields {
    pub name: String,
    pub category: String,
    pub origin: String,
    pub price: f64,
    pub quantity: i64,
    pub image: String,
    pub description: String,
    pub user_email: String,
    /// Kept unchanged on replacement when `None`; starts at 0 on insert.
    pub order_count: Option<i64>,
}

/// Outcome of an update, in document-store terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
    /// Set when the update inserted a new listing.
    pub upserted_id: Option<String>,
}

#[derive(sqlx::FromRow)]
struct FoodRow {
    uuid: String,
    name: String,
    category: String,
    origin: String,
    price: f64,
    quantity: i64,
    image: String,
    description: String,
    user_email: String,
    order_count: i64,
}

impl From<FoodRow> for Food {
    fn from(row: FoodRow) -> Self {
        Self {
            id: row.uuid,
            name: row.name,
            category: row.category,
            origin: row.origin,
            price: row.price,
            quantity: row.quantity,
            image: row.image,
            description: row.description,
            user_email: row.user_email,
            order_count: row.order_count,
        }
    }
}

fn to_sql_int(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

impl FoodStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new listing. Returns its UUID.
    pub async fn insert(&self, fields: &FoodFields) -> Result<String, sqlx::Error> {
        let uuid = uuid::Uuid::new_v4().to_string();
        self.insert_with_id(&self.pool, &uuid, fields).await?;
        Ok(uuid)
    }

    async fn insert_with_id<'e, E>(
        &self,
        executor: E,
        uuid: &str,
        fields: &FoodFields,
    ) -> Result<(), sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            "INSERT INTO foods (uuid, name, category, origin, price, quantity, image, description, user_email, order_count)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid)
        .bind(&fields.name)
        .bind(&fields.category)
        .bind(&fields.origin)
        .bind(fields.price)
        .bind(fields.quantity)
        .bind(&fields.image)
        .bind(&fields.description)
        .bind(&fields.user_email)
        .bind(fields.order_count.unwrap_or(0))
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Get a listing by UUID.
    pub async fn get(&self, uuid: &str) -> Result<Option<Food>, sqlx::Error> {
        let row: Option<FoodRow> =
            sqlx::query_as(&format!("SELECT {} FROM foods WHERE uuid = ?", FOOD_COLUMNS))
                .bind(uuid)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Food::from))
    }

    /// Run a listing query. Without an explicit sort, rows come back in insertion order.
    pub async fn list(&self, query: &FoodQuery) -> Result<Vec<Food>, sqlx::Error> {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {} FROM foods", FOOD_COLUMNS));

        if let Some(term) = &query.name_contains {
            // instr() matches the term literally, unlike LIKE wildcards
            builder
                .push(" WHERE instr(lower(name), lower(")
                .push_bind(term.clone())
                .push(")) > 0");
        }

        match query.sort {
            Some(sort) => builder.push(" ORDER BY price ").push(sort.as_sql()),
            None => builder.push(" ORDER BY id"),
        };

        builder
            .push(" LIMIT ")
            .push_bind(to_sql_int(query.pagination.limit))
            .push(" OFFSET ")
            .push_bind(to_sql_int(query.pagination.skip));

        let rows: Vec<FoodRow> = builder.build_query_as().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Food::from).collect())
    }

    /// Total number of listings.
    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM foods")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }

    /// Listings with the highest order count first.
    pub async fn most_ordered(&self, limit: u64) -> Result<Vec<Food>, sqlx::Error> {
        let rows: Vec<FoodRow> = sqlx::query_as(&format!(
            "SELECT {} FROM foods ORDER BY order_count DESC, id LIMIT ?",
            FOOD_COLUMNS
        ))
        .bind(to_sql_int(limit))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Food::from).collect())
    }

    /// Listings added by a user, one page at a time.
    pub async fn list_by_owner(
        &self,
        email: &str,
        pagination: Pagination,
    ) -> Result<Vec<Food>, sqlx::Error> {
        let rows: Vec<FoodRow> = sqlx::query_as(&format!(
            "SELECT {} FROM foods WHERE user_email = ? ORDER BY id LIMIT ? OFFSET ?",
            FOOD_COLUMNS
        ))
        .bind(email)
        .bind(to_sql_int(pagination.limit))
        .bind(to_sql_int(pagination.skip))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Food::from).collect())
    }

    /// Number of listings added by a user.
    pub async fn count_by_owner(&self, email: &str) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM foods WHERE user_email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }

    /// Set the stock quantity and order count of a listing.
    pub async fn update_stock(
        &self,
        uuid: &str,
        quantity: i64,
        order_count: i64,
    ) -> Result<UpdateOutcome, sqlx::Error> {
        let result = sqlx::query("UPDATE foods SET quantity = ?, order_count = ? WHERE uuid = ?")
            .bind(quantity)
            .bind(order_count)
            .bind(uuid)
            .execute(&self.pool)
            .await?;
        Ok(UpdateOutcome {
            matched: result.rows_affected(),
            modified: result.rows_affected(),
            upserted_id: None,
        })
    }

    /// Replace every field of a listing, inserting it under `uuid` if absent.
    pub async fn upsert(
        &self,
        uuid: &str,
        fields: &FoodFields,
    ) -> Result<UpdateOutcome, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM foods WHERE uuid = ?")
            .bind(uuid)
            .fetch_optional(&mut *tx)
            .await?;

        let outcome = if existing.is_some() {
            let result = sqlx::query(
                "UPDATE foods SET name = ?, category = ?, origin = ?, price = ?, quantity = ?,
                     image = ?, description = ?, user_email = ?, order_count = COALESCE(?, order_count)
                 WHERE uuid = ?",
            )
            .bind(&fields.name)
            .bind(&fields.category)
            .bind(&fields.origin)
            .bind(fields.price)
            .bind(fields.quantity)
            .bind(&fields.image)
            .bind(&fields.description)
            .bind(&fields.user_email)
            .bind(fields.order_count)
            .bind(uuid)
            .execute(&mut *tx)
            .await?;
            UpdateOutcome {
                matched: result.rows_affected(),
                modified: result.rows_affected(),
                upserted_id: None,
            }
        } else {
            self.insert_with_id(&mut *tx, uuid, fields).await?;
            UpdateOutcome {
                matched: 0,
                modified: 0,
                upserted_id: Some(uuid.to_string()),
            }
        };

        tx.commit().await?;
        Ok(outcome)
    }

    /// Delete a listing and every cart entry that references it.
    /// Returns (listings deleted, cart entries deleted).
    pub async fn delete_cascade(&self, uuid: &str) -> Result<(u64, u64), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let foods = sqlx::query("DELETE FROM foods WHERE uuid = ?")
            .bind(uuid)
            .execute(&mut *tx)
            .await?;

        let entries = sqlx::query("DELETE FROM cart_entries WHERE food_id = ?")
            .bind(uuid)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok((foods.rows_affected(), entries.rows_affected()))
    }
}
