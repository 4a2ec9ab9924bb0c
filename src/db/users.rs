use serde::Serialize;
use sqlx::sqlite::SqlitePool;

#[derive(Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    #[sqlx(rename = "uuid")]
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: Option<String>,
    pub photo_url: Option<String>,
}

impl UserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a user. Returns the user UUID.
    /// Does not check for an existing email; callers look up first.
    pub async fn insert(&self, user: &NewUser) -> Result<String, sqlx::Error> {
        let uuid = uuid::Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO users (uuid, email, name, photo_url) VALUES (?, ?, ?, ?)")
            .bind(&uuid)
            .bind(&user.email)
            .bind(&user.name)
            .bind(&user.photo_url)
            .execute(&self.pool)
            .await?;
        Ok(uuid)
    }

    /// Get the first user registered with an email.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as(
            "SELECT uuid, email, name, photo_url, created_at FROM users WHERE email = ? ORDER BY id LIMIT 1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }
}
