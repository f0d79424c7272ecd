use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Stored as given and compared byte-for-byte at login. See README for
    /// why this must change before any real deployment.
    pub password: String,
}

impl User {
    pub async fn find_by_username(
        db: &SqlitePool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_id(db: &SqlitePool, id: i64) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn create(
        db: &SqlitePool,
        username: &str,
        password: &str,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password)
            VALUES (?, ?)
            RETURNING id, username, password
            "#,
        )
        .bind(username)
        .bind(password)
        .fetch_one(db)
        .await
    }
}
