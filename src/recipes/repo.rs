use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Clone, FromRow)]
pub struct Recipe {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub ingredients: String,
    pub instructions: String,
    /// Owning user id, fixed at creation.
    pub created_by: i64,
}

impl Recipe {
    pub async fn create(
        db: &SqlitePool,
        title: &str,
        description: &str,
        ingredients: &str,
        instructions: &str,
        created_by: i64,
    ) -> Result<Recipe, sqlx::Error> {
        sqlx::query_as::<_, Recipe>(
            r#"
            INSERT INTO recipes (title, description, ingredients, instructions, created_by)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, title, description, ingredients, instructions, created_by
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(ingredients)
        .bind(instructions)
        .bind(created_by)
        .fetch_one(db)
        .await
    }

    pub async fn find_by_id(db: &SqlitePool, id: i64) -> Result<Option<Recipe>, sqlx::Error> {
        sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, title, description, ingredients, instructions, created_by
            FROM recipes
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// One listing page in creation (id) order.
    pub async fn list_page(
        db: &SqlitePool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Recipe>, sqlx::Error> {
        sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, title, description, ingredients, instructions, created_by
            FROM recipes
            ORDER BY id
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
    }

    pub async fn count(db: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM recipes")
            .fetch_one(db)
            .await
    }

    pub async fn list_by_owner(db: &SqlitePool, user_id: i64) -> Result<Vec<Recipe>, sqlx::Error> {
        sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, title, description, ingredients, instructions, created_by
            FROM recipes
            WHERE created_by = ?
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await
    }

    pub async fn update(
        db: &SqlitePool,
        id: i64,
        title: &str,
        description: &str,
        ingredients: &str,
        instructions: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE recipes
            SET title = ?, description = ?, ingredients = ?, instructions = ?
            WHERE id = ?
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(ingredients)
        .bind(instructions)
        .bind(id)
        .execute(db)
        .await?;
        Ok(())
    }

    pub async fn delete(db: &SqlitePool, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM recipes WHERE id = ?")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }
}
