use crate::domain::{Meal, User};
use crate::persistence::PersistenceLayer;
use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Debug)]
pub struct PostgresProvider {
    pool: PgPool,
}

impl PostgresProvider {
    pub async fn new(connection_string: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(connection_string)
            .await?;

        // Run Migrations
        sqlx::migrate!("./migrations/postgres").run(&pool).await?;

        Ok(Self { pool })
    }
}

fn user_from_row(row: &PgRow) -> Result<User> {
    Ok(User {
        id: row.try_get("id")?,
        session_id: row.try_get("session_id")?,
        name: row.try_get("name")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn meal_from_row(row: &PgRow) -> Result<Meal> {
    Ok(Meal {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        in_diet: row.try_get("in_diet")?,
        consumed_at: row.try_get("consumed_at")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl PersistenceLayer for PostgresProvider {
    async fn create_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, session_id, name, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.id)
        .bind(user.session_id)
        .bind(&user.name)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn authenticate(&self, user_id: Uuid, session_id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query(
            "SELECT id, session_id, name, created_at, updated_at FROM users WHERE id = $1 AND session_id = $2",
        )
        .bind(user_id)
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn update_user(&self, user: &User) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET name = $1, updated_at = $2 WHERE id = $3")
            .bind(&user.name)
            .bind(user.updated_at)
            .bind(user.id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_meals(&self, user_id: Uuid) -> Result<Vec<Meal>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, name, description, in_diet, consumed_at, created_at, updated_at
            FROM meals
            WHERE user_id = $1
            ORDER BY consumed_at ASC, created_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(meal_from_row).collect()
    }

    async fn get_meal(&self, user_id: Uuid, meal_id: Uuid) -> Result<Option<Meal>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, name, description, in_diet, consumed_at, created_at, updated_at
            FROM meals
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(meal_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(meal_from_row).transpose()
    }

    async fn create_meal(&self, meal: &Meal) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO meals (id, user_id, name, description, in_diet, consumed_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(meal.id)
        .bind(meal.user_id)
        .bind(&meal.name)
        .bind(&meal.description)
        .bind(meal.in_diet)
        .bind(meal.consumed_at)
        .bind(meal.created_at)
        .bind(meal.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_meal(&self, meal: &Meal) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE meals SET
                name = $1,
                description = $2,
                in_diet = $3,
                consumed_at = $4,
                updated_at = $5
            WHERE id = $6 AND user_id = $7
            "#,
        )
        .bind(&meal.name)
        .bind(&meal.description)
        .bind(meal.in_diet)
        .bind(meal.consumed_at)
        .bind(meal.updated_at)
        .bind(meal.id)
        .bind(meal.user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_meal(&self, user_id: Uuid, meal_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM meals WHERE id = $1 AND user_id = $2")
            .bind(meal_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
