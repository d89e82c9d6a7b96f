use std::str::FromStr;

use crate::domain::{Meal, User};
use crate::persistence::PersistenceLayer;
use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// SQLite store. Ids are kept as hyphenated text so the database stays
/// readable with the `sqlite3` shell.
#[derive(Debug)]
pub struct SqliteProvider {
    pool: SqlitePool,
}

impl SqliteProvider {
    pub async fn new(connection_string: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(connection_string)?
            .create_if_missing(true)
            .foreign_keys(true);

        // Every connection to `:memory:` is its own database, so keep exactly one alive.
        let pool = if connection_string.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(max_connections)
                .connect_with(options)
                .await?
        };

        sqlx::migrate!("./migrations/sqlite").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Fresh private in-memory database.
    pub async fn in_memory() -> Result<Self> {
        Self::new("sqlite::memory:", 1).await
    }
}

fn uuid_column(row: &SqliteRow, column: &str) -> Result<Uuid> {
    let raw: String = row.try_get(column)?;
    Ok(Uuid::parse_str(&raw)?)
}

fn user_from_row(row: &SqliteRow) -> Result<User> {
    Ok(User {
        id: uuid_column(row, "id")?,
        session_id: uuid_column(row, "session_id")?,
        name: row.try_get("name")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn meal_from_row(row: &SqliteRow) -> Result<Meal> {
    Ok(Meal {
        id: uuid_column(row, "id")?,
        user_id: uuid_column(row, "user_id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        in_diet: row.try_get("in_diet")?,
        consumed_at: row.try_get("consumed_at")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl PersistenceLayer for SqliteProvider {
    async fn create_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, session_id, name, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(user.id.to_string())
        .bind(user.session_id.to_string())
        .bind(&user.name)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn authenticate(&self, user_id: Uuid, session_id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query(
            "SELECT id, session_id, name, created_at, updated_at FROM users WHERE id = ?1 AND session_id = ?2",
        )
        .bind(user_id.to_string())
        .bind(session_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn update_user(&self, user: &User) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET name = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(&user.name)
            .bind(user.updated_at)
            .bind(user.id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_meals(&self, user_id: Uuid) -> Result<Vec<Meal>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, name, description, in_diet, consumed_at, created_at, updated_at
            FROM meals
            WHERE user_id = ?1
            ORDER BY consumed_at ASC, created_at ASC, id ASC
            "#,
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(meal_from_row).collect()
    }

    async fn get_meal(&self, user_id: Uuid, meal_id: Uuid) -> Result<Option<Meal>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, name, description, in_diet, consumed_at, created_at, updated_at
            FROM meals
            WHERE id = ?1 AND user_id = ?2
            "#,
        )
        .bind(meal_id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(meal_from_row).transpose()
    }

    async fn create_meal(&self, meal: &Meal) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO meals (id, user_id, name, description, in_diet, consumed_at, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(meal.id.to_string())
        .bind(meal.user_id.to_string())
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
                name = ?1,
                description = ?2,
                in_diet = ?3,
                consumed_at = ?4,
                updated_at = ?5
            WHERE id = ?6 AND user_id = ?7
            "#,
        )
        .bind(&meal.name)
        .bind(&meal.description)
        .bind(meal.in_diet)
        .bind(meal.consumed_at)
        .bind(meal.updated_at)
        .bind(meal.id.to_string())
        .bind(meal.user_id.to_string())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_meal(&self, user_id: Uuid, meal_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM meals WHERE id = ?1 AND user_id = ?2")
            .bind(meal_id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    async fn store_with_user() -> (SqliteProvider, User) {
        let store = SqliteProvider::in_memory().await.unwrap();
        let user = User::new("Tester".into());
        store.create_user(&user).await.unwrap();
        (store, user)
    }

    #[tokio::test]
    async fn test_authenticate_requires_matching_session() {
        let (store, user) = store_with_user().await;

        let found = store.authenticate(user.id, user.session_id).await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));

        let wrong = store.authenticate(user.id, Uuid::new_v4()).await.unwrap();
        assert!(wrong.is_none());
    }

    #[tokio::test]
    async fn test_list_meals_is_ordered_by_consumption_time() {
        let (store, user) = store_with_user().await;
        let base = Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap();

        // Inserted out of order on purpose.
        for (name, offset) in [("dinner", 12), ("breakfast", 0), ("lunch", 4)] {
            let meal = Meal::new(
                user.id,
                name.into(),
                None,
                true,
                Some(base + Duration::hours(offset)),
            );
            store.create_meal(&meal).await.unwrap();
        }

        let names: Vec<_> = store
            .list_meals(user.id)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, ["breakfast", "lunch", "dinner"]);
    }

    #[tokio::test]
    async fn test_meals_are_scoped_to_their_owner() {
        let (store, owner) = store_with_user().await;
        let other = User::new("Other".into());
        store.create_user(&other).await.unwrap();

        let meal = Meal::new(owner.id, "Oats".into(), Some("with milk".into()), true, None);
        store.create_meal(&meal).await.unwrap();

        let stored = store.get_meal(owner.id, meal.id).await.unwrap().unwrap();
        assert_eq!(stored.id, meal.id);
        assert_eq!(stored.description.as_deref(), Some("with milk"));
        assert!(stored.in_diet);
        assert!(store.get_meal(other.id, meal.id).await.unwrap().is_none());
        assert!(!store.delete_meal(other.id, meal.id).await.unwrap());
        assert!(store.list_meals(other.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_meal() {
        let (store, user) = store_with_user().await;
        let mut meal = Meal::new(user.id, "Pizza".into(), None, false, None);
        store.create_meal(&meal).await.unwrap();

        meal.name = "Salad".into();
        meal.in_diet = true;
        assert!(store.update_meal(&meal).await.unwrap());

        let stored = store.get_meal(user.id, meal.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Salad");
        assert!(stored.in_diet);

        let stranger = Meal::new(user.id, "Ghost".into(), None, true, None);
        assert!(!store.update_meal(&stranger).await.unwrap());
    }

    #[tokio::test]
    async fn test_deleting_user_cascades_to_meals() {
        let (store, user) = store_with_user().await;
        let meal = Meal::new(user.id, "Eggs".into(), None, true, None);
        store.create_meal(&meal).await.unwrap();

        assert!(store.delete_user(user.id).await.unwrap());
        assert!(store.get_meal(user.id, meal.id).await.unwrap().is_none());
        assert!(!store.delete_user(user.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_meal_requires_existing_user() {
        let store = SqliteProvider::in_memory().await.unwrap();
        let orphan = Meal::new(Uuid::new_v4(), "Orphan".into(), None, true, None);
        assert!(store.create_meal(&orphan).await.is_err());
    }
}
