use std::sync::Arc;

use crate::config::PersistenceConfig;
use crate::domain::{Meal, User};
use anyhow::{Result, bail};
use async_trait::async_trait;
use uuid::Uuid;

pub mod providers;

use providers::{postgres::PostgresProvider, sqlite::SqliteProvider};

#[async_trait]
pub trait PersistenceLayer: Send + Sync + std::fmt::Debug {
    // =========================================================================
    // Users
    // =========================================================================

    async fn create_user(&self, user: &User) -> Result<()>;

    /// Look up a user by id, only if `session_id` is the token issued to them.
    async fn authenticate(&self, user_id: Uuid, session_id: Uuid) -> Result<Option<User>>;

    /// Persist the mutable fields of a user. Returns false if the user is gone.
    async fn update_user(&self, user: &User) -> Result<bool>;

    /// Delete a user together with all their meals.
    async fn delete_user(&self, user_id: Uuid) -> Result<bool>;

    // =========================================================================
    // Meals
    // =========================================================================

    /// All meals of a user, oldest `consumed_at` first.
    ///
    /// Ties fall back to `created_at` and then `id` so the order is stable
    /// across calls, which the diet streak summary depends on.
    async fn list_meals(&self, user_id: Uuid) -> Result<Vec<Meal>>;

    async fn get_meal(&self, user_id: Uuid, meal_id: Uuid) -> Result<Option<Meal>>;

    async fn create_meal(&self, meal: &Meal) -> Result<()>;

    /// Overwrite a stored meal. Returns false if no meal with that id belongs to `meal.user_id`.
    async fn update_meal(&self, meal: &Meal) -> Result<bool>;

    async fn delete_meal(&self, user_id: Uuid, meal_id: Uuid) -> Result<bool>;
}

/// Open the configured store and run its migrations.
pub async fn connect(config: &PersistenceConfig) -> Result<Arc<dyn PersistenceLayer>> {
    let store: Arc<dyn PersistenceLayer> = match config.provider.as_str() {
        "sqlite" => Arc::new(
            SqliteProvider::new(&config.database_url, config.max_connections).await?,
        ),
        "postgres" => Arc::new(
            PostgresProvider::new(&config.database_url, config.max_connections).await?,
        ),
        other => bail!("Unknown persistence provider '{other}'"),
    };
    Ok(store)
}
