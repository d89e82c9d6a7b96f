use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A meal logged by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meal {
    pub id: Uuid,
    /// Owning user. Meals are removed together with their owner.
    pub user_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the meal counted toward the user's diet.
    pub in_diet: bool,
    pub consumed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Meal {
    /// Build a fresh meal owned by `user_id`.
    ///
    /// `consumed_at` falls back to the creation time when not given.
    pub fn new(
        user_id: Uuid,
        name: String,
        description: Option<String>,
        in_diet: bool,
        consumed_at: Option<DateTime<Utc>>,
    ) -> Self {
        let now = super::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            description,
            in_diet,
            consumed_at: consumed_at.map_or(now, super::stored_time),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update, refreshing `updated_at`.
    pub fn apply(&mut self, changes: MealChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(description) = changes.description {
            self.description = Some(description);
        }
        if let Some(in_diet) = changes.in_diet {
            self.in_diet = in_diet;
        }
        if let Some(consumed_at) = changes.consumed_at {
            self.consumed_at = super::stored_time(consumed_at);
        }
        self.updated_at = super::now();
    }
}

/// Fields a client may change on an existing meal. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MealChanges {
    pub name: Option<String>,
    /// Can replace the description but not clear it: `None` keeps the current one.
    pub description: Option<String>,
    pub in_diet: Option<bool>,
    pub consumed_at: Option<DateTime<Utc>>,
}

impl MealChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.in_diet.is_none()
            && self.consumed_at.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_consumed_at_defaults_to_creation_time() {
        let meal = Meal::new(Uuid::new_v4(), "Salad".into(), None, true, None);
        assert_eq!(meal.consumed_at, meal.created_at);
        assert_eq!(meal.created_at, meal.updated_at);
    }

    #[test]
    fn test_apply_only_touches_given_fields() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let mut meal = Meal::new(
            Uuid::new_v4(),
            "Burger".into(),
            Some("double".into()),
            false,
            Some(at),
        );
        let before = meal.clone();

        meal.apply(MealChanges {
            in_diet: Some(true),
            ..Default::default()
        });

        assert!(meal.in_diet);
        assert_eq!(meal.name, before.name);
        assert_eq!(meal.description, before.description);
        assert_eq!(meal.consumed_at, at);
        assert!(meal.updated_at >= before.updated_at);
    }

    #[test]
    fn test_times_are_kept_at_microsecond_precision() {
        let nanos = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
            + chrono::Duration::nanoseconds(123_456_789);
        let mut meal = Meal::new(Uuid::new_v4(), "Tea".into(), None, true, Some(nanos));
        assert_eq!(meal.consumed_at.timestamp_subsec_nanos(), 123_456_000);
        assert_eq!(meal.created_at.timestamp_subsec_nanos() % 1_000, 0);

        meal.apply(MealChanges {
            consumed_at: Some(nanos + chrono::Duration::nanoseconds(999)),
            ..Default::default()
        });
        assert_eq!(meal.consumed_at.timestamp_subsec_nanos(), 123_456_000);
        assert_eq!(meal.updated_at.timestamp_subsec_nanos() % 1_000, 0);
    }

    #[test]
    fn test_serializes_with_snake_case_keys() {
        let meal = Meal::new(Uuid::new_v4(), "Soup".into(), None, true, None);
        let value = serde_json::to_value(&meal).unwrap();
        for key in [
            "id",
            "user_id",
            "name",
            "description",
            "in_diet",
            "consumed_at",
            "created_at",
            "updated_at",
        ] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
    }
}
