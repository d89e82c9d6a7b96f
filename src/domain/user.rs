use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A diet tracker account.
///
/// The session token is a bearer credential for everything the user owns,
/// so it is never written into response bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub session_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a user with a freshly issued session token.
    pub fn new(name: String) -> Self {
        let now = super::now();
        Self {
            id: Uuid::new_v4(),
            session_id: Uuid::new_v4(),
            name,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn rename(&mut self, name: String) {
        self.name = name;
        self.updated_at = super::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_token_is_not_serialized() {
        let user = User::new("Ana".into());
        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("session_id").is_none());
        assert_eq!(value["name"], "Ana");
    }

    #[test]
    fn test_times_are_kept_at_microsecond_precision() {
        let mut user = User::new("Ana".into());
        assert_eq!(user.created_at.timestamp_subsec_nanos() % 1_000, 0);
        user.rename("Bia".into());
        assert_eq!(user.updated_at.timestamp_subsec_nanos() % 1_000, 0);
    }

    #[test]
    fn test_each_user_gets_a_distinct_token() {
        let a = User::new("a".into());
        let b = User::new("b".into());
        assert_ne!(a.session_id, b.session_id);
        assert_ne!(a.id, a.session_id);
    }
}
