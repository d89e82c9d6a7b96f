//! Users, meals and the diet summary computed over them.

pub mod meal;
pub mod summary;
pub mod user;

pub use meal::{Meal, MealChanges};
pub use summary::{Summary, summarize};
pub use user::User;

use chrono::{DateTime, SubsecRound, Utc};

/// Microseconds are the finest precision both SQLite text and Postgres
/// `TIMESTAMPTZ` round-trip, so stored times never carry more.
pub(crate) fn stored_time(at: DateTime<Utc>) -> DateTime<Utc> {
    at.trunc_subsecs(6)
}

/// Current time at stored precision.
pub(crate) fn now() -> DateTime<Utc> {
    stored_time(Utc::now())
}
