//! HTTP routes for users and their meals.

pub mod meals;
pub mod users;

use axum::{
    Json, Router,
    extract::{FromRequest, Request},
    routing::{get, post},
};
use serde_json::Value;

use crate::AppState;
use crate::error::ApiError;
use crate::validation::{FieldIssue, ValidationError};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", post(users::create_user))
        .route(
            "/users/{user_id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/users/{user_id}/meals",
            get(meals::list_meals).post(meals::create_meal),
        )
        .route("/users/{user_id}/meals/summary", get(meals::summary))
        .route(
            "/users/{user_id}/meals/{meal_id}",
            get(meals::get_meal)
                .put(meals::update_meal)
                .delete(meals::delete_meal),
        )
}

/// JSON body whose parse failures are reported like any other validation issue.
#[derive(Debug)]
pub struct JsonBody(pub Value);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, ApiError> {
        match Json::<Value>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::Validation(ValidationError {
                issues: vec![FieldIssue {
                    path: "body".to_string(),
                    message: rejection.body_text(),
                }],
            })),
        }
    }
}
