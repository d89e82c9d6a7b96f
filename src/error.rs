use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::validation::ValidationError;

/// Errors surfaced by the HTTP handlers.
///
/// A bad or foreign session token is reported as a missing user so that a
/// caller cannot probe which user ids exist.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("User not found.")]
    UserNotFound,

    #[error("Meal not found.")]
    MealNotFound,

    #[error("Error on validate schema.")]
    Validation(#[from] ValidationError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::UserNotFound | ApiError::MealNotFound => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": self.to_string() }))).into_response()
            }
            ApiError::Validation(ref details) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "error": self.to_string(), "details": details })),
            )
                .into_response(),
            ApiError::Internal(ref e) => {
                tracing::error!(error = ?e, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error." })),
                )
                    .into_response()
            }
        }
    }
}
