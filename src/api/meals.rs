use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

use super::JsonBody;
use crate::AppState;
use crate::domain::{Meal, MealChanges, summarize};
use crate::error::{ApiError, ApiResult};
use crate::security::SessionUser;
use crate::validation::Validator;

/// Path of a single meal. The owning `user_id` is checked by [`SessionUser`].
#[derive(Debug, Deserialize)]
pub struct MealPath {
    meal_id: String,
}

/// GET /users/{user_id}/meals - Every meal of the user, oldest first
pub async fn list_meals(
    State(state): State<AppState>,
    session: SessionUser,
) -> ApiResult<Json<Value>> {
    let meals = state.persistence.list_meals(session.user.id).await?;
    Ok(Json(json!({ "meals": meals })))
}

/// GET /users/{user_id}/meals/summary - Diet adherence summary
pub async fn summary(
    State(state): State<AppState>,
    session: SessionUser,
) -> ApiResult<Json<Value>> {
    let meals = state.persistence.list_meals(session.user.id).await?;
    let summary = summarize(&meals);

    tracing::debug!(
        user_id = %session.user.id,
        amount = summary.amount,
        best_sequence = summary.best_sequence_in_diet.len(),
        "Computed meal summary"
    );

    Ok(Json(json!({ "summary": summary })))
}

/// GET /users/{user_id}/meals/{meal_id} - A single meal
pub async fn get_meal(
    State(state): State<AppState>,
    session: SessionUser,
    Path(path): Path<MealPath>,
) -> ApiResult<Json<Value>> {
    let mut v = Validator::new();
    let meal_id = v.uuid("mealId", &path.meal_id);
    let meal_id = v.finish_with(meal_id)?;

    let meal = state
        .persistence
        .get_meal(session.user.id, meal_id)
        .await?
        .ok_or(ApiError::MealNotFound)?;

    Ok(Json(json!({ "meal": meal })))
}

/// POST /users/{user_id}/meals - Log a meal
pub async fn create_meal(
    State(state): State<AppState>,
    session: SessionUser,
    JsonBody(body): JsonBody,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let mut v = Validator::new();
    let fields = v.object(&body);
    let name = fields.and_then(|b| v.required_string(b, "name"));
    let description = fields.and_then(|b| v.optional_string(b, "description"));
    let in_diet = fields.and_then(|b| v.required_bool(b, "inDiet"));
    let consumed_at = fields.and_then(|b| v.optional_timestamp(b, "consumedAt"));
    let (name, in_diet) = v.finish_with(name.zip(in_diet))?;

    let meal = Meal::new(session.user.id, name, description, in_diet, consumed_at);
    state.persistence.create_meal(&meal).await?;

    tracing::info!(user_id = %meal.user_id, meal_id = %meal.id, in_diet = meal.in_diet, "Created meal");

    Ok((StatusCode::CREATED, Json(json!({ "meal": meal }))))
}

/// PUT /users/{user_id}/meals/{meal_id} - Change some fields of a meal
pub async fn update_meal(
    State(state): State<AppState>,
    session: SessionUser,
    Path(path): Path<MealPath>,
    JsonBody(body): JsonBody,
) -> ApiResult<Json<Value>> {
    let mut v = Validator::new();
    let meal_id = v.uuid("mealId", &path.meal_id);
    let fields = v.object(&body);
    let changes = MealChanges {
        name: fields.and_then(|b| v.optional_name(b, "name")),
        description: fields.and_then(|b| v.optional_string(b, "description")),
        in_diet: fields.and_then(|b| v.optional_bool(b, "inDiet")),
        consumed_at: fields.and_then(|b| v.optional_timestamp(b, "consumedAt")),
    };
    let meal_id = v.finish_with(meal_id)?;

    let mut meal = state
        .persistence
        .get_meal(session.user.id, meal_id)
        .await?
        .ok_or(ApiError::MealNotFound)?;

    if !changes.is_empty() {
        meal.apply(changes);
        if !state.persistence.update_meal(&meal).await? {
            // Deleted between the read and the write.
            return Err(ApiError::MealNotFound);
        }
    }

    Ok(Json(json!({ "meal": meal })))
}

/// DELETE /users/{user_id}/meals/{meal_id} - Forget a meal
pub async fn delete_meal(
    State(state): State<AppState>,
    session: SessionUser,
    Path(path): Path<MealPath>,
) -> ApiResult<StatusCode> {
    let mut v = Validator::new();
    let meal_id = v.uuid("mealId", &path.meal_id);
    let meal_id = v.finish_with(meal_id)?;

    if !state.persistence.delete_meal(session.user.id, meal_id).await? {
        return Err(ApiError::MealNotFound);
    }

    tracing::info!(user_id = %session.user.id, %meal_id, "Deleted meal");
    Ok(StatusCode::NO_CONTENT)
}
