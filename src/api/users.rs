use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::cookie::CookieJar;
use serde_json::{Value, json};

use super::JsonBody;
use crate::AppState;
use crate::domain::User;
use crate::error::ApiResult;
use crate::security::SessionUser;
use crate::security::session::{removal_cookie, session_cookie};
use crate::validation::Validator;

/// POST /users - Register a user and start their session
pub async fn create_user(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(body): JsonBody,
) -> ApiResult<(CookieJar, (StatusCode, Json<Value>))> {
    let mut v = Validator::new();
    let name = v.object(&body).and_then(|b| v.required_string(b, "name"));
    let name = v.finish_with(name)?;

    let user = User::new(name);
    state.persistence.create_user(&user).await?;

    tracing::info!(user_id = %user.id, "Created user");

    let jar = jar.add(session_cookie(&state.config.session, user.session_id));
    Ok((jar, (StatusCode::CREATED, Json(json!({ "user": user })))))
}

/// GET /users/{user_id} - Profile of the session owner
pub async fn get_user(session: SessionUser) -> Json<Value> {
    Json(json!({ "user": session.user }))
}

/// PUT /users/{user_id} - Rename the session owner
pub async fn update_user(
    State(state): State<AppState>,
    session: SessionUser,
    JsonBody(body): JsonBody,
) -> ApiResult<Json<Value>> {
    let mut v = Validator::new();
    let name = v.object(&body).and_then(|b| v.optional_name(b, "name"));
    v.finish()?;

    let mut user = session.user;
    if let Some(name) = name {
        user.rename(name);
        state.persistence.update_user(&user).await?;
    }

    Ok(Json(json!({ "user": user })))
}

/// DELETE /users/{user_id} - Remove the session owner and all their meals
pub async fn delete_user(
    State(state): State<AppState>,
    session: SessionUser,
    jar: CookieJar,
) -> ApiResult<(CookieJar, StatusCode)> {
    state.persistence.delete_user(session.user.id).await?;

    tracing::info!(user_id = %session.user.id, "Deleted user");

    let jar = jar.add(removal_cookie(&state.config.session));
    Ok((jar, StatusCode::NO_CONTENT))
}
