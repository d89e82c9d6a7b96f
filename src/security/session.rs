//! Session token gate for everything under `/users/{user_id}`.

use std::collections::HashMap;

use axum::{
    extract::{FromRequestParts, Path},
    http::{header, request::Parts},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use uuid::Uuid;

use crate::AppState;
use crate::config::SessionConfig;
use crate::domain::User;
use crate::error::ApiError;

/// The user addressed by the path, proven by their session token.
///
/// The token comes from the session cookie, or from an
/// `Authorization: Bearer` header for clients without a cookie jar.
/// Any mismatch, including a token that is not a UUID, is rejected as
/// [`ApiError::UserNotFound`].
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub user: User,
}

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                tracing::debug!(error = %e, "Missing user id in path");
                ApiError::UserNotFound
            })?;

        let user_id = params
            .get("user_id")
            .and_then(|raw| Uuid::parse_str(raw).ok())
            .ok_or(ApiError::UserNotFound)?;

        let token = session_token(parts, &state.config.session.cookie_name)
            .ok_or(ApiError::UserNotFound)?;
        let session_id = Uuid::parse_str(&token).map_err(|e| {
            tracing::debug!(error = %e, %user_id, "Malformed session token");
            ApiError::UserNotFound
        })?;

        let user = state
            .persistence
            .authenticate(user_id, session_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;

        Ok(Self { user })
    }
}

fn session_token(parts: &Parts, cookie_name: &str) -> Option<String> {
    let jar = CookieJar::from_headers(&parts.headers);
    if let Some(cookie) = jar.get(cookie_name) {
        return Some(cookie.value().to_string());
    }

    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
}

/// Cookie handed out when a user is created.
pub fn session_cookie(config: &SessionConfig, session_id: Uuid) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), session_id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(config.max_age_days))
        .build()
}

/// Expired cookie that clears the session on the client.
///
/// Added to the jar rather than removed from it, so it is sent even when the
/// request authenticated with a bearer header and carried no cookie.
pub fn removal_cookie(config: &SessionConfig) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::ZERO)
        .build()
}
