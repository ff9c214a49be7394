//! Session based authentication for API and UI handlers.

use crate::api::routes::AppState;
use crate::config::hardcoded::{LOGIN_PATH, SESSION_COOKIE};
use crate::error::{AppError, Result};
use crate::models::User;
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, header, request::Parts};
use axum::response::{IntoResponse, Redirect, Response};

pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, token)| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

pub fn session_cookie(token: &str, max_age_secs: i64) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, token, max_age_secs
    )
}

pub fn clear_session_cookie() -> String {
    session_cookie("", 0)
}

async fn resolve_user(parts: &Parts, state: &AppState) -> Result<Option<User>> {
    let Some(token) = session_token(&parts.headers) else {
        return Ok(None);
    };
    state.auth_service.user_for_session(&token).await
}

/// Only local absolute paths are accepted as redirect targets.
pub fn safe_next(next: Option<&str>, fallback: &str) -> String {
    match next {
        Some(next) if next.starts_with('/') && !next.starts_with("//") && !next.contains('\\') => {
            next.to_string()
        }
        _ => fallback.to_string(),
    }
}

pub fn login_redirect(next: &str) -> Redirect {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("next", next)
        .finish();
    Redirect::to(&format!("{}?{}", LOGIN_PATH, query))
}

/// Authenticated user of an API request.
pub struct AuthUser(pub User);

impl AuthUser {
    pub fn require_superuser(&self) -> Result<()> {
        if self.0.is_superuser {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        resolve_user(parts, state)
            .await?
            .map(AuthUser)
            .ok_or(AppError::Unauthenticated)
    }
}

/// Authenticated user of a UI page; anonymous visitors are sent to the login page.
pub struct UiUser(pub User);

impl FromRequestParts<AppState> for UiUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        match resolve_user(parts, state).await {
            Ok(Some(user)) => Ok(UiUser(user)),
            Ok(None) => Err(login_redirect(parts.uri.path()).into_response()),
            Err(e) => Err(e.into_response()),
        }
    }
}

/// The session user if there is one.
pub struct MaybeUser(pub Option<User>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        Ok(MaybeUser(resolve_user(parts, state).await?))
    }
}
