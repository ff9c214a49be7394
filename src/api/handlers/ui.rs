use crate::api::extract::{MaybeUser, login_redirect};
use crate::api::routes::AppState;
use crate::api::templates::{page_context, render};
use crate::config::hardcoded::LOGIN_PATH;
use crate::error::Result;
use axum::{
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Redirect, Response},
};

/// Login-gated UI entrypoint. Any method needs a session; POST needs write and PUT execute rights.
pub async fn ui(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    MaybeUser(user): MaybeUser,
) -> Result<Response> {
    let Some(user) = user else {
        return Ok(login_redirect(uri.path()).into_response());
    };
    if !matches!(method, Method::GET | Method::POST | Method::PUT) {
        return Ok(StatusCode::METHOD_NOT_ALLOWED.into_response());
    }

    let allowed = match method {
        Method::POST => state.permission_service.authorized_to_write(&user).await?,
        Method::PUT => state.permission_service.authorized_to_exec(&user).await?,
        _ => true,
    };
    if !allowed {
        tracing::debug!("User '{}' denied {} {}", user.username, method, uri.path());
        return Ok(login_redirect(uri.path()).into_response());
    }

    let content = match method {
        Method::POST => "OK - write",
        Method::PUT => "OK - exec",
        _ => "OK - read",
    };
    let mut context = page_context(&state.config, Some(&user));
    context.insert("content", content);
    render(&state.templates, "fallback.html", &context, StatusCode::OK)
}

pub async fn catchall(State(state): State<AppState>, MaybeUser(user): MaybeUser) -> Redirect {
    match user {
        Some(_) => Redirect::to(&state.config.login_redirect),
        None => Redirect::to(LOGIN_PATH),
    }
}
