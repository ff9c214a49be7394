use crate::api::extract::{MaybeUser, clear_session_cookie, safe_next, session_cookie, session_token};
use crate::api::routes::AppState;
use crate::api::templates::{page_context, render};
use crate::config::hardcoded::LOGIN_PATH;
use crate::error::{AppError, Result};
use axum::{
    Form,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub next: Option<String>,
}

fn login_page(state: &AppState, next: &str, error: Option<&str>, status: StatusCode) -> Result<Response> {
    let mut context = page_context(&state.config, None);
    context.insert("next", next);
    context.insert("error", &error);
    render(&state.templates, "login.html", &context, status)
}

pub async fn login_form(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Query(query): Query<LoginQuery>,
) -> Result<Response> {
    if user.is_some() {
        let target = safe_next(query.next.as_deref(), &state.config.login_redirect);
        return Ok(Redirect::to(&target).into_response());
    }
    login_page(&state, query.next.as_deref().unwrap_or_default(), None, StatusCode::OK)
}

pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Result<Response> {
    match state.auth_service.login(&form.username, &form.password).await {
        Ok(session) => {
            let cookie = session_cookie(&session.token, state.config.session_hours * 3600);
            let target = safe_next(form.next.as_deref(), &state.config.login_redirect);
            Ok(([(header::SET_COOKIE, cookie)], Redirect::to(&target)).into_response())
        }
        Err(AppError::InvalidCredentials) => login_page(
            &state,
            form.next.as_deref().unwrap_or_default(),
            Some("Invalid username or password"),
            StatusCode::UNAUTHORIZED,
        ),
        Err(e) => Err(e),
    }
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<Response> {
    if let Some(token) = session_token(&headers) {
        state.auth_service.logout(&token).await?;
    }
    Ok((
        [(header::SET_COOKIE, clear_session_cookie())],
        Redirect::to(LOGIN_PATH),
    )
        .into_response())
}
