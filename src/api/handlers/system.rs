use crate::api::extract::{AuthUser, UiUser};
use crate::api::routes::AppState;
use crate::api::templates::{page_context, render};
use crate::error::Result;
use crate::services::system_service::Environment;
use axum::{Json, extract::State, http::StatusCode, response::Response};

pub async fn environment_page(
    State(state): State<AppState>,
    UiUser(user): UiUser,
) -> Result<Response> {
    let environment = state.system_service.environment().await;
    let mut context = page_context(&state.config, Some(&user));
    context.insert("env_system", &environment.env_system);
    context.insert("env_python_modules", &environment.env_python_modules);
    context.insert("env_ansible_config", &environment.env_ansible_config);
    context.insert("env_ansible_collections", &environment.env_ansible_collections);
    render(&state.templates, "system/environment.html", &context, StatusCode::OK)
}

pub async fn config_page(State(state): State<AppState>, UiUser(user): UiUser) -> Result<Response> {
    let mut context = page_context(&state.config, Some(&user));
    context.insert("env_vars_config", &state.config.settings());
    render(&state.templates, "system/config.html", &context, StatusCode::OK)
}

pub async fn environment(State(state): State<AppState>, _user: AuthUser) -> Json<Environment> {
    Json(state.system_service.environment().await)
}
