use crate::api::dto::user::{
    CreateUserRequest, GroupRequest, GroupResponse, GroupsListResponse, UserResponse,
    UsersListResponse,
};
use crate::api::extract::AuthUser;
use crate::api::routes::AppState;
use crate::error::{AppError, Result};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};

pub async fn list_users(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<UsersListResponse>> {
    user.require_superuser()?;
    let users = state.auth_service.list_users().await?;
    Ok(Json(UsersListResponse {
        data: users.into_iter().map(UserResponse::from).collect(),
    }))
}

pub async fn create_user(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    user.require_superuser()?;
    let created = state
        .auth_service
        .create_user(&req.username, &req.password, req.is_superuser)
        .await?;
    tracing::info!("User '{}' created by '{}'", created.username, user.0.username);
    Ok((StatusCode::CREATED, Json(UserResponse::from(created))))
}

pub async fn delete_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    user.require_superuser()?;
    if user.0.id == id {
        return Err(AppError::InvalidInput(
            "Cannot delete the current user".to_string(),
        ));
    }
    state.auth_service.delete_user(id).await?;
    Ok(Json(json!({ "msg": "User deleted" })))
}

pub async fn list_groups(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<GroupsListResponse>> {
    user.require_superuser()?;
    let groups = state.auth_service.list_groups().await?;
    Ok(Json(GroupsListResponse {
        data: groups
            .into_iter()
            .map(|(group, users)| GroupResponse::new(group, users))
            .collect(),
    }))
}

pub async fn create_group(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<GroupRequest>,
) -> Result<(StatusCode, Json<GroupResponse>)> {
    user.require_superuser()?;
    let group = state.auth_service.create_group(&req.name, &req.users).await?;
    Ok((StatusCode::CREATED, Json(GroupResponse::new(group, req.users))))
}

pub async fn delete_group(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    user.require_superuser()?;
    state.auth_service.delete_group(id).await?;
    Ok(Json(json!({ "msg": "Group deleted" })))
}
