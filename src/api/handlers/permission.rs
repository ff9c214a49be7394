use crate::api::dto::permission::{PermissionRequest, PermissionResponse, PermissionsListResponse};
use crate::api::extract::AuthUser;
use crate::api::routes::AppState;
use crate::error::Result;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};

pub async fn list_permissions(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<PermissionsListResponse>> {
    user.require_superuser()?;
    let permissions = state.permission_service.list().await?;
    Ok(Json(PermissionsListResponse {
        data: permissions.into_iter().map(PermissionResponse::from).collect(),
    }))
}

pub async fn create_permission(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<PermissionRequest>,
) -> Result<(StatusCode, Json<PermissionResponse>)> {
    user.require_superuser()?;
    let permission = state
        .permission_service
        .create(&req.name, req.permission, &req.users, &req.groups)
        .await?;
    Ok((StatusCode::CREATED, Json(PermissionResponse::from(permission))))
}

pub async fn get_permission(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<PermissionResponse>> {
    user.require_superuser()?;
    let permission = state.permission_service.get(id).await?;
    Ok(Json(PermissionResponse::from(permission)))
}

pub async fn update_permission(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<PermissionRequest>,
) -> Result<Json<PermissionResponse>> {
    user.require_superuser()?;
    let permission = state
        .permission_service
        .update(id, &req.name, req.permission, &req.users, &req.groups)
        .await?;
    Ok(Json(PermissionResponse::from(permission)))
}

pub async fn delete_permission(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    user.require_superuser()?;
    state.permission_service.delete(id).await?;
    Ok(Json(json!({ "msg": "Permission deleted" })))
}
