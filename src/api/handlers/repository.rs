use crate::api::dto::repository::{
    RepositoriesListResponse, RepositoryRequest, RepositoryResponse,
};
use crate::api::extract::AuthUser;
use crate::api::routes::AppState;
use crate::error::Result;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};

pub async fn list_repositories(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<RepositoriesListResponse>> {
    user.require_superuser()?;
    let repositories = state.repository_service.list().await?;
    Ok(Json(RepositoriesListResponse {
        data: repositories
            .into_iter()
            .map(RepositoryResponse::from)
            .collect(),
    }))
}

pub async fn create_repository(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<RepositoryRequest>,
) -> Result<(StatusCode, Json<RepositoryResponse>)> {
    user.require_superuser()?;
    let repository = state.repository_service.create(req.into()).await?;
    Ok((StatusCode::CREATED, Json(RepositoryResponse::from(repository))))
}

pub async fn delete_repository(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    user.require_superuser()?;
    state.repository_service.delete(id).await?;
    Ok(Json(json!({ "msg": "Repository deleted" })))
}
