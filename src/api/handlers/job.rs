use crate::api::dto::job::{JobRequest, JobResponse, JobsListResponse};
use crate::api::extract::AuthUser;
use crate::api::routes::AppState;
use crate::error::{AppError, Result};
use crate::models::PermissionLevel;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};

pub async fn list_jobs(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<JobsListResponse>> {
    let jobs = state.job_service.list_jobs(&user).await?;
    Ok(Json(JobsListResponse {
        data: jobs.into_iter().map(JobResponse::from).collect(),
    }))
}

pub async fn create_job(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<JobRequest>,
) -> Result<(StatusCode, Json<JobResponse>)> {
    let job_id = req
        .job_id
        .ok_or_else(|| AppError::InvalidInput("job_id is required".to_string()))?;
    let job = state
        .job_service
        .create_job(&user, req.into_new_job(job_id))
        .await?;
    Ok((StatusCode::CREATED, Json(JobResponse::from(job))))
}

pub async fn get_job(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(job_id): Path<i64>,
) -> Result<Json<JobResponse>> {
    let job = state
        .job_service
        .get_job(&user, job_id, PermissionLevel::Read)
        .await?;
    Ok(Json(JobResponse::from(job)))
}

pub async fn update_job(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(job_id): Path<i64>,
    Json(req): Json<JobRequest>,
) -> Result<Json<JobResponse>> {
    if req.job_id.is_some_and(|id| id != job_id) {
        return Err(AppError::InvalidInput("job_id cannot be changed".to_string()));
    }
    let job = state
        .job_service
        .update_job(&user, req.into_new_job(job_id))
        .await?;
    Ok(Json(JobResponse::from(job)))
}

pub async fn delete_job(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(job_id): Path<i64>,
) -> Result<Json<Value>> {
    state.job_service.delete_job(&user, job_id).await?;
    Ok(Json(json!({ "msg": format!("Job {} deleted", job_id) })))
}
