use crate::api::dto::execution::{ExecutionResponse, ExecutionsListResponse};
use crate::api::extract::AuthUser;
use crate::api::routes::AppState;
use crate::error::Result;
use crate::models::PermissionLevel;
use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};

pub async fn execute_job(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(job_id): Path<i64>,
) -> Result<(StatusCode, Json<ExecutionResponse>)> {
    let job = state
        .job_service
        .get_job(&user, job_id, PermissionLevel::Execute)
        .await?;

    let execution = state
        .execution_service
        .execute_job(job.job_id, Some(user.id))
        .await?;
    Ok((StatusCode::ACCEPTED, Json(ExecutionResponse::from(execution))))
}

pub async fn list_executions(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(job_id): Path<i64>,
) -> Result<Json<ExecutionsListResponse>> {
    let job = state
        .job_service
        .get_job(&user, job_id, PermissionLevel::Read)
        .await?;

    let executions = state.execution_service.list_executions(&job).await?;
    let response = ExecutionsListResponse {
        data: executions
            .into_iter()
            .map(ExecutionResponse::from)
            .collect(),
    };
    Ok(Json(response))
}

pub async fn get_execution(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((job_id, exec_id)): Path<(i64, i64)>,
) -> Result<Json<ExecutionResponse>> {
    let job = state
        .job_service
        .get_job(&user, job_id, PermissionLevel::Read)
        .await?;
    let detail = state.execution_service.get_execution(&job, exec_id).await?;
    Ok(Json(ExecutionResponse::from(detail)))
}

pub async fn execution_log(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((job_id, exec_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse> {
    let job = state
        .job_service
        .get_job(&user, job_id, PermissionLevel::Read)
        .await?;
    let log = state.execution_service.read_log(&job, exec_id).await?;
    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], log))
}
