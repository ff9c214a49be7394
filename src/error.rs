use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Job not found: {0}")]
    JobNotFound(i64),

    #[error("Job already exists: {0}")]
    JobAlreadyExists(i64),

    #[error("Execution not found: {0}")]
    ExecutionNotFound(i64),

    #[error("Permission not found: {0}")]
    PermissionNotFound(i64),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Group not found: {0}")]
    GroupNotFound(String),

    #[error("Repository not found")]
    RepositoryNotFound,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Traversal not allowed")]
    TraversalDenied,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Not permitted")]
    Forbidden,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password hash error: {0}")]
    PasswordHash(String),

    #[error("Execution error: {0}")]
    Execution(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            AppError::Io(e) => {
                tracing::error!("IO error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            AppError::Template(e) => {
                tracing::error!("Template error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            AppError::JobNotFound(id) => (StatusCode::NOT_FOUND, format!("Job '{}' not found", id)),
            AppError::JobAlreadyExists(id) => (
                StatusCode::CONFLICT,
                format!("Job id '{}' already exists", id),
            ),
            AppError::ExecutionNotFound(id) => (
                StatusCode::NOT_FOUND,
                format!("Execution '{}' not found", id),
            ),
            AppError::PermissionNotFound(id) => (
                StatusCode::NOT_FOUND,
                format!("Permission '{}' not found", id),
            ),
            AppError::UserNotFound(user) => {
                (StatusCode::NOT_FOUND, format!("User '{}' not found", user))
            }
            AppError::GroupNotFound(group) => {
                (StatusCode::NOT_FOUND, format!("Group '{}' not found", group))
            }
            AppError::RepositoryNotFound => (
                StatusCode::NOT_FOUND,
                "Provided repository does not exist".to_string(),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::TraversalDenied => {
                (StatusCode::FORBIDDEN, "Traversal not allowed".to_string())
            }
            AppError::Unauthenticated => {
                (StatusCode::FORBIDDEN, "Authentication required".to_string())
            }
            AppError::Forbidden => (StatusCode::FORBIDDEN, "Not permitted".to_string()),
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
            }
            AppError::PasswordHash(e) => {
                tracing::error!("Password hash error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e)
            }
            AppError::Execution(e) => {
                tracing::error!("Execution error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e)
            }
            AppError::Config(e) => (StatusCode::INTERNAL_SERVER_ERROR, e),
        };

        let body = json!({
            "msg": message
        });

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
