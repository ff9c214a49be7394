use crate::api::dto::filesystem::FileSystemReadResponse;
use crate::api::extract::AuthUser;
use crate::api::routes::AppState;
use crate::error::Result;
use axum::{
    Json,
    extract::{Query, State},
};
use std::collections::HashMap;

pub async fn browse(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<FileSystemReadResponse>> {
    let listing = state
        .browse_service
        .browse(
            params.get("repository").map(String::as_str),
            params.get("base").map(String::as_str),
        )
        .await?;
    Ok(Json(FileSystemReadResponse::from(listing)))
}
