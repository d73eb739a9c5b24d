//! File store API handlers
//!
//! Every successful write, rename or delete bumps the owning project's
//! `last_modified`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use shipwright_common::{Error, Result, ValidatedJson};
use uuid::Uuid;
use validator::Validate;

use super::require_project;
use crate::api::middleware::ProjectsState;
use crate::domain::entities::{FileSummary, ProjectFile};

/// Request body for writing a file
#[derive(Debug, Deserialize, Validate)]
pub struct PutFileRequest {
    pub content: String,
}

/// Request body for renaming a file
#[derive(Debug, Deserialize, Validate)]
pub struct RenameFileRequest {
    #[validate(length(min = 1))]
    pub from: String,
    #[validate(length(min = 1))]
    pub to: String,
}

fn project_not_found() -> Error {
    Error::NotFound("Project not found".to_string())
}

/// List file paths and sizes of a project
pub async fn list_files(
    State(state): State<ProjectsState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<FileSummary>>> {
    require_project(&state.repos, id).await?;
    let files = state.repos.files.list_summaries(id).await?;
    Ok(Json(files))
}

/// Read one file
pub async fn get_file(
    State(state): State<ProjectsState>,
    Path((id, path)): Path<(Uuid, String)>,
) -> Result<Json<ProjectFile>> {
    require_project(&state.repos, id).await?;
    let file = state
        .repos
        .files
        .get(id, &path)
        .await?
        .ok_or_else(|| Error::NotFound("File not found".to_string()))?;
    Ok(Json(file))
}

/// Create or overwrite one file
pub async fn put_file(
    State(state): State<ProjectsState>,
    Path((id, path)): Path<(Uuid, String)>,
    ValidatedJson(req): ValidatedJson<PutFileRequest>,
) -> Result<Json<ProjectFile>> {
    let file = state
        .repos
        .projects
        .put_file(id, &path, &req.content)
        .await?
        .ok_or_else(project_not_found)?;
    Ok(Json(file))
}

/// Delete one file
pub async fn delete_file(
    State(state): State<ProjectsState>,
    Path((id, path)): Path<(Uuid, String)>,
) -> Result<StatusCode> {
    require_project(&state.repos, id).await?;
    if !state.repos.files.delete(id, &path).await? {
        return Err(Error::NotFound("File not found".to_string()));
    }
    state
        .repos
        .projects
        .touch(id)
        .await?
        .ok_or_else(project_not_found)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Move a file to a new path, replacing any file already there
pub async fn rename_file(
    State(state): State<ProjectsState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<RenameFileRequest>,
) -> Result<Json<ProjectFile>> {
    require_project(&state.repos, id).await?;
    let file = state
        .repos
        .files
        .rename(id, &req.from, &req.to)
        .await?
        .ok_or_else(|| Error::NotFound("File not found".to_string()))?;
    state
        .repos
        .projects
        .touch(id)
        .await?
        .ok_or_else(project_not_found)?;
    Ok(Json(file))
}
