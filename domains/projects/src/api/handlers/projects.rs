//! Project management API handlers

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use shipwright_common::{Error, Result, ValidatedJson};
use uuid::Uuid;
use validator::Validate;

use super::require_project;
use crate::api::middleware::ProjectsState;
use crate::archive::{export_zip, import_zip};
use crate::domain::entities::{Project, ProjectStatus};
use crate::repository::ProjectUpdate;

/// Name given to imported projects when the caller supplies none
const DEFAULT_IMPORT_NAME: &str = "Imported project";

/// Request for creating a project
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
}

/// Request for updating a project
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub status: Option<ProjectStatus>,
}

#[derive(Debug, Deserialize)]
pub struct ImportQuery {
    pub name: Option<String>,
}

/// List all projects
pub async fn list_projects(State(state): State<ProjectsState>) -> Result<Json<Vec<Project>>> {
    let projects = state.repos.projects.list().await?;
    Ok(Json(projects))
}

/// Create an empty project
pub async fn create_project(
    State(state): State<ProjectsState>,
    ValidatedJson(req): ValidatedJson<CreateProjectRequest>,
) -> Result<(StatusCode, Json<Project>)> {
    let project = Project::new(req.name)?;
    let created = state.repos.projects.create(&project).await?;

    tracing::info!(project_id = %created.id, "Created project");
    Ok((StatusCode::CREATED, Json(created)))
}

/// Get a single project by ID
pub async fn get_project(
    State(state): State<ProjectsState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Project>> {
    let project = require_project(&state.repos, id).await?;
    Ok(Json(project))
}

/// Rename a project and/or change its status
pub async fn update_project(
    State(state): State<ProjectsState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateProjectRequest>,
) -> Result<Json<Project>> {
    let update = ProjectUpdate {
        name: req.name,
        status: req.status,
    };

    let project = state
        .repos
        .projects
        .update(id, update)
        .await?
        .ok_or_else(|| Error::NotFound("Project not found".to_string()))?;

    Ok(Json(project))
}

/// Delete a project and all of its files
pub async fn delete_project(
    State(state): State<ProjectsState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    if !state.repos.projects.delete(id).await? {
        return Err(Error::NotFound("Project not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Download every file of a project as a ZIP archive
pub async fn export_project(
    State(state): State<ProjectsState>,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    let project = require_project(&state.repos, id).await?;
    let files = state.repos.files.list(id).await?;
    let bytes = export_zip(&files)?;

    let disposition = format!(
        "attachment; filename=\"{}.zip\"",
        download_name(&project.name)
    );
    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

/// Create a project from an uploaded ZIP archive
pub async fn import_project(
    State(state): State<ProjectsState>,
    Query(query): Query<ImportQuery>,
    body: Bytes,
) -> Result<(StatusCode, Json<Project>)> {
    let files = import_zip(&body)?;
    let name = query
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_IMPORT_NAME.to_string());

    let project = Project::new(name)?;
    let created = state
        .repos
        .projects
        .create_with_files(&project, &files)
        .await?;

    tracing::info!(project_id = %created.id, files = files.len(), "Imported project");
    Ok((StatusCode::CREATED, Json(created)))
}

/// Filesystem-safe download name derived from the project name
pub fn download_name(name: &str) -> String {
    let slug: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "project".to_string()
    } else {
        slug.to_string()
    }
}
