//! HTTP handlers for projects and their files

pub mod files;
pub mod projects;

use shipwright_common::{Error, Result};
use uuid::Uuid;

use crate::domain::entities::Project;
use crate::ProjectsRepositories;

/// Load a project or fail with 404
pub async fn require_project(repos: &ProjectsRepositories, id: Uuid) -> Result<Project> {
    repos
        .projects
        .find(id)
        .await?
        .ok_or_else(|| Error::NotFound("Project not found".to_string()))
}
