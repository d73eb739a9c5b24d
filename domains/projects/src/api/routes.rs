//! Route definitions for Projects domain API

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{files, projects};
use super::middleware::ProjectsState;

/// Create project routes
fn project_routes() -> Router<ProjectsState> {
    Router::new()
        .route(
            "/v1/projects",
            get(projects::list_projects).post(projects::create_project),
        )
        .route("/v1/projects/import", post(projects::import_project))
        .route(
            "/v1/projects/{id}",
            get(projects::get_project)
                .patch(projects::update_project)
                .delete(projects::delete_project),
        )
        .route("/v1/projects/{id}/export", get(projects::export_project))
}

/// Create file routes
fn file_routes() -> Router<ProjectsState> {
    Router::new()
        .route("/v1/projects/{id}/files", get(files::list_files))
        .route(
            "/v1/projects/{id}/files/{*path}",
            get(files::get_file)
                .put(files::put_file)
                .delete(files::delete_file),
        )
        .route("/v1/projects/{id}/rename", post(files::rename_file))
}

/// Create all Projects domain API routes
pub fn routes() -> Router<ProjectsState> {
    Router::new().merge(project_routes()).merge(file_routes())
}
