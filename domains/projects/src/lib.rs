//! Projects domain: project registry, file store, settings, ZIP archives

pub mod api;
pub mod archive;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{
    normalize_path, FileSummary, Project, ProjectFile, ProjectStatus, MAX_CONTENT_BYTES,
};
pub use domain::state::{ProjectEvent, ProjectState, ProjectStateMachine, StateError};

// Re-export repository types
pub use repository::{
    FileRepository, ProjectRepository, ProjectUpdate, ProjectsRepositories, SettingsRepository,
};

// Re-export API types
pub use api::routes;
pub use api::ProjectsState;
