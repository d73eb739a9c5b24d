//! Domain entities for Projects domain
//!
//! A project is a named collection of text files. The registry keeps the
//! project records; the file store keeps their content keyed by path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shipwright_common::{Error, Result};

use crate::domain::state::{ProjectEvent, ProjectState, ProjectStateMachine};

/// Maximum project name length in characters
pub const MAX_NAME_CHARS: usize = 200;

/// Maximum normalised file path length in bytes
pub const MAX_PATH_BYTES: usize = 1024;

/// Maximum file content size in bytes
pub const MAX_CONTENT_BYTES: usize = 5 * 1024 * 1024;

/// Project status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Active,
    Inactive,
}

impl ProjectStatus {
    /// Convert to state machine state
    pub fn to_state(&self) -> ProjectState {
        match self {
            ProjectStatus::Active => ProjectState::Active,
            ProjectStatus::Inactive => ProjectState::Inactive,
        }
    }

    /// Create from state machine state
    pub fn from_state(state: ProjectState) -> Self {
        match state {
            ProjectState::Active => ProjectStatus::Active,
            ProjectState::Inactive => ProjectStatus::Inactive,
        }
    }

    /// Get valid next states from current state
    #[mutants::skip] // Delegates to ProjectState::valid_transitions()
    pub fn valid_transitions(&self) -> Vec<ProjectStatus> {
        self.to_state()
            .valid_transitions()
            .iter()
            .map(|s| ProjectStatus::from_state(*s))
            .collect()
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.to_state().fmt(f)
    }
}

/// Project entity, stored as one element of the registry array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

impl Project {
    /// Create a new active project with validation
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = validate_name(name.into())?;

        let now = Utc::now();
        Ok(Project {
            id: Uuid::new_v4(),
            name,
            status: ProjectStatus::default(),
            created_at: now,
            last_modified: now,
        })
    }

    /// Rename the project
    pub fn rename(&mut self, name: impl Into<String>) -> Result<()> {
        self.name = validate_name(name.into())?;
        self.touch();
        Ok(())
    }

    /// Move the project to `target`; a no-op when already there
    pub fn set_status(&mut self, target: ProjectStatus) -> Result<()> {
        if self.status == target {
            return Ok(());
        }
        let event = ProjectStateMachine::event_for(self.status.to_state(), target.to_state())
            .ok_or_else(|| {
                Error::Validation(format!(
                    "Invalid project transition from '{}' to '{}'",
                    self.status, target
                ))
            })?;
        self.apply(event)
    }

    /// Park the project
    pub fn deactivate(&mut self) -> Result<()> {
        self.apply(ProjectEvent::Deactivate)
    }

    /// Put the project back into the working set
    pub fn activate(&mut self) -> Result<()> {
        self.apply(ProjectEvent::Activate)
    }

    /// Bump `last_modified`
    pub fn touch(&mut self) {
        self.last_modified = Utc::now();
    }

    fn apply(&mut self, event: ProjectEvent) -> Result<()> {
        let next = ProjectStateMachine::transition(self.status.to_state(), event)?;
        self.status = ProjectStatus::from_state(next);
        self.touch();
        Ok(())
    }
}

fn validate_name(name: String) -> Result<String> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(Error::Validation("Project name must not be empty".to_string()));
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(Error::Validation(format!(
            "Project name must be ≤{} characters",
            MAX_NAME_CHARS
        )));
    }
    Ok(name)
}

/// A file inside a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectFile {
    pub project_id: Uuid,
    pub path: String,
    pub content: String,
    pub updated_at: DateTime<Utc>,
}

impl ProjectFile {
    pub fn size_bytes(&self) -> usize {
        self.content.len()
    }

    pub fn summary(&self) -> FileSummary {
        FileSummary {
            path: self.path.clone(),
            size_bytes: self.content.len() as i64,
            updated_at: self.updated_at,
        }
    }
}

/// File listing entry without content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct FileSummary {
    pub path: String,
    pub size_bytes: i64,
    pub updated_at: DateTime<Utc>,
}

/// Storage key of a file: `{project_id}:{path}`
pub fn file_key(project_id: Uuid, path: &str) -> String {
    format!("{}:{}", project_id, path)
}

/// Normalise a client-supplied file path.
///
/// Leading `/` and `./` are stripped. Backslashes, empty segments and
/// `.`/`..` segments are rejected.
pub fn normalize_path(raw: &str) -> Result<String> {
    let mut path = raw;
    loop {
        if let Some(rest) = path.strip_prefix('/') {
            path = rest;
        } else if let Some(rest) = path.strip_prefix("./") {
            path = rest;
        } else {
            break;
        }
    }

    if path.is_empty() {
        return Err(Error::Validation("File path must not be empty".to_string()));
    }
    if path.contains('\\') {
        return Err(Error::Validation(format!(
            "File path must use '/' separators: {}",
            raw
        )));
    }
    if path.len() > MAX_PATH_BYTES {
        return Err(Error::Validation(format!(
            "File path must be ≤{} bytes",
            MAX_PATH_BYTES
        )));
    }
    if path
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(Error::Validation(format!("Invalid file path: {}", raw)));
    }

    Ok(path.to_string())
}

/// Reject content over the size limit
pub fn validate_content(content: &str) -> Result<()> {
    if content.len() > MAX_CONTENT_BYTES {
        return Err(Error::Validation(format!(
            "File content must be ≤{} bytes",
            MAX_CONTENT_BYTES
        )));
    }
    Ok(())
}
