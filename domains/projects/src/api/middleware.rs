//! Projects domain state

use crate::ProjectsRepositories;

/// Application state for the Projects domain
#[derive(Clone)]
pub struct ProjectsState {
    pub repos: ProjectsRepositories,
}

impl ProjectsState {
    pub fn new(repos: ProjectsRepositories) -> Self {
        Self { repos }
    }
}
