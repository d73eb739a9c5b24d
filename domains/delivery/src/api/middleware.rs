//! Delivery domain state

use shipwright_projects::ProjectsRepositories;

/// Application state for the Delivery domain
#[derive(Clone)]
pub struct DeliveryState {
    pub repos: ProjectsRepositories,
}

impl DeliveryState {
    pub fn new(repos: ProjectsRepositories) -> Self {
        Self { repos }
    }
}
