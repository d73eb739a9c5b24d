//! Repository implementations for Projects domain

pub mod files;
pub mod projects;
pub mod settings;
pub mod transactions;

use sqlx::SqlitePool;

pub use files::FileRepository;
pub use projects::{ProjectRepository, ProjectUpdate};
pub use settings::SettingsRepository;
pub use transactions::{delete_files_tx, put_file_tx, REGISTRY_KEY};

/// Combined repository access for the Projects domain
#[derive(Clone)]
pub struct ProjectsRepositories {
    pub projects: ProjectRepository,
    pub files: FileRepository,
    pub settings: SettingsRepository,
}

impl ProjectsRepositories {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            projects: ProjectRepository::new(pool.clone()),
            files: FileRepository::new(pool.clone()),
            settings: SettingsRepository::new(pool),
        }
    }
}
