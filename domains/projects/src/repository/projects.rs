//! Project registry repository
//!
//! The registry is a single JSON array stored under the `projects` settings
//! key. Every mutation is a read-modify-write of that array inside one
//! transaction, serialised by an in-process lock.

use std::sync::Arc;

use shipwright_common::{Error, Result};
use sqlx::SqlitePool;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::entities::{
    normalize_path, validate_content, Project, ProjectFile, ProjectStatus,
};
use crate::repository::files::normalise_all;
use crate::repository::transactions::{
    delete_files_tx, load_registry, put_file_tx, save_registry,
};

/// Partial update of a project record
#[derive(Debug, Clone, Default)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub status: Option<ProjectStatus>,
}

#[derive(Clone)]
pub struct ProjectRepository {
    pool: SqlitePool,
    write_lock: Arc<Mutex<()>>,
}

impl ProjectRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// All projects in creation order
    pub async fn list(&self) -> Result<Vec<Project>> {
        load_registry(&self.pool).await
    }

    /// Find project by ID
    pub async fn find(&self, id: Uuid) -> Result<Option<Project>> {
        let projects = load_registry(&self.pool).await?;
        Ok(projects.into_iter().find(|p| p.id == id))
    }

    /// Add a project to the registry
    pub async fn create(&self, project: &Project) -> Result<Project> {
        self.mutate(|projects| {
            if projects.iter().any(|p| p.id == project.id) {
                return Err(Error::Conflict("Project already exists".to_string()));
            }
            projects.push(project.clone());
            Ok(project.clone())
        })
        .await
    }

    /// Register a project together with its initial files
    pub async fn create_with_files(
        &self,
        project: &Project,
        files: &[(String, String)],
    ) -> Result<Project> {
        let files = normalise_all(files)?;

        let _guard = self.write_lock.lock().await;
        let mut tx = self.pool.begin().await?;

        let mut projects = load_registry(&mut *tx).await?;
        if projects.iter().any(|p| p.id == project.id) {
            return Err(Error::Conflict("Project already exists".to_string()));
        }
        projects.push(project.clone());
        save_registry(&mut *tx, &projects).await?;

        for (path, content) in &files {
            put_file_tx(&mut tx, project.id, path, content).await?;
        }

        tx.commit().await?;
        Ok(project.clone())
    }

    /// Apply a name and/or status change
    pub async fn update(&self, id: Uuid, update: ProjectUpdate) -> Result<Option<Project>> {
        self.mutate(|projects| {
            let Some(project) = projects.iter_mut().find(|p| p.id == id) else {
                return Ok(None);
            };
            if let Some(name) = update.name {
                project.rename(name)?;
            }
            if let Some(status) = update.status {
                project.set_status(status)?;
            }
            Ok(Some(project.clone()))
        })
        .await
    }

    /// Bump `last_modified` after a file change
    pub async fn touch(&self, id: Uuid) -> Result<Option<Project>> {
        self.mutate(|projects| {
            Ok(projects.iter_mut().find(|p| p.id == id).map(|project| {
                project.touch();
                project.clone()
            }))
        })
        .await
    }

    /// Write one file and bump the owner's `last_modified` in a single
    /// transaction. Returns `None`, writing nothing, when the project is gone.
    pub async fn put_file(
        &self,
        id: Uuid,
        path: &str,
        content: &str,
    ) -> Result<Option<ProjectFile>> {
        let path = normalize_path(path)?;
        validate_content(content)?;

        let _guard = self.write_lock.lock().await;
        let mut tx = self.pool.begin().await?;

        let mut projects = load_registry(&mut *tx).await?;
        let Some(project) = projects.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        project.touch();
        save_registry(&mut *tx, &projects).await?;

        let updated_at = put_file_tx(&mut tx, id, &path, content).await?;
        tx.commit().await?;

        Ok(Some(ProjectFile {
            project_id: id,
            path,
            content: content.to_string(),
            updated_at,
        }))
    }

    /// Remove a project and all of its files
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut tx = self.pool.begin().await?;

        let mut projects = load_registry(&mut *tx).await?;
        let before = projects.len();
        projects.retain(|p| p.id != id);
        if projects.len() == before {
            return Ok(false);
        }

        save_registry(&mut *tx, &projects).await?;
        let files = delete_files_tx(&mut tx, id).await?;
        tx.commit().await?;

        tracing::info!(project_id = %id, files, "Deleted project");
        Ok(true)
    }

    async fn mutate<T>(&self, apply: impl FnOnce(&mut Vec<Project>) -> Result<T>) -> Result<T> {
        let _guard = self.write_lock.lock().await;
        let mut tx = self.pool.begin().await?;

        let mut projects = load_registry(&mut *tx).await?;
        let out = apply(&mut projects)?;
        save_registry(&mut *tx, &projects).await?;

        tx.commit().await?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::files::FileRepository;
    use crate::repository::transactions::REGISTRY_KEY;
    use shipwright_common::db::connect_in_memory;

    async fn repos() -> (ProjectRepository, FileRepository, SqlitePool) {
        let pool = connect_in_memory().await.unwrap();
        (
            ProjectRepository::new(pool.clone()),
            FileRepository::new(pool.clone()),
            pool,
        )
    }

    #[tokio::test]
    async fn test_empty_registry() {
        let (projects, _, _) = repos().await;
        assert!(projects.list().await.unwrap().is_empty());
        assert!(projects.find(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let (projects, _, _) = repos().await;

        let first = Project::new("First").unwrap();
        let second = Project::new("Second").unwrap();
        projects.create(&first).await.unwrap();
        projects.create(&second).await.unwrap();

        let names: Vec<String> = projects
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["First", "Second"]);
        assert_eq!(projects.find(second.id).await.unwrap(), Some(second));
    }

    #[tokio::test]
    async fn test_create_duplicate_id_conflicts() {
        let (projects, _, _) = repos().await;
        let project = Project::new("Dup").unwrap();

        projects.create(&project).await.unwrap();
        let result = projects.create(&project).await;
        assert!(matches!(result, Err(Error::Conflict(_))));
        assert_eq!(projects.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_name_and_status() {
        let (projects, _, _) = repos().await;
        let project = projects.create(&Project::new("Old").unwrap()).await.unwrap();

        let updated = projects
            .update(
                project.id,
                ProjectUpdate {
                    name: Some("New".to_string()),
                    status: Some(ProjectStatus::Inactive),
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.name, "New");
        assert_eq!(updated.status, ProjectStatus::Inactive);
        assert!(updated.last_modified >= project.last_modified);
        assert_eq!(projects.find(project.id).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn test_update_invalid_name_leaves_registry_unchanged() {
        let (projects, _, _) = repos().await;
        let project = projects.create(&Project::new("Keep").unwrap()).await.unwrap();

        let result = projects
            .update(
                project.id,
                ProjectUpdate {
                    name: Some(" ".to_string()),
                    status: None,
                },
            )
            .await;
        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(projects.find(project.id).await.unwrap().unwrap().name, "Keep");
    }

    #[tokio::test]
    async fn test_update_missing_project() {
        let (projects, _, _) = repos().await;
        let result = projects
            .update(Uuid::new_v4(), ProjectUpdate::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_touch_bumps_last_modified() {
        let (projects, _, _) = repos().await;
        let project = projects.create(&Project::new("App").unwrap()).await.unwrap();

        let touched = projects.touch(project.id).await.unwrap().unwrap();
        assert!(touched.last_modified >= project.last_modified);
        assert!(projects.touch(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_file_bumps_owner() {
        let (projects, files, _) = repos().await;
        let project = projects.create(&Project::new("App").unwrap()).await.unwrap();

        let written = projects
            .put_file(project.id, "./src/app.js", "export {}")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(written.path, "src/app.js");
        assert_eq!(files.get(project.id, "src/app.js").await.unwrap(), Some(written));
        let owner = projects.find(project.id).await.unwrap().unwrap();
        assert!(owner.last_modified >= project.last_modified);
    }

    #[tokio::test]
    async fn test_put_file_after_delete_leaves_no_rows() {
        let (projects, files, pool) = repos().await;
        let project = projects.create(&Project::new("Gone").unwrap()).await.unwrap();
        assert!(projects.delete(project.id).await.unwrap());

        let written = projects
            .put_file(project.id, "index.html", "<html>")
            .await
            .unwrap();
        assert!(written.is_none());
        assert!(projects.put_file(Uuid::new_v4(), "a.txt", "x").await.unwrap().is_none());

        assert!(files.list(project.id).await.unwrap().is_empty());
        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM files")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(rows, 0);
        assert!(projects.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_put_file_racing_delete_never_orphans() {
        let (projects, files, pool) = repos().await;
        let project = projects.create(&Project::new("Race").unwrap()).await.unwrap();

        let (written, deleted) = tokio::join!(
            projects.put_file(project.id, "index.html", "<html>"),
            projects.delete(project.id),
        );
        written.unwrap();
        assert!(deleted.unwrap());

        assert!(files.list(project.id).await.unwrap().is_empty());
        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM files")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(rows, 0);
    }

    #[tokio::test]
    async fn test_delete_cascades_files() {
        let (projects, files, _) = repos().await;
        let doomed = projects.create(&Project::new("Doomed").unwrap()).await.unwrap();
        let kept = projects.create(&Project::new("Kept").unwrap()).await.unwrap();

        files.put(doomed.id, "index.html", "<html>").await.unwrap();
        files.put(kept.id, "index.html", "<html>").await.unwrap();

        assert!(projects.delete(doomed.id).await.unwrap());
        assert!(!projects.delete(doomed.id).await.unwrap());

        assert!(projects.find(doomed.id).await.unwrap().is_none());
        assert!(files.list(doomed.id).await.unwrap().is_empty());
        assert_eq!(files.list(kept.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_with_files() {
        let (projects, files, _) = repos().await;
        let project = Project::new("Imported").unwrap();

        projects
            .create_with_files(
                &project,
                &[("./index.html".to_string(), "<html></html>".to_string())],
            )
            .await
            .unwrap();

        assert!(projects.find(project.id).await.unwrap().is_some());
        let all = files.list(project.id).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].path, "index.html");
    }

    #[tokio::test]
    async fn test_malformed_registry_is_an_error() {
        let (projects, _, pool) = repos().await;

        sqlx::query("INSERT INTO settings (key, value, updated_at) VALUES (?1, 'not json', '2026-01-01T00:00:00Z')")
            .bind(REGISTRY_KEY)
            .execute(&pool)
            .await
            .unwrap();

        assert!(matches!(projects.list().await, Err(Error::Serialization(_))));
        assert!(matches!(
            projects.create(&Project::new("x").unwrap()).await,
            Err(Error::Serialization(_))
        ));
    }
}
