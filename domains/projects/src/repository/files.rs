//! File store repository
//!
//! One row per file, keyed by `{project_id}:{path}`. Paths are normalised on
//! every call so callers may pass what the client sent.

use chrono::{DateTime, Utc};
use shipwright_common::{RepositoryError, Result};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::domain::entities::{
    file_key, normalize_path, validate_content, FileSummary, ProjectFile,
};
use crate::repository::transactions::{delete_files_tx, put_file_tx};

const FILE_COLUMNS: &str = "project_id, path, content, updated_at";

#[derive(sqlx::FromRow)]
struct FileRow {
    project_id: String,
    path: String,
    content: String,
    updated_at: DateTime<Utc>,
}

impl TryFrom<FileRow> for ProjectFile {
    type Error = RepositoryError;

    fn try_from(row: FileRow) -> std::result::Result<Self, Self::Error> {
        let project_id = Uuid::parse_str(&row.project_id).map_err(|e| {
            RepositoryError::InvalidData(format!("Bad project id '{}': {}", row.project_id, e))
        })?;
        Ok(ProjectFile {
            project_id,
            path: row.path,
            content: row.content,
            updated_at: row.updated_at,
        })
    }
}

fn into_file(row: Option<FileRow>) -> Result<Option<ProjectFile>> {
    Ok(row.map(ProjectFile::try_from).transpose()?)
}

#[derive(Clone)]
pub struct FileRepository {
    pool: SqlitePool,
}

impl FileRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Read one file
    pub async fn get(&self, project_id: Uuid, path: &str) -> Result<Option<ProjectFile>> {
        let path = normalize_path(path)?;
        let query = format!("SELECT {FILE_COLUMNS} FROM files WHERE key = ?1");
        let row = sqlx::query_as::<_, FileRow>(&query)
            .bind(file_key(project_id, &path))
            .fetch_optional(&self.pool)
            .await?;

        into_file(row)
    }

    /// Create or overwrite a file (last write wins)
    pub async fn put(&self, project_id: Uuid, path: &str, content: &str) -> Result<ProjectFile> {
        let path = normalize_path(path)?;
        validate_content(content)?;

        let query = format!(
            "INSERT INTO files (key, project_id, path, content, updated_at) VALUES (?1, ?2, ?3, ?4, ?5) \
             ON CONFLICT(key) DO UPDATE SET content = excluded.content, updated_at = excluded.updated_at \
             RETURNING {FILE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, FileRow>(&query)
            .bind(file_key(project_id, &path))
            .bind(project_id.to_string())
            .bind(&path)
            .bind(content)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;

        Ok(ProjectFile::try_from(row)?)
    }

    /// Delete one file
    pub async fn delete(&self, project_id: Uuid, path: &str) -> Result<bool> {
        let path = normalize_path(path)?;
        let result = sqlx::query("DELETE FROM files WHERE key = ?1")
            .bind(file_key(project_id, &path))
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// All files of a project, ordered by path
    pub async fn list(&self, project_id: Uuid) -> Result<Vec<ProjectFile>> {
        let query = format!("SELECT {FILE_COLUMNS} FROM files WHERE project_id = ?1 ORDER BY path");
        let rows = sqlx::query_as::<_, FileRow>(&query)
            .bind(project_id.to_string())
            .fetch_all(&self.pool)
            .await?;

        let files = rows
            .into_iter()
            .map(ProjectFile::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(files)
    }

    /// Path, byte size and timestamp of every file, ordered by path
    pub async fn list_summaries(&self, project_id: Uuid) -> Result<Vec<FileSummary>> {
        let summaries = sqlx::query_as::<_, FileSummary>(
            "SELECT path, length(CAST(content AS BLOB)) AS size_bytes, updated_at \
             FROM files WHERE project_id = ?1 ORDER BY path",
        )
        .bind(project_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        Ok(summaries)
    }

    /// Move a file to a new path, replacing whatever was there.
    ///
    /// Both statements run in one transaction. Returns `None` when `from`
    /// does not exist, in which case nothing changes.
    pub async fn rename(
        &self,
        project_id: Uuid,
        from: &str,
        to: &str,
    ) -> Result<Option<ProjectFile>> {
        let from = normalize_path(from)?;
        let to = normalize_path(to)?;
        if from == to {
            return self.get(project_id, &from).await;
        }

        let from_key = file_key(project_id, &from);
        let to_key = file_key(project_id, &to);

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "DELETE FROM files WHERE key = ?1 AND EXISTS (SELECT 1 FROM files WHERE key = ?2)",
        )
        .bind(&to_key)
        .bind(&from_key)
        .execute(&mut *tx)
        .await?;

        let query = format!(
            "UPDATE files SET key = ?1, path = ?2, updated_at = ?3 WHERE key = ?4 \
             RETURNING {FILE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, FileRow>(&query)
            .bind(&to_key)
            .bind(&to)
            .bind(Utc::now())
            .bind(&from_key)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;

        if row.is_some() {
            tracing::debug!(%project_id, from = %from, to = %to, "Renamed file");
        }
        into_file(row)
    }

    /// Delete every file of a project
    pub async fn delete_by_project(&self, project_id: Uuid) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let deleted = delete_files_tx(&mut tx, project_id).await?;
        tx.commit().await?;
        Ok(deleted)
    }

    /// Replace a project's whole file set in one transaction
    pub async fn replace_all(&self, project_id: Uuid, files: &[(String, String)]) -> Result<usize> {
        let normalised = normalise_all(files)?;

        let mut tx = self.pool.begin().await?;
        delete_files_tx(&mut tx, project_id).await?;
        for (path, content) in &normalised {
            put_file_tx(&mut tx, project_id, path, content).await?;
        }
        tx.commit().await?;

        Ok(normalised.len())
    }
}

/// Validate and normalise a batch of files before any write happens
pub(crate) fn normalise_all(files: &[(String, String)]) -> Result<Vec<(String, &str)>> {
    let mut normalised = Vec::with_capacity(files.len());
    for (path, content) in files {
        validate_content(content)?;
        normalised.push((normalize_path(path)?, content.as_str()));
    }
    Ok(normalised)
}
