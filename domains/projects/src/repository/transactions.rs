//! Statement helpers shared by single-statement calls and transactions

use chrono::{DateTime, Utc};
use shipwright_common::Result;
use sqlx::{Executor, Sqlite, Transaction};
use uuid::Uuid;

use crate::domain::entities::{file_key, Project};

/// Settings key holding the project registry array
pub const REGISTRY_KEY: &str = "projects";

/// Read the registry array; a missing row is an empty registry
pub(crate) async fn load_registry<'e, E>(executor: E) -> Result<Vec<Project>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let raw: Option<String> = sqlx::query_scalar("SELECT value FROM settings WHERE key = ?1")
        .bind(REGISTRY_KEY)
        .fetch_optional(executor)
        .await?;

    match raw {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(Vec::new()),
    }
}

/// Overwrite the registry array
pub(crate) async fn save_registry<'e, E>(executor: E, projects: &[Project]) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    let value = serde_json::to_string(projects)?;
    sqlx::query(
        "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3) \
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
    )
    .bind(REGISTRY_KEY)
    .bind(value)
    .bind(Utc::now())
    .execute(executor)
    .await?;

    Ok(())
}

/// Delete every file of a project within an existing transaction
pub async fn delete_files_tx(tx: &mut Transaction<'_, Sqlite>, project_id: Uuid) -> Result<u64> {
    let result = sqlx::query("DELETE FROM files WHERE project_id = ?1")
        .bind(project_id.to_string())
        .execute(&mut **tx)
        .await?;

    Ok(result.rows_affected())
}

/// Insert or overwrite one file within an existing transaction and return
/// its new timestamp. `path` must already be normalised.
pub async fn put_file_tx(
    tx: &mut Transaction<'_, Sqlite>,
    project_id: Uuid,
    path: &str,
    content: &str,
) -> Result<DateTime<Utc>> {
    let updated_at = Utc::now();
    sqlx::query(
        "INSERT INTO files (key, project_id, path, content, updated_at) VALUES (?1, ?2, ?3, ?4, ?5) \
         ON CONFLICT(key) DO UPDATE SET content = excluded.content, updated_at = excluded.updated_at",
    )
    .bind(file_key(project_id, path))
    .bind(project_id.to_string())
    .bind(path)
    .bind(content)
    .bind(updated_at)
    .execute(&mut **tx)
    .await?;

    Ok(updated_at)
}
