//! Shared database types for Shipwright
//!
//! Projects, files and settings live in one embedded SQLite database. This
//! module owns pool construction and the embedded migrations so every domain
//! crate (and every test) opens the store the same way.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use thiserror::Error;

use crate::error::Error;

/// Connection URL for a private in-memory database
pub const IN_MEMORY_URL: &str = "sqlite::memory:";

/// Pool size for file-backed databases
const MAX_CONNECTIONS: u32 = 5;

/// Database-specific error types
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Record already exists")]
    AlreadyExists,

    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<RepositoryError> for Error {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Error::NotFound("Record not found".to_string()),
            RepositoryError::AlreadyExists => Error::Conflict("Record already exists".to_string()),
            RepositoryError::Connection(e) => Error::Database(e),
            RepositoryError::InvalidData(msg) => Error::Validation(msg),
        }
    }
}

/// Open a connection pool for the given SQLite URL.
///
/// An in-memory database only exists for the lifetime of its connection, so
/// it gets a single connection that is never recycled.
pub async fn connect(database_url: &str) -> Result<SqlitePool, RepositoryError> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?
    } else {
        SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?
    };

    Ok(pool)
}

/// Apply the embedded schema migrations
pub async fn migrate(pool: &SqlitePool) -> crate::Result<()> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| Error::Unexpected(anyhow::Error::from(e)))?;
    Ok(())
}

/// Open a fresh in-memory database with the schema applied
pub async fn connect_in_memory() -> crate::Result<SqlitePool> {
    let pool = connect(IN_MEMORY_URL).await?;
    migrate(&pool).await?;
    Ok(pool)
}
