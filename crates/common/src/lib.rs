//! Shared utilities, configuration, and error handling for Shipwright
//!
//! This crate provides common functionality used across the Shipwright service:
//! - Configuration management following 12-factor principles
//! - Error types and handling
//! - SQLite pool setup and embedded migrations
//! - Request extractors and state machine errors

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod state;

pub use config::{Config, LogFormat};
pub use db::RepositoryError;
pub use error::{Error, Result};
pub use extractors::ValidatedJson;
pub use state::StateError;
