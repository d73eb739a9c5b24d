//! Common state machine error types
//!
//! Shared by every domain crate that models status transitions.

use thiserror::Error;

/// Errors that can occur during state transitions
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StateError {
    #[error("Invalid transition: cannot transition from {from} to {to} via {event}")]
    InvalidTransition {
        from: String,
        to: String,
        event: String,
    },
}

impl From<StateError> for crate::Error {
    fn from(err: StateError) -> Self {
        crate::Error::Validation(err.to_string())
    }
}
