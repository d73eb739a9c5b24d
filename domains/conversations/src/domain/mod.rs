//! Conversations domain layer

pub mod entities;
