//! Projects domain layer: entities and the status state machine

pub mod entities;
pub mod state;
