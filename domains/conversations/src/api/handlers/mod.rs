//! HTTP handlers for chat and AI client settings

pub mod messages;
pub mod settings;
