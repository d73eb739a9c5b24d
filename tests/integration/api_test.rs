//! API endpoint integration tests
//!
//! Drives the composed router end to end: projects, files, chat, AI client
//! settings and delivery reports.

#![allow(dead_code)]

mod chat;
mod common;
mod delivery;
mod files;
mod projects;
mod settings;
