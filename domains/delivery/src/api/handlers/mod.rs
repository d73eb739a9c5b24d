//! HTTP handlers for delivery reports

pub mod reports;
