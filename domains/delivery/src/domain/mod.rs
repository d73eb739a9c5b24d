//! Delivery domain layer: report entities

pub mod entities;
