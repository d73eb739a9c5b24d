//! API layer for the Delivery domain

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::DeliveryState;
pub use routes::routes;
