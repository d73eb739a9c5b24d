//! Route definitions for Delivery domain API

use axum::{routing::get, Router};

use super::handlers::reports;
use super::middleware::DeliveryState;

/// Create all Delivery domain API routes
pub fn routes() -> Router<DeliveryState> {
    Router::new()
        .route("/v1/projects/{id}/delivery", get(reports::get_delivery))
        .route(
            "/v1/projects/{id}/delivery/report",
            get(reports::download_report),
        )
}
