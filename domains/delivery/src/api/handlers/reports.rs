//! Delivery report API handlers

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use shipwright_common::Result;
use shipwright_projects::api::handlers::projects::download_name;
use uuid::Uuid;

use crate::api::middleware::DeliveryState;
use crate::domain::entities::DeliveryReport;
use crate::orchestrator::deliver;
use crate::report::format_report;

/// Analyze, audit and plan a project
pub async fn get_delivery(
    State(state): State<DeliveryState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeliveryReport>> {
    let report = deliver(&state.repos, id).await?;
    Ok(Json(report))
}

/// Download the delivery report as plain text
pub async fn download_report(
    State(state): State<DeliveryState>,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    let report = deliver(&state.repos, id).await?;

    let disposition = format!(
        "attachment; filename=\"{}-delivery-report.txt\"",
        download_name(&report.project_name)
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        format_report(&report),
    )
        .into_response())
}
