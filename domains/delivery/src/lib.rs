//! Delivery domain: static audit, project classification, deployment and
//! maintenance guidance, and the delivery report that combines them

pub mod analysis;
pub mod api;
pub mod audit;
pub mod deployment;
pub mod domain;
pub mod maintenance;
pub mod orchestrator;
pub mod report;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{
    AuditCategory, AuditCheck, AuditResult, CheckStatus, DeliveryReport, DeploymentGuide,
    Frequency, Impact, MaintenancePlan, MaintenanceTask, MonitoringItem, NextSteps, Platform,
    Priority, ProjectAnalysis, ProjectType, SourceFile,
};

pub use analysis::analyze;
pub use audit::audit;
pub use deployment::generate_deployment_guide;
pub use maintenance::generate_maintenance_plan;
pub use orchestrator::{build_report, deliver, is_ready, READY_SCORE};
pub use report::format_report;

// Re-export API types
pub use api::routes;
pub use api::DeliveryState;
