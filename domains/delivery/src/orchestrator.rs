//! Delivery orchestration
//!
//! Runs analysis, audit, deployment and maintenance over a project's files
//! and condenses the results into a [`DeliveryReport`].

use chrono::{DateTime, Utc};
use shipwright_common::Result;
use shipwright_projects::api::handlers::require_project;
use shipwright_projects::{Project, ProjectFile, ProjectsRepositories};
use uuid::Uuid;

use crate::analysis::analyze;
use crate::audit::audit;
use crate::deployment::generate_deployment_guide;
use crate::domain::entities::{
    AuditCheck, AuditResult, CheckStatus, DeliveryReport, MaintenancePlan, NextSteps, Priority,
    ProjectAnalysis, SourceFile,
};
use crate::maintenance::generate_maintenance_plan;

/// Minimum audit score for a production-ready project
pub const READY_SCORE: u8 = 60;

/// Upper bound for suggestions copied into recommendations and for each next-steps list
const LIST_LIMIT: usize = 5;

/// Produce the delivery report for a stored project
pub async fn deliver(repos: &ProjectsRepositories, project_id: Uuid) -> Result<DeliveryReport> {
    let project = require_project(repos, project_id).await?;
    let files = repos.files.list(project_id).await?;

    let report = build_report(&project, files, Utc::now());
    tracing::info!(
        %project_id,
        score = report.audit.score,
        ready = report.ready_for_production,
        "Generated delivery report"
    );
    Ok(report)
}

/// Assemble a report from already loaded files
pub fn build_report(
    project: &Project,
    files: Vec<ProjectFile>,
    generated_at: DateTime<Utc>,
) -> DeliveryReport {
    let sources: Vec<SourceFile> = files.into_iter().map(SourceFile::from).collect();

    let analysis = analyze(&sources);
    let audit = audit(&sources);
    let deployment_guide = generate_deployment_guide(&analysis);
    let maintenance_plan = generate_maintenance_plan(&analysis);

    let ready_for_production = is_ready(&audit, &analysis);
    let platform = deployment_guide.recommended_platform.as_str();

    DeliveryReport {
        project_id: project.id,
        project_name: project.name.clone(),
        generated_at,
        summary: summary(&project.name, audit.score, ready_for_production, platform),
        recommendations: recommendations(&audit, &analysis, platform),
        warnings: warnings(&audit, &analysis),
        next_steps: next_steps(&audit, &maintenance_plan, ready_for_production, platform),
        ready_for_production,
        analysis,
        audit,
        deployment_guide,
        maintenance_plan,
    }
}

/// Ready when the score clears the bar with no critical failure and no analysis error
pub fn is_ready(audit: &AuditResult, analysis: &ProjectAnalysis) -> bool {
    audit.score >= READY_SCORE
        && !audit.checks.iter().any(AuditCheck::is_critical_failure)
        && analysis.errors.is_empty()
}

fn quality(score: u8) -> &'static str {
    match score {
        90.. => "excellent",
        75..=89 => "good",
        60..=74 => "fair",
        _ => "needs work",
    }
}

fn summary(name: &str, score: u8, ready: bool, platform: &str) -> String {
    let readiness = if ready {
        format!("It is ready for production deployment on {}.", platform)
    } else {
        "Resolve the issues below before deploying to production.".to_string()
    };
    format!(
        "{} scored {}/100 in the audit ({}). {}",
        name,
        score,
        quality(score),
        readiness
    )
}

fn recommendations(audit: &AuditResult, analysis: &ProjectAnalysis, platform: &str) -> Vec<String> {
    let mut items: Vec<String> = audit.suggestions.iter().take(LIST_LIMIT).cloned().collect();
    if !analysis.has_tests {
        items.push("Add automated tests".to_string());
    }
    items.push(format!("Deploy to {}", platform));
    items
}

fn warnings(audit: &AuditResult, analysis: &ProjectAnalysis) -> Vec<String> {
    audit
        .checks
        .iter()
        .filter(|c| c.is_critical_failure())
        .map(|c| format!("Critical: {}", c.name))
        .chain(analysis.errors.iter().cloned())
        .chain(analysis.warnings.iter().cloned())
        .collect()
}

fn recommendations_where<'a>(
    audit: &'a AuditResult,
    predicate: impl Fn(&AuditCheck) -> bool + 'a,
) -> impl Iterator<Item = String> + 'a {
    audit
        .checks
        .iter()
        .filter(move |c| predicate(*c))
        .filter_map(|c| c.recommendation.map(str::to_string))
}

fn next_steps(
    audit: &AuditResult,
    plan: &MaintenancePlan,
    ready: bool,
    platform: &str,
) -> NextSteps {
    let mut immediate: Vec<String> = recommendations_where(audit, AuditCheck::is_critical_failure)
        .chain(recommendations_where(audit, |c| {
            c.status == CheckStatus::Fail && !c.is_critical_failure()
        }))
        .collect();
    if ready {
        immediate.push(format!("Deploy to {}", platform));
    }

    let mut short_term: Vec<String> =
        recommendations_where(audit, |c| c.status == CheckStatus::Warn).collect();
    short_term.push("Set up a CI pipeline".to_string());
    short_term.push("Configure uptime monitoring".to_string());

    let mut long_term: Vec<String> = plan
        .tasks
        .iter()
        .filter(|t| t.priority == Priority::High)
        .map(|t| t.title.to_string())
        .collect();
    long_term.push("Review the maintenance plan every quarter".to_string());
    long_term.push("Plan feature iterations from user feedback".to_string());

    for list in [&mut immediate, &mut short_term, &mut long_term] {
        list.truncate(LIST_LIMIT);
    }

    NextSteps {
        immediate,
        short_term,
        long_term,
    }
}
