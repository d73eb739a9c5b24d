//! Domain entities for Delivery domain
//!
//! Everything here is computed on demand from a project's files and never
//! persisted.

use chrono::{DateTime, Utc};
use serde::Serialize;
use shipwright_projects::ProjectFile;
use uuid::Uuid;

/// A file as seen by the analyzers
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub path: String,
    pub content: String,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Last path segment
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Lowercased extension of the last segment, without the dot
    pub fn extension(&self) -> Option<String> {
        let name = self.name();
        let (stem, ext) = name.rsplit_once('.')?;
        if stem.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }

    pub fn has_extension(&self, candidates: &[&str]) -> bool {
        self.extension()
            .is_some_and(|ext| candidates.contains(&ext.as_str()))
    }
}

impl From<ProjectFile> for SourceFile {
    fn from(file: ProjectFile) -> Self {
        Self {
            path: file.path,
            content: file.content,
        }
    }
}

// ============================================================================
// Audit
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuditCategory {
    Security,
    Performance,
    Accessibility,
    BestPractices,
    Seo,
    CodeQuality,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

impl CheckStatus {
    /// Score contribution of one check
    pub fn weight(&self) -> u32 {
        match self {
            CheckStatus::Pass => 100,
            CheckStatus::Warn => 70,
            CheckStatus::Fail => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Low,
    Medium,
    High,
    Critical,
}

/// Outcome of one audit rule
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditCheck {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: AuditCategory,
    pub status: CheckStatus,
    pub impact: Impact,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<&'static str>,
}

impl AuditCheck {
    pub fn is_critical_failure(&self) -> bool {
        self.status == CheckStatus::Fail && self.impact == Impact::Critical
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditResult {
    /// 0..=100
    pub score: u8,
    pub checks: Vec<AuditCheck>,
    pub passed: usize,
    pub warnings: usize,
    pub failed: usize,
    /// Recommendations of failing checks, then of warning checks
    pub suggestions: Vec<String>,
}

// ============================================================================
// Analysis
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Nextjs,
    React,
    Vue,
    Svelte,
    Node,
    Static,
    Unknown,
}

impl std::fmt::Display for ProjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectType::Nextjs => write!(f, "nextjs"),
            ProjectType::React => write!(f, "react"),
            ProjectType::Vue => write!(f, "vue"),
            ProjectType::Svelte => write!(f, "svelte"),
            ProjectType::Node => write!(f, "node"),
            ProjectType::Static => write!(f, "static"),
            ProjectType::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectAnalysis {
    pub project_type: ProjectType,
    pub framework: Option<String>,
    pub dependencies: Vec<String>,
    pub dev_dependencies: Vec<String>,
    pub file_count: usize,
    pub total_size_bytes: u64,
    pub has_package_json: bool,
    pub has_typescript: bool,
    pub has_tests: bool,
    pub build_command: Option<String>,
    pub env_vars: Vec<String>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ProjectAnalysis {
    /// Whether a runtime or dev dependency is declared
    pub fn depends_on(&self, name: &str) -> bool {
        self.dependencies.iter().any(|d| d == name) || self.dev_dependencies.iter().any(|d| d == name)
    }
}

// ============================================================================
// Deployment
// ============================================================================

/// Hosting platform metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Platform {
    pub name: &'static str,
    pub url: &'static str,
    pub cost: &'static str,
    pub setup_time: &'static str,
    pub difficulty: &'static str,
    pub features: Vec<&'static str>,
    pub steps: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeploymentGuide {
    pub recommended_platform: String,
    pub platforms: Vec<Platform>,
    pub build_command: Option<String>,
    pub output_directory: Option<String>,
    pub environment_variables: Vec<String>,
    pub checklist: Vec<String>,
    pub config_snippet: String,
}

// ============================================================================
// Maintenance
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Weekly,
    Monthly,
    Quarterly,
    Once,
}

impl Frequency {
    /// Average occurrences per month; one-off tasks do not recur
    pub fn per_month(&self) -> f64 {
        match self {
            Frequency::Weekly => 4.0,
            Frequency::Monthly => 1.0,
            Frequency::Quarterly => 1.0 / 3.0,
            Frequency::Once => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaintenanceTask {
    pub title: &'static str,
    pub description: &'static str,
    pub frequency: Frequency,
    pub priority: Priority,
    pub estimated_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitoringItem {
    pub name: &'static str,
    pub description: &'static str,
    pub tool: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaintenancePlan {
    pub tasks: Vec<MaintenanceTask>,
    pub monitoring: Vec<MonitoringItem>,
    pub estimated_monthly_hours: f64,
}

// ============================================================================
// Report
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NextSteps {
    pub immediate: Vec<String>,
    pub short_term: Vec<String>,
    pub long_term: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryReport {
    pub project_id: Uuid,
    pub project_name: String,
    pub generated_at: DateTime<Utc>,
    pub analysis: ProjectAnalysis,
    pub audit: AuditResult,
    pub deployment_guide: DeploymentGuide,
    pub maintenance_plan: MaintenancePlan,
    pub summary: String,
    pub recommendations: Vec<String>,
    pub warnings: Vec<String>,
    pub next_steps: NextSteps,
    pub ready_for_production: bool,
}
