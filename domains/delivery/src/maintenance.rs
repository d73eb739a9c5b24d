//! Maintenance plan generation

use crate::domain::entities::{
    Frequency, MaintenancePlan, MaintenanceTask, MonitoringItem, Priority, ProjectAnalysis,
    ProjectType,
};

/// Dependencies that imply a database worth backing up
const DATABASE_DEPENDENCIES: &[&str] = &[
    "prisma",
    "@prisma/client",
    "mongoose",
    "pg",
    "mysql2",
    "@supabase/supabase-js",
    "firebase",
];

fn task(
    title: &'static str,
    description: &'static str,
    frequency: Frequency,
    priority: Priority,
    estimated_minutes: u32,
) -> MaintenanceTask {
    MaintenanceTask {
        title,
        description,
        frequency,
        priority,
        estimated_minutes,
    }
}

fn tasks_for(analysis: &ProjectAnalysis) -> Vec<MaintenanceTask> {
    let mut tasks = vec![
        task(
            "Update dependencies",
            "Review and apply dependency updates, reading changelogs for breaking changes",
            Frequency::Monthly,
            Priority::Medium,
            60,
        ),
        task(
            "Back up project",
            "Export the project and store the archive somewhere safe",
            Frequency::Weekly,
            Priority::High,
            10,
        ),
        task(
            "Review performance",
            "Run a Lighthouse audit and address regressions",
            Frequency::Quarterly,
            Priority::Low,
            120,
        ),
    ];

    if analysis.has_package_json {
        tasks.push(task(
            "Run security audit",
            "Run npm audit and fix reported vulnerabilities",
            Frequency::Weekly,
            Priority::High,
            15,
        ));
    }

    if analysis.has_tests {
        tasks.push(task(
            "Run test suite",
            "Run the full test suite and fix failures",
            Frequency::Weekly,
            Priority::Medium,
            15,
        ));
    } else {
        tasks.push(task(
            "Add automated tests",
            "Cover critical user flows with automated tests",
            Frequency::Once,
            Priority::High,
            240,
        ));
    }

    if analysis.project_type == ProjectType::Nextjs {
        tasks.push(task(
            "Review Next.js releases",
            "Check Next.js release notes and plan upgrades",
            Frequency::Quarterly,
            Priority::Medium,
            60,
        ));
    }

    if DATABASE_DEPENDENCIES.iter().any(|dep| analysis.depends_on(dep)) {
        tasks.push(task(
            "Verify database backups",
            "Restore a recent database backup to confirm it is usable",
            Frequency::Monthly,
            Priority::High,
            30,
        ));
    }

    tasks
}

fn monitoring_for(analysis: &ProjectAnalysis) -> Vec<MonitoringItem> {
    let mut items = vec![
        MonitoringItem {
            name: "Uptime",
            description: "Alert when the site stops responding",
            tool: "UptimeRobot",
        },
        MonitoringItem {
            name: "Errors",
            description: "Capture runtime errors with stack traces",
            tool: "Sentry",
        },
        MonitoringItem {
            name: "Performance",
            description: "Track Core Web Vitals over time",
            tool: "Google PageSpeed Insights",
        },
    ];
    if analysis.project_type == ProjectType::Node {
        items.push(MonitoringItem {
            name: "Server logs",
            description: "Keep application logs searchable",
            tool: "Platform log viewer",
        });
    }
    items
}

/// Monthly hours from task minutes weighted by frequency, one decimal
fn monthly_hours(tasks: &[MaintenanceTask]) -> f64 {
    let minutes: f64 = tasks
        .iter()
        .map(|t| f64::from(t.estimated_minutes) * t.frequency.per_month())
        .sum();
    (minutes / 60.0 * 10.0).round() / 10.0
}

/// Build a maintenance plan for an analyzed project
pub fn generate_maintenance_plan(analysis: &ProjectAnalysis) -> MaintenancePlan {
    let tasks = tasks_for(analysis);
    MaintenancePlan {
        estimated_monthly_hours: monthly_hours(&tasks),
        monitoring: monitoring_for(analysis),
        tasks,
    }
}
