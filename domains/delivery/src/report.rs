//! Plain-text rendering of a delivery report

use std::fmt::Write;

use crate::domain::entities::DeliveryReport;

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{}\n{}", title, "-".repeat(title.len()));
}

fn bullets(out: &mut String, items: &[String]) {
    if items.is_empty() {
        out.push_str("(none)\n");
        return;
    }
    for item in items {
        let _ = writeln!(out, "- {}", item);
    }
}

/// Render the report as text: summary, recommendations, warnings, next
/// steps, then the deployment snippet.
#[mutants::skip] // Presentation only; section order is covered by tests
pub fn format_report(report: &DeliveryReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Delivery report: {}", report.project_name);
    let _ = writeln!(out, "Generated: {}", report.generated_at.to_rfc3339());
    let _ = writeln!(
        out,
        "Audit score: {}/100 | Ready for production: {}",
        report.audit.score,
        if report.ready_for_production { "yes" } else { "no" }
    );

    heading(&mut out, "Summary");
    let _ = writeln!(out, "{}", report.summary);

    heading(&mut out, "Recommendations");
    bullets(&mut out, &report.recommendations);

    heading(&mut out, "Warnings");
    bullets(&mut out, &report.warnings);

    heading(&mut out, "Next steps");
    let steps = &report.next_steps;
    for (label, items) in [
        ("Immediate", &steps.immediate),
        ("Short term", &steps.short_term),
        ("Long term", &steps.long_term),
    ] {
        let _ = writeln!(out, "{}:", label);
        bullets(&mut out, items);
    }

    heading(&mut out, "Deployment");
    let guide = &report.deployment_guide;
    let _ = writeln!(out, "Recommended platform: {}", guide.recommended_platform);
    if let Some(build) = &guide.build_command {
        let _ = writeln!(out, "Build command: {}", build);
    }
    if let Some(output) = &guide.output_directory {
        let _ = writeln!(out, "Output directory: {}", output);
    }
    let _ = writeln!(out, "\n{}", guide.config_snippet.trim_end());

    out
}
