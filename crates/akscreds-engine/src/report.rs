//! Human-readable rendering of a [`RunReport`].

use std::fmt::Write as _;

use crate::model::{RunReport, RunSummary};

const RULE_WIDTH: usize = 60;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Banner printed before a dry run starts.
#[must_use]
pub fn preview_banner() -> &'static str {
    "Preview mode - showing what would be done. No credentials will be fetched."
}

/// Suggested follow-up commands after a real run.
#[must_use]
pub fn next_steps() -> String {
    [
        "What's next:",
        "  kubectl config get-contexts        # List all contexts",
        "  kubectl config use-context <name>  # Switch to a cluster",
    ]
    .join("\n")
}

/// One-line verdict for the run.
#[must_use]
pub fn verdict(summary: &RunSummary) -> String {
    if summary.dry_run {
        "Preview completed - no changes made".to_string()
    } else if summary.targets_found == 0 {
        "No clusters found".to_string()
    } else if summary.targets_succeeded < summary.targets_found {
        format!("{} cluster(s) had issues", summary.targets_failed())
    } else {
        "All clusters ready to use!".to_string()
    }
}

/// Render the per-subscription table, the totals and the verdict.
#[must_use]
pub fn render_summary(report: &RunReport) -> String {
    let summary = &report.summary;
    let mut out = String::new();

    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out, "Summary");
    let _ = writeln!(out, "{}", rule());

    for scope in report.scope_summaries() {
        let name = &scope.subscription.display_name;
        let id = &scope.subscription.id;
        if summary.dry_run {
            let _ = writeln!(out, "  {name} ({id}): {} cluster(s) found", scope.targets_found);
        } else {
            let _ = writeln!(
                out,
                "  {name} ({id}): {}/{} cluster(s) configured",
                scope.targets_succeeded, scope.targets_found
            );
        }
    }
    for outcome in report.outcomes().filter(|o| !o.succeeded) {
        let _ = writeln!(
            out,
            "  ✗ {}/{}: {}",
            outcome.cluster.resource_group,
            outcome.cluster.name,
            outcome.failure_reason.as_deref().unwrap_or("unknown error")
        );
    }
    if !report.scopes.is_empty() {
        out.push('\n');
    }

    let _ = writeln!(out, "Subscriptions: {}", summary.scopes_processed);
    let _ = writeln!(out, "Clusters found: {}", summary.targets_found);
    if !summary.dry_run {
        let _ = writeln!(
            out,
            "Configured: {}/{}",
            summary.targets_succeeded, summary.targets_found
        );
    }
    let _ = writeln!(out, "{}", verdict(summary));
    out
}
