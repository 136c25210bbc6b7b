//! Logging infrastructure for akscreds
//!
//! Diagnostics go to stderr through `tracing`; the run summary itself is printed
//! to stdout by the CLI and does not depend on the log level.

use std::io::IsTerminal;

use tracing::{Level, span};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::types::{CheckStatus, DoctorOutput};

/// Check if colored output should be used.
///
/// Returns true only if stderr is a terminal and `NO_COLOR` is not set.
fn use_color() -> bool {
    std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// Default filter directive for the given verbosity.
#[must_use]
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "akscreds=debug,warn"
    } else {
        "akscreds=info,warn"
    }
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins when set. Otherwise `--verbose` enables the per-step `debug`
/// events (every command executed or skipped, every sequence transition).
pub fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(verbose)))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(use_color())
                .with_target(verbose)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_line_number(false)
                .with_file(false)
                .without_time()
                .compact(),
        )
        .try_init()?;

    Ok(())
}

/// Span covering the processing of one subscription.
pub fn subscription_span(subscription_id: &str, subscription_name: &str) -> tracing::Span {
    span!(
        Level::INFO,
        "subscription",
        id = %subscription_id,
        name = %subscription_name,
    )
}

/// Span covering the fetch sequence of one cluster.
pub fn cluster_span(resource_group: &str, cluster: &str) -> tracing::Span {
    span!(
        Level::DEBUG,
        "cluster",
        resource_group = %resource_group,
        name = %cluster,
    )
}

/// Render the precondition report as human-readable lines.
#[must_use]
pub fn format_doctor_report(report: &DoctorOutput) -> String {
    let mut out = String::new();
    for check in &report.checks {
        let symbol = match check.status {
            CheckStatus::Pass => "✓",
            CheckStatus::Warn => "⚠",
            CheckStatus::Fail => "✗",
        };
        out.push_str(&format!("{symbol} {}: {}\n", check.name, check.details));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DoctorCheck;
    use chrono::Utc;

    #[test]
    fn test_default_directive() {
        assert!(default_directive(true).contains("akscreds=debug"));
        assert!(default_directive(false).contains("akscreds=info"));
    }

    #[test]
    fn test_format_doctor_report() {
        let report = DoctorOutput {
            emitted_at: Utc::now(),
            ok: false,
            checks: vec![
                DoctorCheck::pass("az_path", "Found az at /usr/bin/az"),
                DoctorCheck::warn("az_version", "unrecognised output"),
                DoctorCheck::fail("kubelogin_path", "kubelogin not found in PATH"),
            ],
        };
        let text = format_doctor_report(&report);
        assert_eq!(
            text,
            "✓ az_path: Found az at /usr/bin/az\n⚠ az_version: unrecognised output\n✗ kubelogin_path: kubelogin not found in PATH\n"
        );
    }

    #[test]
    fn test_spans_can_be_created_without_subscriber() {
        let _s = subscription_span("0000", "dev");
        let _c = cluster_span("rg", "aks-1");
    }
}
