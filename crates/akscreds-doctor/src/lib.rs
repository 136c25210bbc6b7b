//! Precondition checks
//!
//! Run once before any enumeration. A failure here is the only kind of problem
//! that stops a run before it starts: a missing `az` or `kubelogin`, a binary that
//! cannot execute, or an Azure CLI session that is not logged in.

use std::path::PathBuf;

use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, warn};

use akscreds_config::ToolsConfig;
use akscreds_runner::{CommandSpec, Executor};
use akscreds_utils::error::PreconditionError;
use akscreds_utils::logging::format_doctor_report;
use akscreds_utils::types::{CheckStatus, DoctorCheck, DoctorOutput};

/// Locates executables on the search path.
pub trait ToolLocator {
    fn locate(&self, program: &str) -> Option<PathBuf>;
}

/// [`ToolLocator`] backed by `which`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhichLocator;

impl ToolLocator for WhichLocator {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }
}

/// Seam used by the run aggregator so tests can bypass real tool probing.
pub trait PreconditionCheck {
    /// Run the checks; `Err` carries the first failure.
    fn verify(&self, executor: &Executor) -> Result<DoctorOutput, PreconditionError>;
}

/// The `az account show` fields worth reporting.
#[derive(Debug, Deserialize)]
struct AccountShow {
    name: Option<String>,
    user: Option<AccountUser>,
}

#[derive(Debug, Deserialize)]
struct AccountUser {
    name: Option<String>,
}

/// Checks that `az` and `kubelogin` are usable and that the Azure CLI is logged in.
pub struct Preflight {
    tools: ToolsConfig,
    locator: Box<dyn ToolLocator>,
}

impl Preflight {
    #[must_use]
    pub fn new(tools: ToolsConfig) -> Self {
        Self::with_locator(tools, WhichLocator)
    }

    #[must_use]
    pub fn with_locator(tools: ToolsConfig, locator: impl ToolLocator + 'static) -> Self {
        Self {
            tools,
            locator: Box::new(locator),
        }
    }

    /// Run every check, in order, and report them all.
    ///
    /// The returned error is the first failing check. The report still holds
    /// every check that ran, including the passing ones before the failure.
    pub fn run(&self, executor: &Executor) -> (DoctorOutput, Option<PreconditionError>) {
        let mut checks = Vec::new();
        let mut first_error = None;

        for tool in [&self.tools.az, &self.tools.kubelogin] {
            let (tool_checks, error) = self.check_tool(executor, tool);
            checks.extend(tool_checks);
            first_error = first_error.or(error);
        }

        // Session probe only makes sense once az itself runs.
        if first_error.is_none() {
            let (check, error) = self.check_session(executor);
            checks.push(check);
            first_error = error;
        }

        let ok = !checks.iter().any(|c| c.status == CheckStatus::Fail);
        let output = DoctorOutput {
            emitted_at: Utc::now(),
            ok,
            checks,
        };
        (output, first_error)
    }

    fn check_tool(
        &self,
        executor: &Executor,
        tool: &str,
    ) -> (Vec<DoctorCheck>, Option<PreconditionError>) {
        let label = tool_label(tool);
        let path_check = format!("{label}_path");
        let version_check = format!("{label}_version");

        let Some(path) = self.locator.locate(tool) else {
            return (
                vec![DoctorCheck::fail(
                    &path_check,
                    format!("{tool} not found in PATH"),
                )],
                Some(PreconditionError::ToolMissing {
                    tool: tool.to_string(),
                }),
            );
        };

        let mut checks = vec![DoctorCheck::pass(
            &path_check,
            format!("Found {tool} at {}", path.display()),
        )];

        let result = executor.execute(&CommandSpec::new(tool).arg("--version"), true);
        if result.succeeded {
            let version = first_line(&result.output);
            debug!(tool = %tool, version = %version, "Tool version");
            checks.push(DoctorCheck::pass(&version_check, version));
            (checks, None)
        } else {
            let reason = result
                .error_detail
                .unwrap_or_else(|| "unknown error".to_string());
            checks.push(DoctorCheck::fail(
                &version_check,
                format!("{tool} --version failed: {reason}"),
            ));
            (
                checks,
                Some(PreconditionError::ToolUnusable {
                    tool: tool.to_string(),
                    reason,
                }),
            )
        }
    }

    fn check_session(&self, executor: &Executor) -> (DoctorCheck, Option<PreconditionError>) {
        let cmd = CommandSpec::new(&self.tools.az).args(["account", "show", "--output", "json"]);
        let result = executor.execute(&cmd, true);

        if !result.succeeded {
            let reason = result
                .error_detail
                .unwrap_or_else(|| "az account show failed".to_string());
            return (
                DoctorCheck::fail("az_session", reason.clone()),
                Some(PreconditionError::NotAuthenticated { reason }),
            );
        }

        // A session that answers is usable even if its account JSON is not.
        let check = match serde_json::from_str::<AccountShow>(&result.output) {
            Ok(account) => {
                let user = account
                    .user
                    .and_then(|u| u.name)
                    .unwrap_or_else(|| "unknown user".to_string());
                let subscription = account
                    .name
                    .unwrap_or_else(|| "unknown subscription".to_string());
                DoctorCheck::pass(
                    "az_session",
                    format!("Logged in as {user} (default subscription: {subscription})"),
                )
            }
            Err(err) => DoctorCheck::warn(
                "az_session",
                format!("Logged in, but account details could not be read: {err}"),
            ),
        };
        (check, None)
    }
}

impl PreconditionCheck for Preflight {
    fn verify(&self, executor: &Executor) -> Result<DoctorOutput, PreconditionError> {
        match self.run(executor) {
            (output, Some(err)) => {
                warn!("Precondition checks failed:\n{}", format_doctor_report(&output));
                Err(err)
            }
            (output, None) => Ok(output),
        }
    }
}

/// Check-name prefix for a configured binary: `/usr/local/bin/az` -> `az`.
fn tool_label(tool: &str) -> String {
    let name = std::path::Path::new(tool)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| tool.to_string());
    name.replace(|c: char| !c.is_ascii_alphanumeric(), "_")
}

fn first_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("version unknown")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use akscreds_runner::{ProcessOutput, ProcessRunner, RunnerError};
    use std::collections::HashSet;

    /// Answers by program name and first argument.
    struct FakeRunner {
        version_fails: HashSet<&'static str>,
        logged_in: bool,
        account_json: &'static str,
    }

    impl ProcessRunner for FakeRunner {
        fn run(&self, cmd: &CommandSpec) -> Result<ProcessOutput, RunnerError> {
            let argv = cmd.argv();
            match argv.get(1).map(String::as_str) {
                Some("--version") if self.version_fails.contains(argv[0].as_str()) => {
                    Ok(ProcessOutput::failed(127, "exec format error"))
                }
                Some("--version") => Ok(ProcessOutput::ok(format!("{} 1.2.3\nextra", argv[0]))),
                Some("account") if self.logged_in => Ok(ProcessOutput::ok(self.account_json)),
                Some("account") => Ok(ProcessOutput::failed(
                    1,
                    "ERROR: Please run 'az login' to setup account.",
                )),
                _ => Err(RunnerError::ProgramNotFound {
                    program: argv[0].clone(),
                }),
            }
        }
    }

    struct FakeLocator {
        missing: HashSet<&'static str>,
    }

    impl ToolLocator for FakeLocator {
        fn locate(&self, program: &str) -> Option<PathBuf> {
            (!self.missing.contains(program)).then(|| PathBuf::from("/usr/bin").join(program))
        }
    }

    fn preflight(missing: &[&'static str]) -> Preflight {
        Preflight::with_locator(
            ToolsConfig::default(),
            FakeLocator {
                missing: missing.iter().copied().collect(),
            },
        )
    }

    const ACCOUNT_JSON: &str =
        r#"{"name": "Dev", "user": {"name": "me@example.com", "type": "user"}}"#;

    fn executor(version_fails: &[&'static str], logged_in: bool) -> Executor {
        Executor::new(
            FakeRunner {
                version_fails: version_fails.iter().copied().collect(),
                logged_in,
                account_json: ACCOUNT_JSON,
            },
            false,
        )
    }

    fn names(output: &DoctorOutput) -> Vec<&str> {
        output.checks.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_all_checks_pass() {
        let (output, error) = preflight(&[]).run(&executor(&[], true));
        assert!(error.is_none());
        assert!(output.ok);
        assert_eq!(
            names(&output),
            vec![
                "az_path",
                "az_version",
                "kubelogin_path",
                "kubelogin_version",
                "az_session"
            ]
        );
        assert_eq!(output.checks[1].details, "az 1.2.3");
        assert_eq!(
            output.checks[4].details,
            "Logged in as me@example.com (default subscription: Dev)"
        );
    }

    #[test]
    fn test_unreadable_account_details_warn_but_pass() {
        let exec = Executor::new(
            FakeRunner {
                version_fails: HashSet::new(),
                logged_in: true,
                account_json: "WARNING: upgrade available",
            },
            false,
        );
        let output = preflight(&[]).verify(&exec).unwrap();
        assert!(output.ok);
        let session = output.checks.last().unwrap();
        assert_eq!(session.name, "az_session");
        assert_eq!(session.status, CheckStatus::Warn);
        assert!(session.details.starts_with("Logged in, but account details could not be read"));
    }

    #[test]
    fn test_failed_report_keeps_earlier_checks() {
        let (output, error) = preflight(&[]).run(&executor(&[], false));
        assert!(error.is_some());
        assert_eq!(output.checks.len(), 5);
        assert!(output.checks[..4].iter().all(|c| c.status == CheckStatus::Pass));
        assert_eq!(output.checks[4].status, CheckStatus::Fail);
    }

    #[test]
    fn test_missing_kubelogin() {
        let (output, error) = preflight(&["kubelogin"]).run(&executor(&[], true));
        assert!(!output.ok);
        match error {
            Some(PreconditionError::ToolMissing { tool }) => assert_eq!(tool, "kubelogin"),
            other => panic!("Expected ToolMissing, got {other:?}"),
        }
        // Session probe is skipped once a tool is missing
        assert!(!names(&output).contains(&"az_session"));
    }

    #[test]
    fn test_broken_az_binary() {
        let result = preflight(&[]).verify(&executor(&["az"], true));
        match result {
            Err(PreconditionError::ToolUnusable { tool, reason }) => {
                assert_eq!(tool, "az");
                assert_eq!(reason, "exec format error");
            }
            other => panic!("Expected ToolUnusable, got {other:?}"),
        }
    }

    #[test]
    fn test_not_logged_in() {
        let result = preflight(&[]).verify(&executor(&[], false));
        match result {
            Err(PreconditionError::NotAuthenticated { reason }) => {
                assert!(reason.contains("az login"));
            }
            other => panic!("Expected NotAuthenticated, got {other:?}"),
        }
    }

    #[test]
    fn test_probes_run_in_dry_run_mode() {
        let exec = Executor::new(
            FakeRunner {
                version_fails: HashSet::new(),
                logged_in: false,
                account_json: ACCOUNT_JSON,
            },
            true,
        );
        // A dry run must still detect the missing session
        assert!(preflight(&[]).verify(&exec).is_err());
    }

    #[test]
    fn test_tool_label() {
        assert_eq!(tool_label("az"), "az");
        assert_eq!(tool_label("/opt/bin/kubelogin"), "kubelogin");
        assert_eq!(first_line("\n  azure-cli 2.61.0 *\n core"), "azure-cli 2.61.0 *");
    }
}
