//! Command Executor: the single place where dry-run mode is decided.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::native::NativeRunner;
use crate::process::{ProcessOutput, ProcessRunner};
use crate::CommandSpec;

/// Outcome of one external command invocation.
///
/// Produced once per call to [`Executor::execute`] and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionResult {
    /// Full argv, program first
    pub command: Vec<String>,
    pub succeeded: bool,
    /// True when the process was not launched because of dry-run mode
    pub was_dry_run: bool,
    /// Captured stdout, or a description of the skipped command in dry-run mode
    pub output: String,
    /// Stderr or launch failure message when `succeeded` is false
    pub error_detail: Option<String>,
}

impl ExecutionResult {
    fn skipped(cmd: &CommandSpec) -> Self {
        Self {
            command: cmd.argv(),
            succeeded: true,
            was_dry_run: true,
            output: format!("Would run: {cmd}"),
            error_detail: None,
        }
    }

    fn from_output(cmd: &CommandSpec, output: &ProcessOutput) -> Self {
        let succeeded = output.success();
        let error_detail = if succeeded {
            None
        } else {
            let stderr = output.stderr_string().trim().to_string();
            Some(if !stderr.is_empty() {
                stderr
            } else if let Some(code) = output.exit_code {
                format!("exited with status {code}")
            } else {
                "terminated by signal".to_string()
            })
        };

        Self {
            command: cmd.argv(),
            succeeded,
            was_dry_run: false,
            output: output.stdout_string(),
            error_detail,
        }
    }

    fn launch_failed(cmd: &CommandSpec, reason: String) -> Self {
        Self {
            command: cmd.argv(),
            succeeded: false,
            was_dry_run: false,
            output: String::new(),
            error_detail: Some(reason),
        }
    }
}

/// Runs commands through a [`ProcessRunner`], honouring dry-run mode.
///
/// In dry-run mode a call with `allowed_in_dry_run == false` returns a successful,
/// `was_dry_run` result without starting any process. Read-only listing commands
/// pass `true` so a preview still discovers real subscriptions and clusters.
pub struct Executor {
    runner: Box<dyn ProcessRunner>,
    dry_run: bool,
}

impl Executor {
    #[must_use]
    pub fn new(runner: impl ProcessRunner + 'static, dry_run: bool) -> Self {
        Self {
            runner: Box::new(runner),
            dry_run,
        }
    }

    /// Executor backed by real child processes.
    #[must_use]
    pub fn native(dry_run: bool) -> Self {
        Self::new(NativeRunner::new(), dry_run)
    }

    #[must_use]
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Execute `cmd`, blocking until it exits.
    ///
    /// Never fails: launch errors and non-zero exits are reported through
    /// [`ExecutionResult::succeeded`] and [`ExecutionResult::error_detail`].
    pub fn execute(&self, cmd: &CommandSpec, allowed_in_dry_run: bool) -> ExecutionResult {
        if self.dry_run && !allowed_in_dry_run {
            info!("Would run: {cmd}");
            return ExecutionResult::skipped(cmd);
        }

        debug!(command = %cmd, "Executing");
        let result = match self.runner.run(cmd) {
            Ok(output) => ExecutionResult::from_output(cmd, &output),
            Err(err) => ExecutionResult::launch_failed(cmd, err.to_string()),
        };

        if let Some(detail) = &result.error_detail {
            warn!(command = %cmd, error = %detail, "Command failed");
        }
        result
    }
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}
