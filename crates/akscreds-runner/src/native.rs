use std::io::ErrorKind;
use std::process::Stdio;

use crate::error::RunnerError;

use super::{CommandSpec, ProcessOutput, ProcessRunner};

/// Native process runner using `std::process::Command`.
///
/// - Uses `Command::new().args()` only - NO shell string evaluation
/// - stdin is closed; stdout and stderr are captured
/// - Blocks until the child exits
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeRunner;

impl NativeRunner {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ProcessRunner for NativeRunner {
    fn run(&self, cmd: &CommandSpec) -> Result<ProcessOutput, RunnerError> {
        let program = cmd.program.to_string_lossy().into_owned();

        let child = cmd
            .to_command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => RunnerError::ProgramNotFound {
                    program: program.clone(),
                },
                _ => RunnerError::SpawnFailed {
                    program: program.clone(),
                    reason: e.to_string(),
                },
            })?;

        let output = child
            .wait_with_output()
            .map_err(|e| RunnerError::WaitFailed {
                program,
                reason: e.to_string(),
            })?;

        Ok(ProcessOutput::new(
            output.stdout,
            output.stderr,
            output.status.code(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program_is_reported() {
        let runner = NativeRunner::new();
        let cmd = CommandSpec::new("akscreds-definitely-not-a-real-binary").arg("--version");
        match runner.run(&cmd) {
            Err(RunnerError::ProgramNotFound { program }) => {
                assert_eq!(program, "akscreds-definitely-not-a-real-binary");
            }
            other => panic!("Expected ProgramNotFound, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_stdout_and_exit_code() {
        let runner = NativeRunner::new();
        let output = runner
            .run(&CommandSpec::new("sh").args(["-c", "printf hello; exit 3"]))
            .unwrap();
        assert_eq!(output.stdout_string(), "hello");
        assert_eq!(output.exit_code, Some(3));
        assert!(!output.success());
    }

    #[cfg(unix)]
    #[test]
    fn test_arguments_are_not_shell_expanded() {
        let runner = NativeRunner::new();
        let output = runner
            .run(&CommandSpec::new("echo").arg("$(whoami)"))
            .unwrap();
        assert_eq!(output.stdout_string().trim(), "$(whoami)");
    }
}
