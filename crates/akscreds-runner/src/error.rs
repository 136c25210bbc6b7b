//! Error types for the runner crate

use thiserror::Error;

/// Failures to launch or observe an external process.
///
/// These never cross the [`Executor`](crate::Executor) boundary; they are folded
/// into [`ExecutionResult::error_detail`](crate::ExecutionResult).
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Program not found: {program}")]
    ProgramNotFound { program: String },

    #[error("Failed to spawn '{program}': {reason}")]
    SpawnFailed { program: String, reason: String },

    #[error("Failed to wait for '{program}': {reason}")]
    WaitFailed { program: String, reason: String },
}
