//! Exit code constants for akscreds
//!
//! Only setup failures terminate with a non-zero code. A run that finished
//! enumeration exits `SUCCESS` even if some clusters failed or the selectors
//! matched nothing; failures are visible in the printed summary.

/// Process exit code.
///
/// # Example
///
/// ```rust
/// use akscreds_utils::exit_codes::ExitCode;
///
/// assert_eq!(ExitCode::SUCCESS.as_i32(), 0);
/// assert_eq!(ExitCode::from_i32(3), ExitCode::PRECONDITION_FAILED);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Success - enumeration completed (per-cluster failures included)
    pub const SUCCESS: ExitCode = ExitCode(0);

    /// Internal error - general failure
    pub const INTERNAL: ExitCode = ExitCode(1);

    /// CLI arguments or configuration error
    pub const CLI_ARGS: ExitCode = ExitCode(2);

    /// Required tool missing or Azure CLI session not authenticated
    pub const PRECONDITION_FAILED: ExitCode = ExitCode(3);

    /// The account listing returned no subscriptions at all
    pub const NO_SUBSCRIPTIONS: ExitCode = ExitCode(4);

    /// Get the numeric exit code value.
    ///
    /// Use this with `std::process::exit()`.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    #[must_use]
    pub const fn from_i32(code: i32) -> Self {
        ExitCode(code)
    }
}

impl From<i32> for ExitCode {
    fn from(code: i32) -> Self {
        ExitCode(code)
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}
