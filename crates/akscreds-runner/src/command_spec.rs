use std::ffi::OsString;
use std::fmt;
use std::process::Command;

// ============================================================================
// CommandSpec - argv-only process specification
// ============================================================================

/// Specification for an external command.
///
/// Arguments are stored as discrete `OsString` elements. There is no way to build
/// a `CommandSpec` from a shell string, so values coming from cloud listings
/// (subscription ids, cluster names) cannot inject shell syntax.
///
/// # Example
///
/// ```rust
/// use akscreds_runner::CommandSpec;
/// use std::ffi::OsString;
///
/// let cmd = CommandSpec::new("az")
///     .args(["account", "set", "--subscription"])
///     .arg("00000000-0000-0000-0000-000000000000");
///
/// assert_eq!(cmd.program, OsString::from("az"));
/// assert_eq!(cmd.args.len(), 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandSpec {
    /// The program to execute
    pub program: OsString,
    /// Arguments as discrete elements (NOT shell strings)
    pub args: Vec<OsString>,
}

impl CommandSpec {
    /// Create a new `CommandSpec` for `program` with no arguments.
    #[must_use]
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Add a single argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// The full argument vector (program first) as lossy UTF-8 strings.
    ///
    /// Used for reporting; execution always uses the `OsString` form.
    #[must_use]
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|part| part.to_string_lossy().into_owned())
            .collect()
    }

    /// Whether this command's argv begins with `prefix` (program included).
    #[must_use]
    pub fn starts_with(&self, prefix: &[&str]) -> bool {
        let argv = self.argv();
        argv.len() >= prefix.len() && argv.iter().zip(prefix).all(|(a, p)| a == p)
    }

    /// Convert into a `std::process::Command` using argv-style APIs only.
    #[must_use]
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

impl fmt::Display for CommandSpec {
    /// Space-joined argv, quoting elements that contain whitespace.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .argv()
            .into_iter()
            .map(|part| {
                if part.is_empty() || part.chars().any(char::is_whitespace) {
                    format!("'{part}'")
                } else {
                    part
                }
            })
            .collect();
        write!(f, "{}", rendered.join(" "))
    }
}
