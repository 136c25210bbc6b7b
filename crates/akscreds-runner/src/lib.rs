//! Process execution for akscreds
//!
//! Every external tool invocation (`az`, `kubelogin`) goes through this crate.
//!
//! # Security Model
//!
//! All process execution goes through [`CommandSpec`] to ensure argv-style invocation.
//! Subscription ids, resource group names and cluster names are passed as discrete
//! arguments and never interpolated into a shell string.
//!
//! # Dry run
//!
//! [`Executor`] is the only place that knows about dry-run mode. Callers state per
//! call whether a command may run during a preview (read-only listing) and always
//! receive an [`ExecutionResult`], never an error.

pub mod command_spec;
pub mod error;
pub mod executor;
pub mod native;
pub mod process;

pub use command_spec::CommandSpec;
pub use error::RunnerError;
pub use executor::{ExecutionResult, Executor};
pub use native::NativeRunner;
pub use process::{ProcessOutput, ProcessRunner};
