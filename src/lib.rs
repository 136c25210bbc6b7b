//! akscreds - fetch kubeconfig credentials for every AKS cluster you can reach
//!
//! One command replaces the per-cluster routine of `az account set`,
//! `az aks get-credentials` and `kubelogin convert-kubeconfig`:
//!
//! ```bash
//! # Every cluster in every subscription
//! akscreds
//!
//! # Only two subscriptions, by name or id
//! akscreds -s Production -s 00000000-0000-0000-0000-000000000000
//!
//! # Show what would be done without touching ~/.kube/config
//! akscreds --dry-run --verbose
//! ```
//!
//! # Library use
//!
//! The pipeline is exposed through [`RunAggregator`]. Everything external goes
//! through an [`Executor`], so embedding applications and tests can substitute
//! their own [`ProcessRunner`]:
//!
//! ```rust,no_run
//! use akscreds::{Config, Executor, RunAggregator};
//!
//! let config = Config::defaults();
//! let executor = Executor::native(true);
//! let report = RunAggregator::new(&executor, &config).run(&[]);
//! ```

pub mod cli;

pub use akscreds_config::{CliArgs, Config, ConfigSource};
pub use akscreds_doctor::{PreconditionCheck, Preflight};
pub use akscreds_engine::{
    Cluster, FetchSequencer, FetchStep, RunAggregator, RunReport, RunSummary, ScopeSummary,
    SequenceOutcome, Subscription, TargetEnumerator, filter_subscriptions,
};
pub use akscreds_runner::{CommandSpec, ExecutionResult, Executor, ProcessRunner};
pub use akscreds_utils::error::{AksCredsError, ConfigError, PreconditionError, UserFriendlyError};
pub use akscreds_utils::exit_codes::ExitCode;
