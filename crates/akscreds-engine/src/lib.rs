//! Discovery and fetch engine for akscreds
//!
//! Data flows one way: [`RunAggregator`] lists subscriptions through the
//! [`TargetEnumerator`], narrows them with [`filter_subscriptions`], and hands each
//! cluster to the [`FetchSequencer`]. Every external call goes through the
//! [`akscreds_runner::Executor`], which is also where dry-run mode lives.

pub mod aggregator;
pub mod azure;
pub mod enumerator;
pub mod filter;
pub mod model;
pub mod report;
pub mod sequencer;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;

pub use aggregator::{Pause, RunAggregator, ThreadSleep};
pub use azure::AzureCli;
pub use enumerator::TargetEnumerator;
pub use filter::{filter_subscriptions, unmatched_selectors};
pub use model::{
    Cluster, FetchStep, RunReport, RunSummary, ScopeReport, ScopeSummary, SequenceOutcome,
    Subscription,
};
pub use sequencer::FetchSequencer;
