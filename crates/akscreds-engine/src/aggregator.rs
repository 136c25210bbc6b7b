//! Run orchestration: preflight, discovery, filtering, and one fetch sequence
//! per cluster, tallied into a [`RunReport`].

use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};

use akscreds_config::Config;
use akscreds_doctor::{PreconditionCheck, Preflight};
use akscreds_runner::Executor;
use akscreds_utils::error::AksCredsError;
use akscreds_utils::logging::{cluster_span, format_doctor_report, subscription_span};

use crate::azure::AzureCli;
use crate::enumerator::TargetEnumerator;
use crate::filter::{filter_subscriptions, unmatched_selectors};
use crate::model::{RunReport, RunSummary, ScopeReport, ScopeSummary};
use crate::sequencer::FetchSequencer;

/// Wait between consecutive clusters in a real run.
pub trait Pause {
    fn pause(&self, duration: Duration);
}

/// [`Pause`] that blocks the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleep;

impl Pause for ThreadSleep {
    fn pause(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Drives a whole run.
///
/// Subscriptions are processed one at a time, in listing order, and clusters one
/// at a time within each. The only errors returned are setup failures: a failed
/// preflight or an account with no subscriptions. Everything below that is
/// recorded in the report.
pub struct RunAggregator<'a> {
    executor: &'a Executor,
    azure: AzureCli,
    preflight: Box<dyn PreconditionCheck + 'a>,
    pause: Box<dyn Pause + 'a>,
    target_delay: Duration,
}

impl<'a> RunAggregator<'a> {
    /// Aggregator using the real preflight checks and a sleeping pause.
    #[must_use]
    pub fn new(executor: &'a Executor, config: &Config) -> Self {
        Self {
            executor,
            azure: AzureCli::from_config(config),
            preflight: Box::new(Preflight::new(config.tools.clone())),
            pause: Box::new(ThreadSleep),
            target_delay: Duration::from_millis(config.fetch.target_delay_ms),
        }
    }

    #[must_use]
    pub fn with_preflight(mut self, preflight: impl PreconditionCheck + 'a) -> Self {
        self.preflight = Box::new(preflight);
        self
    }

    #[must_use]
    pub fn with_pause(mut self, pause: impl Pause + 'a) -> Self {
        self.pause = Box::new(pause);
        self
    }

    /// Execute the run for the subscriptions matching `selectors` (all when empty).
    pub fn run(&self, selectors: &[String]) -> Result<RunReport, AksCredsError> {
        let started_at = Utc::now();
        let dry_run = self.executor.is_dry_run();

        let doctor = self.preflight.verify(self.executor)?;
        debug!("Preflight checks passed:\n{}", format_doctor_report(&doctor));

        let enumerator = TargetEnumerator::new(self.executor, &self.azure);
        let sequencer = FetchSequencer::new(self.executor, &self.azure);

        let discovered = enumerator.list_subscriptions();
        if discovered.is_empty() {
            return Err(AksCredsError::NoSubscriptions);
        }
        info!("Found {} subscription(s)", discovered.len());

        let selected = filter_subscriptions(&discovered, selectors);
        for selector in unmatched_selectors(&discovered, selectors) {
            warn!("Subscription '{selector}' not found");
        }
        if selected.is_empty() {
            warn!("No matching subscriptions found");
        }

        let mut scopes = Vec::with_capacity(selected.len());
        let mut clusters_processed = 0usize;

        for subscription in selected {
            let _scope = subscription_span(&subscription.id, &subscription.display_name).entered();
            info!(
                "Processing subscription: {} ({})",
                subscription.display_name, subscription.id
            );

            let clusters = enumerator.list_clusters(&subscription);
            if clusters.is_empty() {
                info!("No AKS clusters found in {}", subscription.display_name);
            } else {
                info!("Found {} AKS cluster(s)", clusters.len());
            }

            let mut outcomes = Vec::with_capacity(clusters.len());
            for cluster in &clusters {
                if clusters_processed > 0 && !dry_run && !self.target_delay.is_zero() {
                    self.pause.pause(self.target_delay);
                }
                clusters_processed += 1;

                let _target = cluster_span(&cluster.resource_group, &cluster.name).entered();
                let outcome = sequencer.run(cluster);
                match (&outcome.failed_step, &outcome.failure_reason) {
                    (None, _) if dry_run => info!("{} previewed", cluster.name),
                    (None, _) => info!("✓ {} ready", cluster.name),
                    (Some(step), reason) => warn!(
                        "✗ {} failed at {} step: {}",
                        cluster.name,
                        step,
                        reason.as_deref().unwrap_or("unknown error")
                    ),
                }
                outcomes.push(outcome);
            }

            let summary = ScopeSummary::from_outcomes(subscription, &outcomes);
            scopes.push(ScopeReport { summary, outcomes });
        }

        let summary = RunSummary::from_scopes(scopes.iter().map(|s| &s.summary), dry_run);
        Ok(RunReport {
            summary,
            subscriptions_discovered: discovered.len(),
            scopes,
            started_at,
            finished_at: Utc::now(),
        })
    }
}

impl std::fmt::Debug for RunAggregator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunAggregator")
            .field("executor", &self.executor)
            .field("azure", &self.azure)
            .field("target_delay", &self.target_delay)
            .finish_non_exhaustive()
    }
}
