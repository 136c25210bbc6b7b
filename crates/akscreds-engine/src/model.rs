//! Domain model: subscriptions, clusters, and the outcomes a run accumulates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use akscreds_runner::ExecutionResult;

/// One Azure subscription, as listed by `az account list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub display_name: String,
}

impl Subscription {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

/// One AKS cluster inside a subscription.
///
/// Identity is `(subscription_id, name)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    pub name: String,
    pub resource_group: String,
    pub subscription_id: String,
}

impl Cluster {
    pub fn new(
        name: impl Into<String>,
        resource_group: impl Into<String>,
        subscription_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            resource_group: resource_group.into(),
            subscription_id: subscription_id.into(),
        }
    }
}

/// The fixed steps of the credential fetch sequence, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStep {
    /// Scope the CLI session to the cluster's subscription
    Select,
    /// Merge the cluster's credentials into the local kubeconfig
    Fetch,
    /// Rewrite the kubeconfig entry to delegate auth to the Azure CLI
    Convert,
}

impl FetchStep {
    pub const ALL: [FetchStep; 3] = [FetchStep::Select, FetchStep::Fetch, FetchStep::Convert];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Fetch => "fetch",
            Self::Convert => "convert",
        }
    }
}

impl std::fmt::Display for FetchStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of running the fetch sequence for one cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequenceOutcome {
    pub cluster: Cluster,
    /// Steps that succeeded before the first failure (0-3)
    pub steps_completed: usize,
    /// True iff `steps_completed == 3`
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_step: Option<FetchStep>,
    /// One entry per step attempted
    pub executions: Vec<ExecutionResult>,
}

/// Found/succeeded counts for one processed subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScopeSummary {
    pub subscription: Subscription,
    pub targets_found: usize,
    pub targets_succeeded: usize,
}

impl ScopeSummary {
    /// Tally the outcomes of one subscription's clusters.
    #[must_use]
    pub fn from_outcomes(subscription: Subscription, outcomes: &[SequenceOutcome]) -> Self {
        Self {
            subscription,
            targets_found: outcomes.len(),
            targets_succeeded: outcomes.iter().filter(|o| o.succeeded).count(),
        }
    }

    #[must_use]
    pub fn targets_failed(&self) -> usize {
        self.targets_found - self.targets_succeeded
    }
}

/// Totals for a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub scopes_processed: usize,
    pub targets_found: usize,
    pub targets_succeeded: usize,
    pub dry_run: bool,
}

impl RunSummary {
    /// Sum per-subscription summaries.
    #[must_use]
    pub fn from_scopes<'a>(scopes: impl IntoIterator<Item = &'a ScopeSummary>, dry_run: bool) -> Self {
        scopes.into_iter().fold(
            Self {
                scopes_processed: 0,
                targets_found: 0,
                targets_succeeded: 0,
                dry_run,
            },
            |acc, scope| Self {
                scopes_processed: acc.scopes_processed + 1,
                targets_found: acc.targets_found + scope.targets_found,
                targets_succeeded: acc.targets_succeeded + scope.targets_succeeded,
                dry_run,
            },
        )
    }

    #[must_use]
    pub fn targets_failed(&self) -> usize {
        self.targets_found - self.targets_succeeded
    }
}

/// One processed subscription with the outcome of every cluster in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScopeReport {
    pub summary: ScopeSummary,
    pub outcomes: Vec<SequenceOutcome>,
}

/// Everything a run produced, in processing order.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub summary: RunSummary,
    /// Subscriptions listed before filtering
    pub subscriptions_discovered: usize,
    pub scopes: Vec<ScopeReport>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    /// Per-subscription summaries, in processing order.
    pub fn scope_summaries(&self) -> impl Iterator<Item = &ScopeSummary> {
        self.scopes.iter().map(|scope| &scope.summary)
    }

    /// Every cluster outcome across all subscriptions.
    pub fn outcomes(&self) -> impl Iterator<Item = &SequenceOutcome> {
        self.scopes.iter().flat_map(|scope| scope.outcomes.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(name: &str, succeeded: bool) -> SequenceOutcome {
        SequenceOutcome {
            cluster: Cluster::new(name, "rg", "sub"),
            steps_completed: if succeeded { 3 } else { 1 },
            succeeded,
            failure_reason: (!succeeded).then(|| "boom".to_string()),
            failed_step: (!succeeded).then_some(FetchStep::Fetch),
            executions: Vec::new(),
        }
    }

    #[test]
    fn test_scope_summary_counts() {
        let summary = ScopeSummary::from_outcomes(
            Subscription::new("s1", "Dev"),
            &[outcome("a", true), outcome("b", false), outcome("c", true)],
        );
        assert_eq!(summary.targets_found, 3);
        assert_eq!(summary.targets_succeeded, 2);
        assert_eq!(summary.targets_failed(), 1);
    }

    #[test]
    fn test_run_summary_sums_scopes() {
        let scopes = vec![
            ScopeSummary::from_outcomes(Subscription::new("s1", "Dev"), &[outcome("a", true)]),
            ScopeSummary::from_outcomes(Subscription::new("s2", "Prod"), &[]),
            ScopeSummary::from_outcomes(
                Subscription::new("s3", "Test"),
                &[outcome("b", false), outcome("c", true)],
            ),
        ];
        let run = RunSummary::from_scopes(&scopes, false);
        assert_eq!(run.scopes_processed, 3);
        assert_eq!(run.targets_found, 3);
        assert_eq!(run.targets_succeeded, 2);
        assert!(!run.dry_run);
    }

    #[test]
    fn test_empty_run_summary() {
        let run = RunSummary::from_scopes(std::iter::empty(), true);
        assert_eq!(run.scopes_processed, 0);
        assert_eq!(run.targets_found, 0);
        assert!(run.dry_run);
    }

    #[test]
    fn test_outcome_serialization_omits_empty_failure() {
        let json = serde_json::to_value(outcome("a", true)).unwrap();
        assert!(json.get("failure_reason").is_none());
        assert_eq!(json["steps_completed"], 3);

        let json = serde_json::to_value(outcome("b", false)).unwrap();
        assert_eq!(json["failed_step"], "fetch");
    }
}
