//! Subscription and cluster discovery.
//!
//! Listing commands are read-only, so they run even in dry-run mode. A listing
//! that fails, or prints something that is not the expected JSON, yields an empty
//! result instead of an error.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use tracing::{debug, warn};

use akscreds_runner::Executor;

use crate::azure::AzureCli;
use crate::model::{Cluster, Subscription};

/// Entry of `az account list --output json`.
#[derive(Debug, Deserialize)]
struct AccountEntry {
    id: Option<String>,
    name: Option<String>,
}

/// Entry of `az aks list --output json`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClusterEntry {
    name: Option<String>,
    resource_group: Option<String>,
}

/// Lists subscriptions and the clusters inside them.
#[derive(Debug, Clone, Copy)]
pub struct TargetEnumerator<'a> {
    executor: &'a Executor,
    azure: &'a AzureCli,
}

impl<'a> TargetEnumerator<'a> {
    #[must_use]
    pub fn new(executor: &'a Executor, azure: &'a AzureCli) -> Self {
        Self { executor, azure }
    }

    /// Every subscription visible to the signed-in account, in tool output order.
    ///
    /// Duplicate ids keep their first occurrence.
    pub fn list_subscriptions(&self) -> Vec<Subscription> {
        let result = self
            .executor
            .execute(&self.azure.list_subscriptions(), true);
        if !result.succeeded {
            warn!("Could not list subscriptions");
            return Vec::new();
        }

        let Some(entries) = parse_listing::<AccountEntry>(&result.output, "subscription") else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        let subscriptions: Vec<Subscription> = entries
            .into_iter()
            .filter_map(|entry| match (entry.id, entry.name) {
                (Some(id), Some(name)) => Some(Subscription::new(id, name)),
                (id, _) => {
                    warn!(id = ?id, "Skipping subscription entry without id or name");
                    None
                }
            })
            .filter(|sub| seen.insert(sub.id.clone()))
            .collect();

        debug!(count = subscriptions.len(), "Listed subscriptions");
        subscriptions
    }

    /// Clusters in `subscription`, in tool output order.
    ///
    /// Clusters are identified by name within a subscription, which is also the
    /// kubeconfig context name `get-credentials` writes. A repeated name keeps
    /// its first occurrence and the drop is logged.
    ///
    /// Selects the subscription first. If selection or listing fails the
    /// subscription is treated as having no clusters.
    pub fn list_clusters(&self, subscription: &Subscription) -> Vec<Cluster> {
        let select = self
            .executor
            .execute(&self.azure.select_subscription(&subscription.id), true);
        if !select.succeeded {
            warn!(
                subscription = %subscription.display_name,
                "Could not access subscription"
            );
            return Vec::new();
        }

        let result = self
            .executor
            .execute(&self.azure.list_clusters(&subscription.id), true);
        if !result.succeeded {
            warn!(
                subscription = %subscription.display_name,
                "Could not list clusters"
            );
            return Vec::new();
        }

        let Some(entries) = parse_listing::<ClusterEntry>(&result.output, "cluster") else {
            return Vec::new();
        };

        let mut seen: HashMap<String, String> = HashMap::new();
        let clusters: Vec<Cluster> = entries
            .into_iter()
            .filter_map(|entry| match (entry.name, entry.resource_group) {
                (Some(name), Some(group)) => Some(Cluster::new(name, group, &subscription.id)),
                (name, _) => {
                    warn!(name = ?name, "Skipping cluster entry without name or resource group");
                    None
                }
            })
            .filter(|cluster| match seen.get(&cluster.name) {
                Some(kept_group) => {
                    warn!(
                        cluster = %cluster.name,
                        kept = %kept_group,
                        skipped = %cluster.resource_group,
                        "Skipping cluster with a name already listed in this subscription"
                    );
                    false
                }
                None => {
                    seen.insert(cluster.name.clone(), cluster.resource_group.clone());
                    true
                }
            })
            .collect();

        debug!(
            subscription = %subscription.id,
            count = clusters.len(),
            "Listed clusters"
        );
        clusters
    }
}

/// Parse a JSON array listing, logging and returning `None` when it is malformed.
///
/// Empty output is an empty listing.
fn parse_listing<T: for<'de> Deserialize<'de>>(output: &str, kind: &str) -> Option<Vec<T>> {
    if output.trim().is_empty() {
        return Some(Vec::new());
    }
    match serde_json::from_str::<Vec<T>>(output) {
        Ok(entries) => Some(entries),
        Err(err) => {
            warn!(kind = kind, error = %err, "Unparseable listing output");
            None
        }
    }
}
