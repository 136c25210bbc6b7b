//! Test doubles for the engine: a scripted process runner, listing fixtures and
//! stand-ins for the preflight and the inter-cluster pause.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;

use akscreds_doctor::PreconditionCheck;
use akscreds_runner::{CommandSpec, Executor, ProcessOutput, ProcessRunner, RunnerError};
use akscreds_utils::error::PreconditionError;
use akscreds_utils::types::{DoctorCheck, DoctorOutput};

use crate::aggregator::Pause;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// [`ProcessRunner`] that answers from argv-prefix rules and records every launch.
///
/// The most recently added matching rule wins. Commands no rule matches exit 0
/// with empty output. Clones share the call log, so a test can hand a clone to
/// an [`Executor`] and inspect the original afterwards.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRunner {
    rules: Vec<(Vec<String>, Result<ProcessOutput, String>)>,
    calls: Arc<Mutex<Vec<Vec<String>>>>,
}

impl ScriptedRunner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer commands starting with `prefix` with `output`.
    #[must_use]
    pub fn on(mut self, prefix: &[&str], output: ProcessOutput) -> Self {
        self.rules
            .push((prefix.iter().map(|p| p.to_string()).collect(), Ok(output)));
        self
    }

    /// Make commands starting with `prefix` fail to launch.
    #[must_use]
    pub fn unlaunchable(mut self, prefix: &[&str], reason: &str) -> Self {
        self.rules.push((
            prefix.iter().map(|p| p.to_string()).collect(),
            Err(reason.to_string()),
        ));
        self
    }

    /// Script `az account list` and one `az aks list` per subscription.
    #[must_use]
    pub fn azure(subscriptions: &[(&str, &str)], clusters: &[(&str, &[(&str, &str)])]) -> Self {
        let mut runner = Self::new().on(
            &["az", "account", "list"],
            ProcessOutput::ok(accounts_json(subscriptions)),
        );
        for (subscription_id, entries) in clusters {
            runner = runner.on(
                &["az", "aks", "list", "--subscription", *subscription_id],
                ProcessOutput::ok(clusters_json(entries)),
            );
        }
        runner
    }

    /// Every argv launched so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<Vec<String>> {
        lock(&self.calls).clone()
    }

    /// Number of launched commands starting with `prefix`.
    #[must_use]
    pub fn launched(&self, prefix: &[&str]) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|argv| {
                argv.len() >= prefix.len() && argv.iter().zip(prefix).all(|(a, p)| a == p)
            })
            .count()
    }
}

impl ProcessRunner for ScriptedRunner {
    fn run(&self, cmd: &CommandSpec) -> Result<ProcessOutput, RunnerError> {
        lock(&self.calls).push(cmd.argv());

        let rule = self.rules.iter().rev().find(|(prefix, _)| {
            let prefix: Vec<&str> = prefix.iter().map(String::as_str).collect();
            cmd.starts_with(&prefix)
        });

        match rule {
            Some((_, Ok(output))) => Ok(output.clone()),
            Some((_, Err(reason))) => Err(RunnerError::SpawnFailed {
                program: cmd.program.to_string_lossy().into_owned(),
                reason: reason.clone(),
            }),
            None => Ok(ProcessOutput::ok("")),
        }
    }
}

/// `az account list --output json` output for `(id, name)` pairs.
#[must_use]
pub fn accounts_json(subscriptions: &[(&str, &str)]) -> String {
    let entries: Vec<serde_json::Value> = subscriptions
        .iter()
        .map(|(id, name)| {
            serde_json::json!({
                "cloudName": "AzureCloud",
                "id": id,
                "isDefault": false,
                "name": name,
                "state": "Enabled",
                "tenantId": "00000000-0000-0000-0000-000000000000",
            })
        })
        .collect();
    serde_json::Value::Array(entries).to_string()
}

/// `az aks list --output json` output for `(name, resource_group)` pairs.
#[must_use]
pub fn clusters_json(clusters: &[(&str, &str)]) -> String {
    let entries: Vec<serde_json::Value> = clusters
        .iter()
        .map(|(name, group)| {
            serde_json::json!({
                "location": "westeurope",
                "name": name,
                "provisioningState": "Succeeded",
                "resourceGroup": group,
            })
        })
        .collect();
    serde_json::Value::Array(entries).to_string()
}

/// Preflight stand-in with a fixed verdict.
#[derive(Debug, Default)]
pub struct StubPreflight {
    failure: Option<fn() -> PreconditionError>,
}

impl StubPreflight {
    #[must_use]
    pub fn passing() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn failing(failure: fn() -> PreconditionError) -> Self {
        Self {
            failure: Some(failure),
        }
    }
}

impl PreconditionCheck for StubPreflight {
    fn verify(&self, _executor: &Executor) -> Result<DoctorOutput, PreconditionError> {
        if let Some(failure) = self.failure {
            return Err(failure());
        }
        Ok(DoctorOutput {
            emitted_at: Utc::now(),
            ok: true,
            checks: vec![DoctorCheck::pass("stub", "preflight skipped in tests")],
        })
    }
}

/// [`Pause`] that records requested delays instead of sleeping.
#[derive(Debug, Clone, Default)]
pub struct RecordingPause {
    pauses: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingPause {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn pauses(&self) -> Vec<Duration> {
        lock(&self.pauses).clone()
    }
}

impl Pause for RecordingPause {
    fn pause(&self, duration: Duration) {
        lock(&self.pauses).push(duration);
    }
}
