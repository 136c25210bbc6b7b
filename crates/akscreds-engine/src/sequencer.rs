//! Per-cluster credential fetch sequence.
//!
//! Select, Fetch, Convert, strictly in that order. The first failing step ends
//! the sequence; nothing is retried. Each step depends on the one before it:
//! the fetch needs the selected subscription and the convert rewrites the entry
//! the fetch just wrote.

use tracing::debug;

use akscreds_runner::{CommandSpec, ExecutionResult, Executor};

use crate::azure::AzureCli;
use crate::model::{Cluster, FetchStep, SequenceOutcome};

/// Runs the fetch sequence for one cluster at a time.
#[derive(Debug, Clone, Copy)]
pub struct FetchSequencer<'a> {
    executor: &'a Executor,
    azure: &'a AzureCli,
}

impl<'a> FetchSequencer<'a> {
    #[must_use]
    pub fn new(executor: &'a Executor, azure: &'a AzureCli) -> Self {
        Self { executor, azure }
    }

    fn command_for(&self, step: FetchStep, cluster: &Cluster) -> CommandSpec {
        match step {
            FetchStep::Select => self.azure.select_subscription(&cluster.subscription_id),
            FetchStep::Fetch => self.azure.get_credentials(cluster),
            FetchStep::Convert => self.azure.convert_kubeconfig(),
        }
    }

    /// Run all three steps for `cluster`, stopping at the first failure.
    ///
    /// In dry-run mode none of the steps launch a process, so every step
    /// reports success.
    pub fn run(&self, cluster: &Cluster) -> SequenceOutcome {
        let mut executions: Vec<ExecutionResult> = Vec::with_capacity(FetchStep::ALL.len());

        for step in FetchStep::ALL {
            let result = self
                .executor
                .execute(&self.command_for(step, cluster), false);
            let succeeded = result.succeeded;
            let error_detail = result.error_detail.clone();
            executions.push(result);

            if !succeeded {
                debug!(step = %step, cluster = %cluster.name, "Step failed, halting sequence");
                return SequenceOutcome {
                    cluster: cluster.clone(),
                    steps_completed: executions.len() - 1,
                    succeeded: false,
                    failure_reason: Some(
                        error_detail.unwrap_or_else(|| format!("{step} step failed")),
                    ),
                    failed_step: Some(step),
                    executions,
                };
            }
            debug!(step = %step, cluster = %cluster.name, "Step completed");
        }

        SequenceOutcome {
            cluster: cluster.clone(),
            steps_completed: executions.len(),
            succeeded: true,
            failure_reason: None,
            failed_step: None,
            executions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedRunner;
    use akscreds_runner::ProcessOutput;
    use proptest::prelude::*;

    const SELECT: &[&str] = &["az", "account", "set"];
    const FETCH: &[&str] = &["az", "aks", "get-credentials"];
    const CONVERT: &[&str] = &["kubelogin", "convert-kubeconfig"];

    fn cluster() -> Cluster {
        Cluster::new("aks-prod", "rg-prod", "sub-1")
    }

    fn run_with(runner: &ScriptedRunner, dry_run: bool) -> SequenceOutcome {
        let exec = Executor::new(runner.clone(), dry_run);
        let azure = AzureCli::default();
        FetchSequencer::new(&exec, &azure).run(&cluster())
    }

    #[test]
    fn test_all_steps_succeed() {
        let runner = ScriptedRunner::new();
        let outcome = run_with(&runner, false);
        assert!(outcome.succeeded);
        assert_eq!(outcome.steps_completed, 3);
        assert_eq!(outcome.failure_reason, None);
        assert_eq!(outcome.executions.len(), 3);

        let calls = runner.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], vec!["az", "account", "set", "--subscription", "sub-1"]);
        assert_eq!(calls[2], vec!["kubelogin", "convert-kubeconfig", "--login", "azurecli"]);
    }

    #[test]
    fn test_fetch_failure_halts_before_convert() {
        let runner =
            ScriptedRunner::new().on(FETCH, ProcessOutput::failed(1, "ResourceNotFound"));
        let outcome = run_with(&runner, false);
        assert!(!outcome.succeeded);
        assert_eq!(outcome.steps_completed, 1);
        assert_eq!(outcome.failed_step, Some(FetchStep::Fetch));
        assert_eq!(outcome.failure_reason.as_deref(), Some("ResourceNotFound"));
        assert_eq!(runner.launched(CONVERT), 0);
    }

    #[test]
    fn test_select_failure_aborts_sequence() {
        let runner = ScriptedRunner::new().on(SELECT, ProcessOutput::failed(1, "no access"));
        let outcome = run_with(&runner, false);
        assert_eq!(outcome.steps_completed, 0);
        assert_eq!(outcome.failed_step, Some(FetchStep::Select));
        assert_eq!(runner.launched(FETCH), 0);
        assert_eq!(runner.calls().len(), 1);
    }

    #[test]
    fn test_dry_run_launches_nothing() {
        let runner = ScriptedRunner::new()
            .on(SELECT, ProcessOutput::failed(1, "must not run"))
            .on(FETCH, ProcessOutput::failed(1, "must not run"));
        let outcome = run_with(&runner, true);
        assert!(outcome.succeeded);
        assert_eq!(outcome.steps_completed, 3);
        assert!(outcome.executions.iter().all(|e| e.was_dry_run));
        assert!(runner.calls().is_empty());
    }

    proptest! {
        /// `steps_completed` is the length of the successful prefix and
        /// `succeeded` holds exactly when all three steps ran.
        #[test]
        fn prop_steps_completed_is_success_prefix(fails in prop::array::uniform3(any::<bool>())) {
            let mut runner = ScriptedRunner::new();
            for (prefix, fail) in [SELECT, FETCH, CONVERT].into_iter().zip(fails) {
                if fail {
                    runner = runner.on(prefix, ProcessOutput::failed(1, "scripted failure"));
                }
            }
            let outcome = run_with(&runner, false);

            let expected = fails.iter().take_while(|f| !**f).count();
            prop_assert_eq!(outcome.steps_completed, expected);
            prop_assert_eq!(outcome.succeeded, expected == 3);
            prop_assert_eq!(outcome.failure_reason.is_some(), expected < 3);
            prop_assert_eq!(outcome.executions.len(), (expected + 1).min(3));
            prop_assert_eq!(runner.calls().len(), (expected + 1).min(3));
        }
    }
}
