//! Argv builders for every `az` / `kubelogin` call the engine makes.

use akscreds_config::Config;
use akscreds_runner::CommandSpec;

use crate::model::Cluster;

/// Command catalogue bound to the configured binaries and fetch options.
#[derive(Debug, Clone)]
pub struct AzureCli {
    az: String,
    kubelogin: String,
    login_mode: String,
    overwrite_existing: bool,
}

impl AzureCli {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            az: config.tools.az.clone(),
            kubelogin: config.tools.kubelogin.clone(),
            login_mode: config.fetch.login_mode.clone(),
            overwrite_existing: config.fetch.overwrite_existing,
        }
    }

    fn az(&self) -> CommandSpec {
        CommandSpec::new(&self.az)
    }

    /// `az account list --output json`
    #[must_use]
    pub fn list_subscriptions(&self) -> CommandSpec {
        self.az().args(["account", "list", "--output", "json"])
    }

    /// `az account set --subscription <id>`
    #[must_use]
    pub fn select_subscription(&self, subscription_id: &str) -> CommandSpec {
        self.az()
            .args(["account", "set", "--subscription"])
            .arg(subscription_id)
    }

    /// `az aks list --subscription <id> --output json`
    #[must_use]
    pub fn list_clusters(&self, subscription_id: &str) -> CommandSpec {
        self.az()
            .args(["aks", "list", "--subscription"])
            .arg(subscription_id)
            .args(["--output", "json"])
    }

    /// `az aks get-credentials --subscription <id> --resource-group <rg> --name <name>`
    #[must_use]
    pub fn get_credentials(&self, cluster: &Cluster) -> CommandSpec {
        let cmd = self
            .az()
            .args(["aks", "get-credentials", "--subscription"])
            .arg(&cluster.subscription_id)
            .arg("--resource-group")
            .arg(&cluster.resource_group)
            .arg("--name")
            .arg(&cluster.name);
        if self.overwrite_existing {
            cmd.arg("--overwrite-existing")
        } else {
            cmd
        }
    }

    /// `kubelogin convert-kubeconfig --login <mode>`
    #[must_use]
    pub fn convert_kubeconfig(&self) -> CommandSpec {
        CommandSpec::new(&self.kubelogin)
            .args(["convert-kubeconfig", "--login"])
            .arg(&self.login_mode)
    }
}

impl Default for AzureCli {
    fn default() -> Self {
        Self::from_config(&Config::defaults())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_commands() {
        let cli = AzureCli::default();
        assert_eq!(
            cli.list_subscriptions().argv(),
            vec!["az", "account", "list", "--output", "json"]
        );
        assert_eq!(
            cli.list_clusters("sub-1").argv(),
            vec!["az", "aks", "list", "--subscription", "sub-1", "--output", "json"]
        );
        assert_eq!(
            cli.select_subscription("sub-1").argv(),
            vec!["az", "account", "set", "--subscription", "sub-1"]
        );
    }

    #[test]
    fn test_get_credentials_threads_subscription() {
        let cli = AzureCli::default();
        let cluster = Cluster::new("aks-west", "rg-west", "sub-1");
        assert_eq!(
            cli.get_credentials(&cluster).argv(),
            vec![
                "az",
                "aks",
                "get-credentials",
                "--subscription",
                "sub-1",
                "--resource-group",
                "rg-west",
                "--name",
                "aks-west",
                "--overwrite-existing"
            ]
        );
    }

    #[test]
    fn test_configured_binaries_and_options() {
        let mut config = Config::defaults();
        config.tools.az = "/opt/az/bin/az".to_string();
        config.tools.kubelogin = "kl".to_string();
        config.fetch.login_mode = "devicecode".to_string();
        config.fetch.overwrite_existing = false;
        let cli = AzureCli::from_config(&config);

        let cluster = Cluster::new("c", "g", "s");
        let fetch = cli.get_credentials(&cluster).argv();
        assert_eq!(fetch[0], "/opt/az/bin/az");
        assert!(!fetch.contains(&"--overwrite-existing".to_string()));
        assert_eq!(
            cli.convert_kubeconfig().argv(),
            vec!["kl", "convert-kubeconfig", "--login", "devicecode"]
        );
    }
}
