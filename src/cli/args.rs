//! CLI argument definitions

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// akscreds - fetch kubeconfig credentials for all your AKS clusters
#[derive(Parser, Debug)]
#[command(name = "akscreds")]
#[command(about = "Fetch kubeconfig credentials for every AKS cluster across your Azure subscriptions")]
#[command(long_about = r#"
akscreds lists your Azure subscriptions, finds the AKS clusters in each, and for
every cluster runs:

  az account set --subscription <id>
  az aks get-credentials --resource-group <group> --name <cluster> --overwrite-existing
  kubelogin convert-kubeconfig --login azurecli

A cluster that fails is reported and skipped; the run always ends with a summary.

EXAMPLES:
  # All clusters in all subscriptions
  akscreds

  # Preview without changing ~/.kube/config
  akscreds --dry-run

  # Only some subscriptions (by name or id)
  akscreds -s Production -s "Dev Team"
  akscreds --subscription 00000000-0000-0000-0000-000000000000

  # Debug output
  akscreds --verbose

CONFIGURATION:
  Precedence: CLI flags > AKSCREDS_* environment > config file > defaults
  Config file: --config, $AKSCREDS_CONFIG, .akscreds/config.toml (searched upward
  from the current directory), then the user config directory.

EXIT CODES:
  0 run completed (even if some clusters failed)
  2 invalid arguments or configuration
  3 az or kubelogin missing, or not logged in
  4 no subscriptions found
"#)]
#[command(version)]
pub struct Cli {
    /// Show what would be done without fetching credentials
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output (every command and step)
    #[arg(short, long)]
    pub verbose: bool,

    /// Only process these subscriptions (name or id, repeatable)
    #[arg(short = 's', long = "subscription", value_name = "SUBSCRIPTION", num_args = 1.., action = ArgAction::Append)]
    pub subscriptions: Vec<String>,

    /// Path to configuration file (overrides discovery)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Emit the run report as JSON instead of the text summary
    #[arg(long)]
    pub json: bool,
}

/// Build the CLI command structure
pub fn build_cli() -> clap::Command {
    <Cli as clap::CommandFactory>::command()
}
