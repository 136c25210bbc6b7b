use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use akscreds_utils::types::ConfigSource;

/// kubelogin `--login` value used when nothing else is configured.
pub const DEFAULT_LOGIN_MODE: &str = "azurecli";

/// Pause between clusters in real runs.
pub const DEFAULT_TARGET_DELAY_MS: u64 = 1000;

/// Upper bound accepted for `fetch.target_delay_ms`.
pub const MAX_TARGET_DELAY_MS: u64 = 60_000;

/// Login modes understood by `kubelogin convert-kubeconfig --login`.
pub const LOGIN_MODES: &[&str] = &[
    "azurecli",
    "devicecode",
    "interactive",
    "spn",
    "ropc",
    "msi",
    "workloadidentity",
    "azd",
];

/// Values taken from the command line.
///
/// `None` / empty means "not given", so lower-precedence sources apply.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config_path: Option<PathBuf>,
    pub verbose: Option<bool>,
    pub dry_run: Option<bool>,
    pub subscriptions: Vec<String>,
}

/// Effective configuration for one run.
///
/// # Configuration File Format
///
/// ```toml
/// [defaults]
/// verbose = false
/// dry_run = false
///
/// [tools]
/// az = "az"
/// kubelogin = "kubelogin"
///
/// [fetch]
/// login_mode = "azurecli"
/// overwrite_existing = true
/// target_delay_ms = 1000
///
/// [subscriptions]
/// include = ["Production", "00000000-0000-0000-0000-000000000000"]
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub defaults: Defaults,
    pub tools: ToolsConfig,
    pub fetch: FetchConfig,
    pub subscriptions: SubscriptionsConfig,
    /// File the values were loaded from, if any.
    pub config_path: Option<PathBuf>,
    /// Source attribution for each setting (for verbose display).
    pub source_attribution: HashMap<String, ConfigSource>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Defaults {
    pub verbose: bool,
    pub dry_run: bool,
}

/// External binaries.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ToolsConfig {
    pub az: String,
    pub kubelogin: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            az: "az".to_string(),
            kubelogin: "kubelogin".to_string(),
        }
    }
}

/// Behaviour of the per-cluster fetch sequence.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct FetchConfig {
    /// Value passed to `kubelogin convert-kubeconfig --login`
    pub login_mode: String,
    /// Pass `--overwrite-existing` to `az aks get-credentials`
    pub overwrite_existing: bool,
    /// Pause between clusters in real runs, in milliseconds
    pub target_delay_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            login_mode: DEFAULT_LOGIN_MODE.to_string(),
            overwrite_existing: true,
            target_delay_ms: DEFAULT_TARGET_DELAY_MS,
        }
    }
}

/// Default subscription selectors, used when none are given on the command line.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct SubscriptionsConfig {
    #[serde(default)]
    pub include: Vec<String>,
}

impl Config {
    /// Built-in defaults with every key attributed to [`ConfigSource::Default`].
    #[must_use]
    pub fn defaults() -> Self {
        let source_attribution = [
            "verbose",
            "dry_run",
            "tools.az",
            "tools.kubelogin",
            "fetch.login_mode",
            "fetch.overwrite_existing",
            "fetch.target_delay_ms",
            "subscriptions.include",
        ]
        .into_iter()
        .map(|key| (key.to_string(), ConfigSource::Default))
        .collect();

        Self {
            defaults: Defaults::default(),
            tools: ToolsConfig::default(),
            fetch: FetchConfig::default(),
            subscriptions: SubscriptionsConfig::default(),
            config_path: None,
            source_attribution,
        }
    }

    /// Source of `key`, defaulting to [`ConfigSource::Default`].
    #[must_use]
    pub fn source_of(&self, key: &str) -> ConfigSource {
        self.source_attribution
            .get(key)
            .copied()
            .unwrap_or(ConfigSource::Default)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}
