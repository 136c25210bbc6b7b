use serde::Deserialize;
use std::path::{Path, PathBuf};

use akscreds_utils::error::ConfigError;
use akscreds_utils::types::ConfigSource;

use crate::model::{CliArgs, Config};

/// Directory searched for in the working tree.
const PROJECT_CONFIG_DIR: &str = ".akscreds";
const CONFIG_FILE_NAME: &str = "config.toml";
/// Directory under the user config dir (e.g. `~/.config/akscreds`).
const USER_CONFIG_DIR: &str = "akscreds";

pub(crate) const ENV_CONFIG: &str = "AKSCREDS_CONFIG";
pub(crate) const ENV_AZ_BIN: &str = "AKSCREDS_AZ_BIN";
pub(crate) const ENV_KUBELOGIN_BIN: &str = "AKSCREDS_KUBELOGIN_BIN";
pub(crate) const ENV_LOGIN_MODE: &str = "AKSCREDS_LOGIN_MODE";

/// TOML configuration file structure
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    defaults: Option<TomlDefaults>,
    tools: Option<TomlTools>,
    fetch: Option<TomlFetch>,
    subscriptions: Option<TomlSubscriptions>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlDefaults {
    verbose: Option<bool>,
    dry_run: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlTools {
    az: Option<String>,
    kubelogin: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlFetch {
    login_mode: Option<String>,
    overwrite_existing: Option<bool>,
    target_delay_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlSubscriptions {
    include: Option<Vec<String>>,
}

impl Config {
    /// Discover and load configuration with precedence: CLI > env > file > defaults
    ///
    /// Uses the current working directory, the process environment and the
    /// platform user config directory.
    pub fn discover(cli_args: &CliArgs) -> Result<Self, ConfigError> {
        let start_dir = std::env::current_dir().map_err(|e| ConfigError::InvalidValue {
            key: "current_dir".to_string(),
            value: e.to_string(),
        })?;
        let user_dir = dirs::config_dir().map(|dir| dir.join(USER_CONFIG_DIR));
        Self::discover_from(&start_dir, user_dir.as_deref(), cli_args, &|key| {
            std::env::var(key).ok()
        })
    }

    /// Path-driven variant of [`Config::discover`] used by tests to avoid
    /// process-global state.
    ///
    /// `env` looks up environment variables; `user_config_dir` is the directory
    /// that may hold a user-level `config.toml`.
    pub fn discover_from(
        start_dir: &Path,
        user_config_dir: Option<&Path>,
        cli_args: &CliArgs,
        env: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Config::defaults();

        let env_value = |key: &str| env(key).filter(|value| !value.trim().is_empty());

        // An explicitly named file must exist; discovered files are optional.
        let config_path = if let Some(explicit) = &cli_args.config_path {
            Some(require_exists(explicit)?)
        } else if let Some(from_env) = env_value(ENV_CONFIG) {
            Some(require_exists(Path::new(&from_env))?)
        } else {
            Self::discover_config_file_from(start_dir).or_else(|| {
                user_config_dir
                    .map(|dir| dir.join(CONFIG_FILE_NAME))
                    .filter(|path| path.is_file())
            })
        };

        if let Some(path) = &config_path {
            config.apply_file(load_config_file(path)?);
            config.config_path = Some(path.clone());
        }

        if let Some(az) = env_value(ENV_AZ_BIN) {
            config.tools.az = az;
            config.attribute("tools.az", ConfigSource::Env);
        }
        if let Some(kubelogin) = env_value(ENV_KUBELOGIN_BIN) {
            config.tools.kubelogin = kubelogin;
            config.attribute("tools.kubelogin", ConfigSource::Env);
        }
        if let Some(mode) = env_value(ENV_LOGIN_MODE) {
            config.fetch.login_mode = mode;
            config.attribute("fetch.login_mode", ConfigSource::Env);
        }

        if let Some(verbose) = cli_args.verbose.filter(|v| *v) {
            config.defaults.verbose = verbose;
            config.attribute("verbose", ConfigSource::Cli);
        }
        if let Some(dry_run) = cli_args.dry_run.filter(|v| *v) {
            config.defaults.dry_run = dry_run;
            config.attribute("dry_run", ConfigSource::Cli);
        }
        if !cli_args.subscriptions.is_empty() {
            config.subscriptions.include = cli_args.subscriptions.clone();
            config.attribute("subscriptions.include", ConfigSource::Cli);
        }

        config.validate()?;
        Ok(config)
    }

    /// Walk up from `start_dir` looking for `.akscreds/config.toml`, stopping at
    /// a repository root marker (.git, .hg, .svn) or the filesystem root.
    #[must_use]
    pub fn discover_config_file_from(start_dir: &Path) -> Option<PathBuf> {
        let mut current = Some(start_dir);

        while let Some(dir) = current {
            let candidate = dir.join(PROJECT_CONFIG_DIR).join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                return Some(candidate);
            }

            if dir.join(".git").exists() || dir.join(".hg").exists() || dir.join(".svn").exists()
            {
                break;
            }
            current = dir.parent();
        }

        None
    }

    fn attribute(&mut self, key: &str, source: ConfigSource) {
        self.source_attribution.insert(key.to_string(), source);
    }

    fn apply_file(&mut self, file: TomlConfig) {
        let src = ConfigSource::Config;

        if let Some(defaults) = file.defaults {
            if let Some(verbose) = defaults.verbose {
                self.defaults.verbose = verbose;
                self.attribute("verbose", src);
            }
            if let Some(dry_run) = defaults.dry_run {
                self.defaults.dry_run = dry_run;
                self.attribute("dry_run", src);
            }
        }

        if let Some(tools) = file.tools {
            if let Some(az) = tools.az {
                self.tools.az = az;
                self.attribute("tools.az", src);
            }
            if let Some(kubelogin) = tools.kubelogin {
                self.tools.kubelogin = kubelogin;
                self.attribute("tools.kubelogin", src);
            }
        }

        if let Some(fetch) = file.fetch {
            if let Some(login_mode) = fetch.login_mode {
                self.fetch.login_mode = login_mode;
                self.attribute("fetch.login_mode", src);
            }
            if let Some(overwrite) = fetch.overwrite_existing {
                self.fetch.overwrite_existing = overwrite;
                self.attribute("fetch.overwrite_existing", src);
            }
            if let Some(delay) = fetch.target_delay_ms {
                self.fetch.target_delay_ms = delay;
                self.attribute("fetch.target_delay_ms", src);
            }
        }

        if let Some(include) = file.subscriptions.and_then(|s| s.include) {
            self.subscriptions.include = include;
            self.attribute("subscriptions.include", src);
        }
    }
}

fn require_exists(path: &Path) -> Result<PathBuf, ConfigError> {
    if path.is_file() {
        Ok(path.to_path_buf())
    } else {
        Err(ConfigError::NotFound {
            path: path.display().to_string(),
        })
    }
}

fn load_config_file(path: &Path) -> Result<TomlConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::InvalidFile {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::InvalidFile {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}
