use akscreds_utils::error::ConfigError;

use crate::model::{Config, LOGIN_MODES, MAX_TARGET_DELAY_MS};

impl Config {
    /// Reject values the external tools would choke on mid-run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("tools.az", &self.tools.az),
            ("tools.kubelogin", &self.tools.kubelogin),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: "binary must not be empty".to_string(),
                });
            }
        }

        if !LOGIN_MODES.contains(&self.fetch.login_mode.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "fetch.login_mode".to_string(),
                value: self.fetch.login_mode.clone(),
            });
        }

        if self.fetch.target_delay_ms > MAX_TARGET_DELAY_MS {
            return Err(ConfigError::InvalidValue {
                key: "fetch.target_delay_ms".to_string(),
                value: self.fetch.target_delay_ms.to_string(),
            });
        }

        if let Some(blank) = self
            .subscriptions
            .include
            .iter()
            .find(|s| s.trim().is_empty())
        {
            return Err(ConfigError::InvalidValue {
                key: "subscriptions.include".to_string(),
                value: format!("'{blank}' is not a valid selector"),
            });
        }

        Ok(())
    }
}
