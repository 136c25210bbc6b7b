use std::collections::BTreeMap;

use crate::model::Config;

impl Config {
    /// Effective configuration as `key -> (value, source)`, sorted by key.
    #[must_use]
    pub fn effective_config(&self) -> BTreeMap<String, (String, String)> {
        let entries = [
            ("verbose", self.defaults.verbose.to_string()),
            ("dry_run", self.defaults.dry_run.to_string()),
            ("tools.az", self.tools.az.clone()),
            ("tools.kubelogin", self.tools.kubelogin.clone()),
            ("fetch.login_mode", self.fetch.login_mode.clone()),
            (
                "fetch.overwrite_existing",
                self.fetch.overwrite_existing.to_string(),
            ),
            (
                "fetch.target_delay_ms",
                self.fetch.target_delay_ms.to_string(),
            ),
            ("subscriptions.include", self.subscriptions.include.join(", ")),
        ];

        entries
            .into_iter()
            .map(|(key, value)| {
                let source = self.source_of(key).as_str().to_string();
                (key.to_string(), (value, source))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use akscreds_utils::types::ConfigSource;

    #[test]
    fn test_effective_config_reports_sources() {
        let mut config = Config::defaults();
        config.subscriptions.include = vec!["a".to_string(), "b".to_string()];
        config
            .source_attribution
            .insert("subscriptions.include".to_string(), ConfigSource::Cli);

        let effective = config.effective_config();

        assert_eq!(
            effective.get("subscriptions.include"),
            Some(&("a, b".to_string(), "cli".to_string()))
        );
        assert_eq!(
            effective.get("fetch.login_mode"),
            Some(&("azurecli".to_string(), "default".to_string()))
        );
        assert_eq!(effective.len(), 8);
    }
}
