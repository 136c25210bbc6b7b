use thiserror::Error;

use crate::exit_codes::ExitCode;

/// Library-level error type for failures that terminate a run.
///
/// Only setup problems live here. Per-subscription listing failures and
/// per-cluster fetch failures are not errors at this level: they are recorded
/// in the run summary and the run continues.
///
/// # Exit Code Mapping
///
/// | Exit Code | Error Type |
/// |-----------|------------|
/// | 2 | Configuration errors |
/// | 3 | Missing tool / unauthenticated session |
/// | 4 | No subscriptions discovered |
#[derive(Error, Debug)]
pub enum AksCredsError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Precondition failed: {0}")]
    Precondition(#[from] PreconditionError),

    #[error("No subscriptions found or accessible")]
    NoSubscriptions,
}

/// Trait for providing user-friendly error reporting with context and suggestions
pub trait UserFriendlyError {
    /// Get a user-friendly error message
    fn user_message(&self) -> String;

    /// Get contextual information about the error
    fn context(&self) -> Option<String>;

    /// Get suggested actions to resolve the error
    fn suggestions(&self) -> Vec<String>;
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration file {path}: {reason}")]
    InvalidFile { path: String, reason: String },

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found at {path}")]
    NotFound { path: String },
}

impl UserFriendlyError for ConfigError {
    fn user_message(&self) -> String {
        match self {
            Self::InvalidFile { path, reason } => {
                format!("Configuration file {path} could not be read: {reason}")
            }
            Self::InvalidValue { key, value } => {
                format!("Configuration '{key}' has invalid value: {value}")
            }
            Self::NotFound { path } => format!("Configuration file not found: {path}"),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::InvalidFile { .. } => Some(
                "Configuration files are TOML with optional [defaults], [tools], [fetch] and [subscriptions] sections."
                    .to_string(),
            ),
            Self::InvalidValue { key, .. } => Some(format!(
                "The '{key}' option has specific format requirements."
            )),
            Self::NotFound { .. } => {
                Some("An explicit --config path or AKSCREDS_CONFIG must point to an existing file.".to_string())
            }
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidFile { .. } => vec![
                "Check the TOML syntax of the configuration file".to_string(),
                "Remove the file to fall back to built-in defaults".to_string(),
            ],
            Self::InvalidValue { key, .. } => match key.as_str() {
                "fetch.login_mode" => vec![
                    "Valid login modes: azurecli, devicecode, interactive, spn, ropc, msi, workloadidentity, azd"
                        .to_string(),
                ],
                "fetch.target_delay_ms" => {
                    vec!["Use a delay between 0 and 60000 milliseconds".to_string()]
                }
                _ => vec![format!("Fix or remove the '{key}' setting")],
            },
            Self::NotFound { .. } => vec![
                "Check the path passed to --config".to_string(),
                "Unset AKSCREDS_CONFIG to use discovery".to_string(),
            ],
        }
    }
}

/// Setup failures detected before any enumeration starts
#[derive(Error, Debug)]
pub enum PreconditionError {
    #[error("{tool} not found in PATH")]
    ToolMissing { tool: String },

    #[error("{tool} is not usable: {reason}")]
    ToolUnusable { tool: String, reason: String },

    #[error("Azure CLI session is not authenticated: {reason}")]
    NotAuthenticated { reason: String },
}

impl UserFriendlyError for PreconditionError {
    fn user_message(&self) -> String {
        match self {
            Self::ToolMissing { tool } => format!("{tool} not found - please install it first"),
            Self::ToolUnusable { tool, reason } => {
                format!("{tool} is installed but failed to run: {reason}")
            }
            Self::NotAuthenticated { .. } => {
                "You are not logged in to the Azure CLI".to_string()
            }
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::ToolMissing { .. } | Self::ToolUnusable { .. } => Some(
                "akscreds delegates listing and credential retrieval to the Azure CLI and kubelogin."
                    .to_string(),
            ),
            Self::NotAuthenticated { reason } => Some(format!("az account show reported: {reason}")),
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ToolMissing { tool } | Self::ToolUnusable { tool, .. } => match tool.as_str() {
                "kubelogin" => vec![
                    "Install guide: https://github.com/Azure/kubelogin".to_string(),
                    "Or run: az aks install-cli".to_string(),
                ],
                _ => vec![
                    "Install guide: https://learn.microsoft.com/cli/azure/install-azure-cli"
                        .to_string(),
                    "Set [tools] az in the config file if it lives outside PATH".to_string(),
                ],
            },
            Self::NotAuthenticated { .. } => vec![
                "Run: az login".to_string(),
                "Then verify with: az account show".to_string(),
            ],
        }
    }
}

impl UserFriendlyError for AksCredsError {
    fn user_message(&self) -> String {
        match self {
            Self::Config(err) => err.user_message(),
            Self::Precondition(err) => err.user_message(),
            Self::NoSubscriptions => "No subscriptions found or accessible".to_string(),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::Config(err) => err.context(),
            Self::Precondition(err) => err.context(),
            Self::NoSubscriptions => Some(
                "az account list returned no subscriptions for the signed-in account.".to_string(),
            ),
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Config(err) => err.suggestions(),
            Self::Precondition(err) => err.suggestions(),
            Self::NoSubscriptions => vec![
                "Check the signed-in account with: az account show".to_string(),
                "Refresh the subscription list with: az login".to_string(),
            ],
        }
    }
}

impl AksCredsError {
    /// Get a user-friendly error message with context and actionable suggestions.
    ///
    /// ```text
    /// Error: <user message>
    ///
    /// Context: <context if available>
    ///
    /// Suggestions:
    ///   • <suggestion 1>
    /// ```
    #[must_use]
    pub fn display_for_user(&self) -> String {
        let mut output = format!("Error: {}\n", self.user_message());

        if let Some(ctx) = self.context() {
            output.push_str(&format!("\nContext: {ctx}\n"));
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str("\nSuggestions:\n");
            for suggestion in suggestions {
                output.push_str(&format!("  • {suggestion}\n"));
            }
        }

        output
    }

    /// Map this error to the CLI exit code.
    #[must_use]
    pub fn to_exit_code(&self) -> ExitCode {
        match self {
            Self::Config(_) => ExitCode::CLI_ARGS,
            Self::Precondition(_) => ExitCode::PRECONDITION_FAILED,
            Self::NoSubscriptions => ExitCode::NO_SUBSCRIPTIONS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_mapping() {
        let config = AksCredsError::from(ConfigError::InvalidValue {
            key: "fetch.login_mode".to_string(),
            value: "bogus".to_string(),
        });
        assert_eq!(config.to_exit_code(), ExitCode::CLI_ARGS);

        let missing = AksCredsError::from(PreconditionError::ToolMissing {
            tool: "kubelogin".to_string(),
        });
        assert_eq!(missing.to_exit_code(), ExitCode::PRECONDITION_FAILED);

        let unauthenticated = AksCredsError::from(PreconditionError::NotAuthenticated {
            reason: "Please run 'az login'".to_string(),
        });
        assert_eq!(unauthenticated.to_exit_code(), ExitCode::PRECONDITION_FAILED);

        assert_eq!(
            AksCredsError::NoSubscriptions.to_exit_code(),
            ExitCode::NO_SUBSCRIPTIONS
        );
    }

    #[test]
    fn test_display_for_user_includes_suggestions() {
        let err = AksCredsError::from(PreconditionError::NotAuthenticated {
            reason: "Please run 'az login' to setup account.".to_string(),
        });
        let message = err.display_for_user();
        assert!(message.starts_with("Error: You are not logged in"));
        assert!(message.contains("Context: az account show reported"));
        assert!(message.contains("Suggestions:"));
        assert!(message.contains("  • Run: az login"));
    }

    #[test]
    fn test_kubelogin_suggestions_point_at_kubelogin() {
        let err = PreconditionError::ToolMissing {
            tool: "kubelogin".to_string(),
        };
        assert!(err.suggestions().iter().any(|s| s.contains("Azure/kubelogin")));
    }
}
