//! Configuration for akscreds
//!
//! Precedence: CLI arguments > `AKSCREDS_*` environment > config file > defaults.

mod discovery;
mod model;
mod sources;
mod validation;

pub use model::{
    CliArgs, Config, Defaults, FetchConfig, SubscriptionsConfig, ToolsConfig,
    DEFAULT_LOGIN_MODE, DEFAULT_TARGET_DELAY_MS, LOGIN_MODES, MAX_TARGET_DELAY_MS,
};
pub use akscreds_utils::types::ConfigSource;
