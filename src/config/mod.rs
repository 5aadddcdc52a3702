//! Configuration for the `pmu` tool
//!
//! Provides configuration loading, validation, and default settings.

mod defaults;
mod loader;
mod validator;

pub use defaults::{default_config, ConfigDefaults};
pub use loader::{AccessConfig, CodesConfig, Config, ConfigError, ConfigLoader, LoggingConfig};
pub use validator::{validate_config, ConfigValidator};
