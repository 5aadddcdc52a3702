//! Configuration validator
//!
//! Validates configuration values to ensure they are within acceptable ranges.

use super::loader::{AccessConfig, Config, ConfigError, LoggingConfig};

const VALID_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates the entire configuration
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        Self::validate_access(&config.access)?;
        Self::validate_logging(&config.logging)?;
        Ok(())
    }

    fn validate_access(access: &AccessConfig) -> Result<(), ConfigError> {
        access
            .options()
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("[access] {}", e)))
    }

    fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
        if logging.level.trim().is_empty() {
            return Err(ConfigError::Invalid("Log level cannot be empty".to_string()));
        }

        if !VALID_LEVELS.contains(&logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level: {}. Must be one of: {:?}",
                logging.level, VALID_LEVELS
            )));
        }

        Ok(())
    }
}

/// Validates a configuration
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    ConfigValidator::validate(config)
}
