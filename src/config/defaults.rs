//! Default configuration values

use serde::{Deserialize, Serialize};

/// Default configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigDefaults {
    pub access: AccessDefaults,
    pub logging: LoggingDefaults,
}

/// Default pointer walking and string reading settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessDefaults {
    pub pointer_width: usize,
    pub string_window: usize,
    pub strict: bool,
}

/// Default logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingDefaults {
    pub level: String,
}

/// Returns the default configuration
pub fn default_config() -> ConfigDefaults {
    ConfigDefaults {
        access: AccessDefaults {
            pointer_width: crate::resolver::DEFAULT_POINTER_WIDTH,
            string_window: crate::memory::DEFAULT_STRING_WINDOW,
            strict: false,
        },
        logging: LoggingDefaults {
            level: "info".to_string(),
        },
    }
}
