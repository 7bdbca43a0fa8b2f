//! Configuration errors

use std::fmt;

/// Error produced while loading a stage configuration
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// The JSON document could not be parsed
    Parse(String),
    /// A field holds a value the stage cannot run with
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(msg) => write!(f, "invalid config JSON: {}", msg),
            ConfigError::Invalid { field, reason } => write!(f, "invalid `{}`: {}", field, reason),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
