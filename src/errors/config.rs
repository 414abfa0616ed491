use std::env::VarError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// The variable is present but unreadable (not unicode)
    #[error("Environment variable error: {0}")]
    EnvVarError(#[from] VarError),

    /// The variable could not be parsed into its target type
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The variable parsed but holds an unusable value
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}
