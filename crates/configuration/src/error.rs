use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Invalid configuration value for '{key}': {reason}")]
    ValidationError { key: &'static str, reason: String },
}
