//! Error types for run state configuration

use thiserror::Error;

/// Errors raised while loading a [`RunStateConfig`](crate::core::config::RunStateConfig)
///
/// The store itself never fails; configuration is the only fallible surface.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
