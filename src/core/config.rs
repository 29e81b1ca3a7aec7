//! Run state configuration from YAML

use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Upper bound for the pre-allocated capacity of either map
pub const MAX_CAPACITY: usize = 65_536;

/// Tunables for a run state
///
/// All fields are optional in YAML:
///
/// ```yaml
/// warn_on_overwrite: true
/// artifact_capacity: 32
/// result_capacity: 64
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStateConfig {
    /// Log a warning whenever an artifact name or step result is written twice
    #[serde(default = "default_warn_on_overwrite")]
    pub warn_on_overwrite: bool,

    /// Initial capacity of the artifact map
    #[serde(default = "default_capacity")]
    pub artifact_capacity: usize,

    /// Initial capacity of the result map
    #[serde(default = "default_capacity")]
    pub result_capacity: usize,
}

fn default_warn_on_overwrite() -> bool {
    true
}

fn default_capacity() -> usize {
    16
}

impl Default for RunStateConfig {
    fn default() -> Self {
        Self {
            warn_on_overwrite: default_warn_on_overwrite(),
            artifact_capacity: default_capacity(),
            result_capacity: default_capacity(),
        }
    }
}

impl RunStateConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: RunStateConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.artifact_capacity > MAX_CAPACITY {
            return Err(ConfigError::Invalid(format!(
                "artifact_capacity {} exceeds maximum of {}",
                self.artifact_capacity, MAX_CAPACITY
            )));
        }
        if self.result_capacity > MAX_CAPACITY {
            return Err(ConfigError::Invalid(format!(
                "result_capacity {} exceeds maximum of {}",
                self.result_capacity, MAX_CAPACITY
            )));
        }
        Ok(())
    }
}
