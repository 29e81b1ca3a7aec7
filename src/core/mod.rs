//! Core run state model
//!
//! This module defines the per-run containers that steps use to hand
//! artifacts and results to each other while a pipeline executes.

pub mod artifact;
pub mod config;
pub mod error;
pub mod result;
pub mod run_state;
pub mod step;

pub use artifact::*;
pub use config::RunStateConfig;
pub use error::ConfigError;
pub use result::*;
pub use run_state::*;
pub use step::*;
