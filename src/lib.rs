//! runstate - per-run artifact and result store for pipeline execution

pub mod core;
pub mod fakes;
pub mod logging;

// Re-export commonly used types
pub use crate::core::{
    Artifact, ArtifactHandle, ArtifactRepository, ConfigError, ExecRunState, PlanId,
    ResultSlot, ResultStore, ResultValue, RunState, RunStateConfig, StepId,
};
pub use fakes::{FakeArtifact, FakeRunState};
