//! Test doubles for code that consumes a run state

pub mod run_state;

pub use run_state::{FakeRunState, Invocation};

use crate::core::artifact::{Artifact, ArtifactHandle};

/// Artifact with nothing behind it but an ID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeArtifact {
    pub id: String,
}

impl FakeArtifact {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Wrap a new fake artifact in a handle
    pub fn handle(id: impl Into<String>) -> ArtifactHandle {
        ArtifactHandle::new(Self::new(id))
    }
}

impl Artifact for FakeArtifact {
    fn id(&self) -> &str {
        &self.id
    }
}
