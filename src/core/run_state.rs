//! Run state - per-run artifacts and step results shared across steps

use crate::core::{
    artifact::ArtifactRepository,
    config::RunStateConfig,
    result::{ResultSlot, ResultStore, ResultValue},
    step::StepId,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Mutable context threaded through every step of one pipeline run
///
/// Implementations must tolerate concurrent calls from parallel branches
/// without callers taking any lock of their own.
pub trait RunState: Send + Sync {
    /// The run-scoped artifact repository (same instance on every call)
    fn artifacts(&self) -> Arc<ArtifactRepository>;

    /// Copy a prior step's result into `out`; `false` if absent or of another type
    fn result(&self, step_id: &StepId, out: &mut dyn ResultSlot) -> bool;

    /// Record a step's result for later lookup
    fn store_result(&self, step_id: StepId, value: ResultValue);
}

/// Production run state backed by in-memory maps
#[derive(Debug)]
pub struct ExecRunState {
    run_id: Uuid,
    started_at: DateTime<Utc>,
    artifacts: Arc<ArtifactRepository>,
    results: Arc<ResultStore>,
    parent: Option<Arc<ExecRunState>>,
}

impl ExecRunState {
    /// Create the state for a new run
    pub fn new() -> Self {
        Self::with_config(RunStateConfig::default())
    }

    pub fn with_config(config: RunStateConfig) -> Self {
        let run_id = Uuid::new_v4();
        debug!("Creating run state {}", run_id);

        Self {
            run_id,
            started_at: Utc::now(),
            artifacts: Arc::new(ArtifactRepository::with_config(&config)),
            results: Arc::new(ResultStore::with_config(&config)),
            parent: None,
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Direct access to the result store, e.g. for overwrite reports
    pub fn result_store(&self) -> &ResultStore {
        &self.results
    }

    /// Child state with its own artifact scope
    ///
    /// Results stay shared with the parent, so a step nested inside the scope
    /// can still see (and publish) results by step ID.
    pub fn new_local_scope(self: &Arc<Self>) -> Arc<ExecRunState> {
        debug!("Opening local scope in run {}", self.run_id);

        Arc::new(ExecRunState {
            run_id: self.run_id,
            started_at: self.started_at,
            artifacts: self.artifacts.new_local_scope(),
            results: Arc::clone(&self.results),
            parent: Some(Arc::clone(self)),
        })
    }

    /// The enclosing state, if this is a local scope
    pub fn parent(&self) -> Option<&Arc<ExecRunState>> {
        self.parent.as_ref()
    }
}

impl Default for ExecRunState {
    fn default() -> Self {
        Self::new()
    }
}

impl RunState for ExecRunState {
    fn artifacts(&self) -> Arc<ArtifactRepository> {
        Arc::clone(&self.artifacts)
    }

    fn result(&self, step_id: &StepId, out: &mut dyn ResultSlot) -> bool {
        self.results.result(step_id, out)
    }

    fn store_result(&self, step_id: StepId, value: ResultValue) {
        self.results.store_result(step_id, value)
    }
}
