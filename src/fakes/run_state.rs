//! Recording fake for the [`RunState`] trait

use crate::core::{
    artifact::ArtifactRepository,
    result::{ResultSlot, ResultValue},
    run_state::RunState,
    step::StepId,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

type ArtifactsStub = Arc<dyn Fn() -> Arc<ArtifactRepository> + Send + Sync>;
type ResultStub = Arc<dyn Fn(&StepId, &mut dyn ResultSlot) -> bool + Send + Sync>;
type StoreResultStub = Arc<dyn Fn(StepId, ResultValue) + Send + Sync>;

/// One recorded call on the fake
#[derive(Debug, Clone)]
pub enum Invocation {
    Artifacts,
    Result { step_id: StepId },
    StoreResult { step_id: StepId, value: ResultValue },
}

impl Invocation {
    /// Method name used as the key in [`FakeRunState::invocations`]
    pub fn method(&self) -> &'static str {
        match self {
            Invocation::Artifacts => "artifacts",
            Invocation::Result { .. } => "result",
            Invocation::StoreResult { .. } => "store_result",
        }
    }
}

#[derive(Default)]
struct ArtifactsCalls {
    stub: Option<ArtifactsStub>,
    count: usize,
    returns: Option<Arc<ArtifactRepository>>,
    returns_on_call: HashMap<usize, Arc<ArtifactRepository>>,
}

#[derive(Default)]
struct ResultCalls {
    stub: Option<ResultStub>,
    args: Vec<StepId>,
    returns: bool,
    returns_on_call: HashMap<usize, bool>,
}

#[derive(Default)]
struct StoreResultCalls {
    stub: Option<StoreResultStub>,
    args: Vec<(StepId, ResultValue)>,
}

/// Test double for [`RunState`] with call counts, canned returns and stubs
///
/// Precedence for a call's return value: stub, then the per-call return,
/// then the global return. Without any configuration `artifacts()` returns
/// one empty repository owned by the fake and `result()` returns `false`.
pub struct FakeRunState {
    artifacts: Mutex<ArtifactsCalls>,
    result: Mutex<ResultCalls>,
    store_result: Mutex<StoreResultCalls>,
    invocations: Mutex<HashMap<&'static str, Vec<Invocation>>>,
    default_artifacts: Arc<ArtifactRepository>,
}

impl FakeRunState {
    pub fn new() -> Self {
        Self {
            artifacts: Mutex::new(ArtifactsCalls::default()),
            result: Mutex::new(ResultCalls::default()),
            store_result: Mutex::new(StoreResultCalls::default()),
            invocations: Mutex::new(HashMap::new()),
            default_artifacts: Arc::new(ArtifactRepository::new()),
        }
    }

    pub fn artifacts_call_count(&self) -> usize {
        self.artifacts.lock().count
    }

    pub fn artifacts_calls<F>(&self, stub: F)
    where
        F: Fn() -> Arc<ArtifactRepository> + Send + Sync + 'static,
    {
        self.artifacts.lock().stub = Some(Arc::new(stub));
    }

    pub fn artifacts_returns(&self, repository: Arc<ArtifactRepository>) {
        let mut calls = self.artifacts.lock();
        calls.stub = None;
        calls.returns = Some(repository);
    }

    pub fn artifacts_returns_on_call(&self, call: usize, repository: Arc<ArtifactRepository>) {
        let mut calls = self.artifacts.lock();
        calls.stub = None;
        calls.returns_on_call.insert(call, repository);
    }

    pub fn result_call_count(&self) -> usize {
        self.result.lock().args.len()
    }

    pub fn result_calls<F>(&self, stub: F)
    where
        F: Fn(&StepId, &mut dyn ResultSlot) -> bool + Send + Sync + 'static,
    {
        self.result.lock().stub = Some(Arc::new(stub));
    }

    /// Step ID passed to the `call`-th `result` call (0-based)
    pub fn result_args_for_call(&self, call: usize) -> Option<StepId> {
        self.result.lock().args.get(call).cloned()
    }

    pub fn result_returns(&self, found: bool) {
        let mut calls = self.result.lock();
        calls.stub = None;
        calls.returns = found;
    }

    pub fn result_returns_on_call(&self, call: usize, found: bool) {
        let mut calls = self.result.lock();
        calls.stub = None;
        calls.returns_on_call.insert(call, found);
    }

    pub fn store_result_call_count(&self) -> usize {
        self.store_result.lock().args.len()
    }

    pub fn store_result_calls<F>(&self, stub: F)
    where
        F: Fn(StepId, ResultValue) + Send + Sync + 'static,
    {
        self.store_result.lock().stub = Some(Arc::new(stub));
    }

    pub fn store_result_args_for_call(&self, call: usize) -> Option<(StepId, ResultValue)> {
        self.store_result.lock().args.get(call).cloned()
    }

    /// Snapshot of every recorded call, keyed by method name
    pub fn invocations(&self) -> HashMap<&'static str, Vec<Invocation>> {
        self.invocations.lock().clone()
    }

    fn record_invocation(&self, invocation: Invocation) {
        self.invocations
            .lock()
            .entry(invocation.method())
            .or_default()
            .push(invocation);
    }
}

impl Default for FakeRunState {
    fn default() -> Self {
        Self::new()
    }
}

impl RunState for FakeRunState {
    fn artifacts(&self) -> Arc<ArtifactRepository> {
        let (stub, canned) = {
            let mut calls = self.artifacts.lock();
            let specific = calls.returns_on_call.get(&calls.count).cloned();
            calls.count += 1;
            (calls.stub.clone(), specific.or_else(|| calls.returns.clone()))
        };
        self.record_invocation(Invocation::Artifacts);

        if let Some(stub) = stub {
            return stub();
        }
        canned.unwrap_or_else(|| Arc::clone(&self.default_artifacts))
    }

    fn result(&self, step_id: &StepId, out: &mut dyn ResultSlot) -> bool {
        let (stub, canned) = {
            let mut calls = self.result.lock();
            let specific = calls.returns_on_call.get(&calls.args.len()).copied();
            calls.args.push(step_id.clone());
            (calls.stub.clone(), specific.unwrap_or(calls.returns))
        };
        self.record_invocation(Invocation::Result {
            step_id: step_id.clone(),
        });

        match stub {
            Some(stub) => stub(step_id, out),
            None => canned,
        }
    }

    fn store_result(&self, step_id: StepId, value: ResultValue) {
        let stub = {
            let mut calls = self.store_result.lock();
            calls.args.push((step_id.clone(), value.clone()));
            calls.stub.clone()
        };
        self.record_invocation(Invocation::StoreResult {
            step_id: step_id.clone(),
            value: value.clone(),
        });

        if let Some(stub) = stub {
            stub(step_id, value);
        }
    }
}
