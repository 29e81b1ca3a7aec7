//! Result store - typed step results cached for the rest of a run

use crate::core::{config::RunStateConfig, step::StepId};
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Type-erased step result carrying its runtime type tag
#[derive(Clone)]
pub struct ResultValue {
    value: Arc<dyn Any + Send + Sync>,
    type_id: TypeId,
    type_name: &'static str,
}

impl ResultValue {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            value: Arc::new(value),
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Whether the stored value is a `T`
    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Clone the stored value out if it is a `T`
    pub fn get<T: Any + Clone>(&self) -> Option<T> {
        self.downcast_ref::<T>().cloned()
    }

    /// Name of the stored type, for diagnostics only
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for ResultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultValue")
            .field("type", &self.type_name)
            .finish()
    }
}

/// Caller-supplied output location for a result lookup
///
/// Implemented for every cloneable `'static` type, so a typed local can be
/// passed directly: `let mut ok = false; state.result(&id, &mut ok)`.
pub trait ResultSlot {
    /// Copy `value` into the slot if the types match; untouched otherwise
    fn fill(&mut self, value: &ResultValue) -> bool;

    /// Name of the slot's type, for diagnostics only
    fn slot_type_name(&self) -> &'static str;
}

impl<T: Any + Clone> ResultSlot for T {
    fn fill(&mut self, value: &ResultValue) -> bool {
        match value.downcast_ref::<T>() {
            Some(v) => {
                *self = v.clone();
                true
            }
            None => false,
        }
    }

    fn slot_type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

#[derive(Debug, Clone)]
struct StoredResult {
    value: ResultValue,
    writes: usize,
}

/// Mapping from step ID to that step's result
pub struct ResultStore {
    results: RwLock<HashMap<StepId, StoredResult>>,
    warn_on_overwrite: bool,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::with_config(&RunStateConfig::default())
    }

    pub fn with_config(config: &RunStateConfig) -> Self {
        Self {
            results: RwLock::new(HashMap::with_capacity(config.result_capacity)),
            warn_on_overwrite: config.warn_on_overwrite,
        }
    }

    /// Record the result for `step_id`, replacing any earlier value
    pub fn store_result(&self, step_id: StepId, value: ResultValue) {
        debug!("Storing result for step {} ({})", step_id, value.type_name());

        let writes = {
            let mut results = self.results.write();
            let writes = results.get(&step_id).map_or(0, |r| r.writes) + 1;
            results.insert(step_id.clone(), StoredResult { value, writes });
            writes
        };

        if writes > 1 && self.warn_on_overwrite {
            warn!(
                "Result for step {} written {} times; earlier value replaced",
                step_id, writes
            );
        }
    }

    /// Copy the result for `step_id` into `out`
    ///
    /// Returns `false` and leaves `out` untouched if nothing was stored or the
    /// stored type differs from the slot's type.
    pub fn result(&self, step_id: &StepId, out: &mut dyn ResultSlot) -> bool {
        let stored = self.results.read().get(step_id).map(|r| r.value.clone());

        match stored {
            Some(value) => {
                let found = out.fill(&value);
                if !found {
                    debug!(
                        "Result for step {} is {}, requested {}",
                        step_id,
                        value.type_name(),
                        out.slot_type_name()
                    );
                }
                found
            }
            None => {
                trace!("No result stored for step {}", step_id);
                false
            }
        }
    }

    /// Typed convenience lookup
    pub fn get<T: Any + Clone>(&self, step_id: &StepId) -> Option<T> {
        self.results
            .read()
            .get(step_id)
            .and_then(|r| r.value.get::<T>())
    }

    pub fn contains(&self, step_id: &StepId) -> bool {
        self.results.read().contains_key(step_id)
    }

    /// Sorted snapshot of the step IDs with a stored result
    pub fn step_ids(&self) -> Vec<StepId> {
        let mut ids: Vec<StepId> = self.results.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Step IDs whose result was written more than once
    pub fn overwritten(&self) -> Vec<StepId> {
        let mut ids: Vec<StepId> = self
            .results
            .read()
            .iter()
            .filter(|(_, r)| r.writes > 1)
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.results.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.read().is_empty()
    }
}

impl Default for ResultStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ResultStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultStore")
            .field("step_ids", &self.step_ids())
            .finish()
    }
}
