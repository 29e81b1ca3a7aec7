//! Artifact repository - named artifacts produced by steps during one run

use crate::core::config::RunStateConfig;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Data produced by a step, owned by an external artifact backend
///
/// The repository never inspects an artifact; `id` is only used in logs.
pub trait Artifact: fmt::Debug + Send + Sync + 'static {
    /// Backend identifier (volume handle, blob key, ...)
    fn id(&self) -> &str;
}

/// Opaque, cheaply cloneable reference to an [`Artifact`]
///
/// Two handles are equal when they point at the same artifact object,
/// not when their contents happen to match.
#[derive(Clone)]
pub struct ArtifactHandle(Arc<dyn Artifact>);

impl ArtifactHandle {
    pub fn new(artifact: impl Artifact) -> Self {
        Self(Arc::new(artifact))
    }

    /// Backend identifier of the wrapped artifact
    pub fn id(&self) -> &str {
        self.0.id()
    }

    /// Borrow the wrapped artifact
    pub fn artifact(&self) -> &dyn Artifact {
        self.0.as_ref()
    }

    fn addr(&self) -> *const () {
        Arc::as_ptr(&self.0) as *const ()
    }
}

impl From<Arc<dyn Artifact>> for ArtifactHandle {
    fn from(artifact: Arc<dyn Artifact>) -> Self {
        Self(artifact)
    }
}

impl PartialEq for ArtifactHandle {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl Eq for ArtifactHandle {}

impl fmt::Debug for ArtifactHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ArtifactHandle").field(&self.0).finish()
    }
}

/// Mapping from artifact name to handle, scoped to one run
///
/// A repository created with [`new_local_scope`](Self::new_local_scope)
/// registers artifacts locally but falls back to its parent on lookup.
pub struct ArtifactRepository {
    artifacts: RwLock<HashMap<String, ArtifactHandle>>,
    parent: Option<Arc<ArtifactRepository>>,
    warn_on_overwrite: bool,
}

impl ArtifactRepository {
    /// Create an empty top-level repository
    pub fn new() -> Self {
        Self::with_config(&RunStateConfig::default())
    }

    pub fn with_config(config: &RunStateConfig) -> Self {
        Self {
            artifacts: RwLock::new(HashMap::with_capacity(config.artifact_capacity)),
            parent: None,
            warn_on_overwrite: config.warn_on_overwrite,
        }
    }

    /// Store a handle under `name`, replacing any previous handle
    pub fn register(&self, name: impl Into<String>, handle: ArtifactHandle) {
        let name = name.into();
        debug!("Registering artifact '{}' ({})", name, handle.id());

        let previous = self.artifacts.write().insert(name.clone(), handle);

        if let Some(previous) = previous {
            if self.warn_on_overwrite {
                warn!(
                    "Artifact '{}' re-registered, replacing {}",
                    name,
                    previous.id()
                );
            }
        }
    }

    /// Find the handle registered under `name`, searching enclosing scopes
    pub fn lookup(&self, name: &str) -> Option<ArtifactHandle> {
        let local = self.artifacts.read().get(name).cloned();
        match local {
            Some(handle) => Some(handle),
            None => match &self.parent {
                Some(parent) => parent.lookup(name),
                None => {
                    trace!("Artifact '{}' not found", name);
                    None
                }
            },
        }
    }

    /// Whether `name` resolves in this scope or any parent
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Sorted snapshot of the names registered in this scope
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.artifacts.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of artifacts registered in this scope
    pub fn len(&self) -> usize {
        self.artifacts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.read().is_empty()
    }

    /// Snapshot of every visible artifact; local entries shadow the parent's
    pub fn as_map(&self) -> BTreeMap<String, ArtifactHandle> {
        let mut map = match &self.parent {
            Some(parent) => parent.as_map(),
            None => BTreeMap::new(),
        };

        let local = self.artifacts.read();
        for (name, handle) in local.iter() {
            map.insert(name.clone(), handle.clone());
        }

        map
    }

    /// Create a child scope layered over this repository
    pub fn new_local_scope(self: &Arc<Self>) -> Arc<ArtifactRepository> {
        Arc::new(ArtifactRepository {
            artifacts: RwLock::new(HashMap::new()),
            parent: Some(Arc::clone(self)),
            warn_on_overwrite: self.warn_on_overwrite,
        })
    }

    /// The enclosing scope, if this is a local scope
    pub fn parent(&self) -> Option<&Arc<ArtifactRepository>> {
        self.parent.as_ref()
    }
}

impl Default for ArtifactRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ArtifactRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtifactRepository")
            .field("names", &self.names())
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}
