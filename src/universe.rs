use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use itertools::Itertools;

pub type HandleId = u64;

/// Registry of every live library resource. Used by tests as a leak detector:
/// once all accesses, projects and uploads are released it reports empty.
#[derive(Debug, Default)]
pub struct Universe {
    next: AtomicU64,
    live: dashmap::DashMap<HandleId, &'static str>,
}

impl Universe {
    pub fn new() -> Arc<Universe> {
        Default::default()
    }

    /// register a resource of `kind`, it stays live until the returned handle is dropped
    pub fn add(self: &Arc<Self>, kind: &'static str) -> Handle {
        let id = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        self.live.insert(id, kind);
        tracing::trace!(id, kind, "universe add");
        Handle {
            id,
            universe: Arc::clone(self),
        }
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// kinds of the resources still alive, sorted
    pub fn kinds(&self) -> Vec<&'static str> {
        self.live.iter().map(|entry| *entry.value()).sorted().collect()
    }

    fn del(&self, id: HandleId) {
        if let Some((_, kind)) = self.live.remove(&id) {
            tracing::trace!(id, kind, "universe del");
        }
    }
}

#[derive(Debug)]
pub struct Handle {
    id: HandleId,
    universe: Arc<Universe>,
}

impl Handle {
    pub fn id(&self) -> HandleId {
        self.id
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        self.universe.del(self.id);
    }
}
