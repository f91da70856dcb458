//! Connection cache
//!
//! A map from cluster id to handle. Builds register a [`PendingBuild`]
//! before they start; invalidating an id bumps the generation of its
//! pending builds so their results are handed back to the caller but never
//! published. Generation state only exists while a build for the id is in
//! flight, so ids that come and go leave nothing behind.

use std::collections::HashMap;
use std::sync::Arc;

use kubemux_core::ClusterId;
use kubemux_kube::ClientHandle;
use parking_lot::RwLock;

#[derive(Debug, Default, Clone, Copy)]
struct BuildSlot {
    generation: u64,
    in_flight: usize,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<ClusterId, Arc<ClientHandle>>,
    builds: HashMap<ClusterId, BuildSlot>,
}

impl CacheState {
    /// Release one in-flight build, publishing `handle` if its generation
    /// is still current.
    fn finish(&mut self, id: ClusterId, generation: u64, handle: Option<Arc<ClientHandle>>) -> bool {
        let Some(slot) = self.builds.get_mut(&id) else {
            return false;
        };
        let current = slot.generation == generation;
        slot.in_flight = slot.in_flight.saturating_sub(1);
        if slot.in_flight == 0 {
            self.builds.remove(&id);
        }

        match handle {
            Some(handle) if current => {
                self.entries.insert(id, handle);
                true
            }
            _ => false,
        }
    }
}

/// Concurrency-safe handle cache. The lock is never held across `.await`.
#[derive(Default)]
pub struct ConnectionCache {
    state: RwLock<CacheState>,
}

impl ConnectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ClusterId) -> Option<Arc<ClientHandle>> {
        self.state.read().entries.get(&id).cloned()
    }

    /// Register a build for `id` starting now.
    pub fn begin(self: &Arc<Self>, id: ClusterId) -> PendingBuild {
        let mut state = self.state.write();
        let slot = state.builds.entry(id).or_default();
        slot.in_flight += 1;
        PendingBuild {
            cache: self.clone(),
            id,
            generation: slot.generation,
            finished: false,
        }
    }

    /// Drop the entry for `id`. Returns whether one was present.
    pub fn invalidate(&self, id: ClusterId) -> bool {
        let mut state = self.state.write();
        if let Some(slot) = state.builds.get_mut(&id) {
            slot.generation += 1;
        }
        state.entries.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: ClusterId) -> bool {
        self.state.read().entries.contains_key(&id)
    }

    /// Cached ids in ascending order.
    pub fn ids(&self) -> Vec<ClusterId> {
        let mut ids: Vec<_> = self.state.read().entries.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Ids with at least one build in flight.
    pub fn pending_ids(&self) -> Vec<ClusterId> {
        let mut ids: Vec<_> = self.state.read().builds.keys().copied().collect();
        ids.sort();
        ids
    }
}

/// An in-flight build. Publishing or dropping it releases its slot.
pub struct PendingBuild {
    cache: Arc<ConnectionCache>,
    id: ClusterId,
    generation: u64,
    finished: bool,
}

impl PendingBuild {
    /// Insert `handle` unless `id` was invalidated since the build began.
    ///
    /// Returns whether the handle was stored. A concurrent build that
    /// already stored a handle is overwritten.
    pub fn publish(mut self, handle: Arc<ClientHandle>) -> bool {
        self.finished = true;
        self.cache
            .state
            .write()
            .finish(self.id, self.generation, Some(handle))
    }
}

impl Drop for PendingBuild {
    fn drop(&mut self) {
        if !self.finished {
            self.cache.state.write().finish(self.id, self.generation, None);
        }
    }
}
