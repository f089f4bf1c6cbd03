use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::identity::digest::ArtifactId;

/// Per-identity mutual exclusion for single-flight generation.
///
/// Entries are created on first use and dropped once the last holder releases them.
#[derive(Debug, Default)]
pub struct IdentityLocks {
    slots: Mutex<HashMap<ArtifactId, Arc<Mutex<()>>>>,
}

impl IdentityLocks {
    /// Empty lock map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the lock for `id`.
    pub fn with_lock<T>(&self, id: &ArtifactId, f: impl FnOnce() -> T) -> T {
        let slot = {
            let mut slots = self.lock_map();
            Arc::clone(slots.entry(id.clone()).or_default())
        };

        let out = {
            let _held = slot.lock().unwrap_or_else(|e| e.into_inner());
            f()
        };

        let mut slots = self.lock_map();
        drop(slot);
        // only the map's reference is left: no holder or waiter remains
        if slots.get(id).is_some_and(|s| Arc::strong_count(s) == 1) {
            slots.remove(id);
        }
        out
    }

    /// Number of identities currently tracked.
    pub fn len(&self) -> usize {
        self.lock_map().len()
    }

    /// Whether no identity is tracked.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock_map(&self) -> MutexGuard<'_, HashMap<ArtifactId, Arc<Mutex<()>>>> {
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/orchestrator/locks.rs"]
mod tests;
