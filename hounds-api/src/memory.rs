//! In-memory match store.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use hounds_core::{Match, MatchId};
use parking_lot::Mutex;

use crate::store::StoreError;

/// Matches keyed by id, each behind its own lock so unrelated matches never
/// contend.
#[derive(Default)]
pub struct MemoryStore {
    matches: DashMap<MatchId, Arc<Mutex<Match>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, m: &Match) -> Result<(), StoreError> {
        match self.matches.entry(m.id()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate(m.id())),
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(Mutex::new(m.clone())));
                Ok(())
            }
        }
    }

    pub fn load(&self, id: MatchId) -> Result<Match, StoreError> {
        let entry = self.entry(id)?;
        let m = entry.lock().clone();
        Ok(m)
    }

    pub fn update<T, E>(&self, id: MatchId, f: impl FnOnce(&mut Match) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let entry = self.entry(id)?;
        let mut guard = entry.lock();
        let mut next = guard.clone();
        let out = f(&mut next)?;
        *guard = next;
        Ok(out)
    }

    /// Clone the match handle out so the map shard is not held while locked.
    fn entry(&self, id: MatchId) -> Result<Arc<Mutex<Match>>, StoreError> {
        self.matches
            .get(&id)
            .map(|e| Arc::clone(e.value()))
            .ok_or(StoreError::NotFound(id))
    }
}
