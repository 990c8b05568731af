//! Keyed async locks, one per match.
//!
//! Whoever holds a match's guard owns the whole check, mutate and persist
//! sequence for it. Versioned saves still catch writers in other processes.

use std::sync::Arc;

use dashmap::DashMap;
use duelbot_domain::MatchId;
use tokio::sync::{Mutex, OwnedMutexGuard};

pub struct MatchLocks {
    locks: DashMap<MatchId, Arc<Mutex<()>>>,
}

impl MatchLocks {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Wait for exclusive access to `id`.
    pub async fn acquire(&self, id: MatchId) -> OwnedMutexGuard<()> {
        // Clone the Arc out so the map shard is unlocked before awaiting.
        let lock = self
            .locks
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    /// Drop the entry for a finished match once nobody holds or awaits it.
    pub fn forget(&self, id: MatchId) {
        self.locks
            .remove_if(&id, |_, lock| Arc::strong_count(lock) == 1);
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

impl Default for MatchLocks {
    fn default() -> Self {
        Self::new()
    }
}
