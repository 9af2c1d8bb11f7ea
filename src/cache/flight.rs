//! Per-key single-flight guard
//!
//! Serializes regeneration of the same cache key within one process so
//! concurrent resolvers wait for a single producer run instead of racing to
//! write the same artifact.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Registry of in-flight keys
#[derive(Debug, Default)]
pub struct FlightRegistry {
    slots: Mutex<HashMap<String, Slot>>,
}

/// Lock for one key plus the number of tasks holding or waiting on it
#[derive(Debug, Default)]
struct Slot {
    lock: Arc<AsyncMutex<()>>,
    users: usize,
}

/// Held while the producer for a key runs; releasing it wakes the next waiter
#[derive(Debug)]
pub struct FlightGuard<'a> {
    // Dropped before the lease so the slot outlives the held lock.
    _guard: OwnedMutexGuard<()>,
    _lease: Lease<'a>,
}

/// One registered user of a slot. Dropping it, whether after holding the
/// lock or while still waiting, removes the slot once nobody uses it.
#[derive(Debug)]
struct Lease<'a> {
    registry: &'a FlightRegistry,
    key: String,
}

impl FlightRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other task holds `key`, then hold it
    pub async fn acquire(&self, key: &str) -> FlightGuard<'_> {
        let (lease, lock) = {
            let mut slots = self.slots();
            let slot = slots.entry(key.to_string()).or_default();
            slot.users += 1;
            let lease = Lease {
                registry: self,
                key: key.to_string(),
            };
            (lease, Arc::clone(&slot.lock))
        };

        let guard = lock.lock_owned().await;

        FlightGuard {
            _guard: guard,
            _lease: lease,
        }
    }

    /// Number of keys currently held or waited on
    pub fn in_flight(&self) -> usize {
        self.slots().len()
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Lease<'_> {
    fn drop(&mut self) {
        let mut slots = self.registry.slots();
        if let Some(slot) = slots.get_mut(&self.key) {
            slot.users -= 1;
            if slot.users == 0 {
                slots.remove(&self.key);
            }
        }
    }
}
