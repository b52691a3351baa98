//! Per-berth write serialization
//!
//! A conflict check followed by a write is only sound if no other writer
//! touches the same berth in between. Every reservation write holds the
//! lock of each berth it reads or writes until the write has landed.
//! Locks are process-local. An entry lives only while someone holds or
//! waits on it, so the map stays as small as the set of busy berths.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::BerthNumber;

type LockMap = DashMap<BerthNumber, Arc<Mutex<()>>>;

/// Registry of one async mutex per berth, created on first use.
#[derive(Default)]
pub struct BerthLocks {
    locks: Arc<LockMap>,
}

/// Held locks; released on drop.
pub struct BerthGuard {
    map: Arc<LockMap>,
    guards: Vec<(BerthNumber, OwnedMutexGuard<()>)>,
}

impl Drop for BerthGuard {
    fn drop(&mut self) {
        for (berth, guard) in std::mem::take(&mut self.guards) {
            drop(guard);
            // Only the map's own handle left: no holder, no waiter.
            self.map
                .remove_if(&berth, |_, mutex| Arc::strong_count(mutex) == 1);
        }
    }
}

impl BerthLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn mutex_for(&self, berth: BerthNumber) -> Arc<Mutex<()>> {
        // Clone out of the map so no shard lock is held across an await.
        self.locks
            .entry(berth)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone()
    }

    pub async fn lock(&self, berth: BerthNumber) -> BerthGuard {
        let guard = self.mutex_for(berth).lock_owned().await;
        BerthGuard {
            map: self.locks.clone(),
            guards: vec![(berth, guard)],
        }
    }

    /// Lock two berths in ascending order; one lock when they are equal.
    pub async fn lock_pair(&self, a: BerthNumber, b: BerthNumber) -> BerthGuard {
        if a == b {
            return self.lock(a).await;
        }
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        let first = self.mutex_for(low).lock_owned().await;
        let second = self.mutex_for(high).lock_owned().await;
        BerthGuard {
            map: self.locks.clone(),
            guards: vec![(low, first), (high, second)],
        }
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
