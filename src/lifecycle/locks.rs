// ABOUTME: Keyed async mutexes serializing work per plan or per owner
// ABOUTME: Entries are dropped once the last holder or waiter releases them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// One async mutex per key, created on demand
#[derive(Debug, Default)]
pub struct KeyedLocks {
    locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl KeyedLocks {
    /// Wait for exclusive access to `id`
    pub async fn lock(&self, id: Uuid) -> KeyedGuard<'_> {
        let mutex = self.locks.entry(id).or_default().value().clone();
        let guard = mutex.lock_owned().await;
        KeyedGuard {
            locks: self,
            id,
            guard: Some(guard),
        }
    }

    /// Keys currently held or waited on
    #[cfg(test)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Whether no key is held or waited on
    #[cfg(test)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Exclusive access to one key; releases and prunes on drop
pub struct KeyedGuard<'a> {
    locks: &'a KeyedLocks,
    id: Uuid,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyedGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Only the map's own reference left: nobody holds or waits for this key
        self.locks
            .locks
            .remove_if(&self.id, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}
