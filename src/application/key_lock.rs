use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Async mutual exclusion scoped to a string key.
///
/// Callers locking different keys never wait on each other. A slot is dropped
/// from the table as soon as nobody holds or waits for it, including waiters
/// whose `lock` future was cancelled.
#[derive(Default)]
pub(crate) struct KeyedLock {
    slots: Mutex<HashMap<String, Slot>>,
}

struct Slot {
    mutex: Arc<AsyncMutex<()>>,
    /// Holders plus waiters.
    users: usize,
}

pub(crate) struct KeyGuard<'a> {
    owner: &'a KeyedLock,
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl KeyedLock {
    pub(crate) async fn lock(&self, key: &str) -> KeyGuard<'_> {
        let mutex = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            let slot = slots.entry(key.to_string()).or_insert_with(|| Slot {
                mutex: Arc::default(),
                users: 0,
            });
            slot.users += 1;
            Arc::clone(&slot.mutex)
        };
        // Registered before the await so a dropped waiter still releases its slot.
        let mut key_guard = KeyGuard {
            owner: self,
            key: key.to_string(),
            guard: None,
        };
        key_guard.guard = Some(mutex.lock_owned().await);
        key_guard
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Drop for KeyGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());

        let mut slots = self
            .owner
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(slot) = slots.get_mut(&self.key) {
            slot.users -= 1;
            if slot.users == 0 {
                slots.remove(&self.key);
            }
        }
    }
}
