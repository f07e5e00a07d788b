//! Per-message serialization
//!
//! Two deliveries of the same event may race. Deleting a message and posting
//! the notice must happen at most once per message id at a time, so both run
//! under a lock keyed by the id. Entries are dropped once no task holds or
//! waits for them.

use std::collections::HashMap;
use std::sync::Arc;

use domain::MessageId;
use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Map of per-message async mutexes
#[derive(Debug, Default)]
pub struct MessageLocks {
    entries: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl MessageLocks {
    /// Create an empty lock map
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `message_id`
    pub async fn lock(&self, message_id: &MessageId) -> MessageLockGuard<'_> {
        let key = message_id.as_str().to_string();
        let mutex = {
            let mut entries = self.entries.lock();
            Arc::clone(entries.entry(key.clone()).or_default())
        };

        let guard = mutex.lock_owned().await;
        MessageLockGuard {
            locks: self,
            key,
            _guard: guard,
        }
    }

    /// Number of message ids currently locked or awaited
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether no message id is locked or awaited
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

/// Exclusive access to one message id, released on drop
#[derive(Debug)]
pub struct MessageLockGuard<'a> {
    locks: &'a MessageLocks,
    key: String,
    _guard: OwnedMutexGuard<()>,
}

impl Drop for MessageLockGuard<'_> {
    fn drop(&mut self) {
        let mut entries = self.locks.entries.lock();
        // The map and this guard hold one reference each; more means waiters.
        let unused = entries
            .get(&self.key)
            .is_some_and(|mutex| Arc::strong_count(mutex) <= 2);
        if unused {
            entries.remove(&self.key);
        }
    }
}
