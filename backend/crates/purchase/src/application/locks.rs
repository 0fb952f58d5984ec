//! Per-order async locks
//!
//! Serializes Close within this process so one order never has two
//! settlement transactions in flight. Entries are dropped when the last
//! holder or waiter goes away.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use kernel::id::PurchaseOrderId;
use tokio::sync::OwnedMutexGuard;

#[derive(Default)]
pub struct OrderLocks {
    inner: Mutex<HashMap<PurchaseOrderId, Arc<tokio::sync::Mutex<()>>>>,
}

impl OrderLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `order_id`
    pub async fn acquire(&self, order_id: PurchaseOrderId) -> OrderLockGuard<'_> {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            // Entries nobody holds or waits on
            map.retain(|_, lock| Arc::strong_count(lock) > 1);
            map.entry(order_id).or_default().clone()
        };

        // Built before waiting so a cancelled waiter still prunes its entry
        let mut entry = OrderLockGuard {
            locks: self,
            order_id,
            guard: None,
        };
        entry.guard = Some(lock.lock_owned().await);
        entry
    }

    /// Orders with a live lock entry
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Releases the order lock on drop
pub struct OrderLockGuard<'a> {
    locks: &'a OrderLocks,
    order_id: PurchaseOrderId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for OrderLockGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());

        let mut map = self.locks.inner.lock().unwrap_or_else(PoisonError::into_inner);
        // Only the map holds it: nobody is waiting
        if map
            .get(&self.order_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            map.remove(&self.order_id);
        }
    }
}
