//! Listener registry for state notifications.
//!
//! Listeners are plain synchronous callbacks. A notification round works on
//! a snapshot of the registered entries and holds no lock while callbacks
//! run, so a callback may subscribe, unsubscribe, or read the store.

use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use crate::state::PlaybackState;

/// Callback invoked with every published snapshot.
pub type Listener = Box<dyn Fn(&PlaybackState) + Send + Sync>;

struct Entry {
    id: u64,
    active: AtomicBool,
    callback: Listener,
}

#[derive(Default)]
pub(crate) struct ListenerRegistry {
    entries: Mutex<Vec<Arc<Entry>>>,
    next_id: AtomicU64,
}

impl ListenerRegistry {
    pub(crate) fn subscribe(self: &Arc<Self>, callback: Listener) -> Subscription {
        let entry = Arc::new(Entry {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            active: AtomicBool::new(true),
            callback,
        });
        let subscription = Subscription {
            id: entry.id,
            entry: Arc::downgrade(&entry),
            registry: Arc::downgrade(self),
        };
        self.entries.lock().push(entry);
        subscription
    }

    pub(crate) fn notify(&self, state: &PlaybackState) {
        let round: Vec<Arc<Entry>> = self.entries.lock().clone();
        for entry in round {
            // Re-checked per entry: an earlier callback may have unsubscribed it.
            if entry.active.load(Ordering::Acquire) {
                (entry.callback)(state);
            }
        }
    }

    pub(crate) fn clear(&self) {
        let removed = std::mem::take(&mut *self.entries.lock());
        for entry in removed {
            entry.active.store(false, Ordering::Release);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.lock().len()
    }

    fn remove(&self, id: u64) {
        self.entries.lock().retain(|entry| entry.id != id);
    }
}

/// Handle returned by [`PlaybackStateStore::subscribe`](crate::PlaybackStateStore::subscribe).
///
/// Dropping the handle keeps the listener registered; call
/// [`unsubscribe`](Self::unsubscribe) to remove it.
#[derive(Clone)]
pub struct Subscription {
    id: u64,
    entry: Weak<Entry>,
    registry: Weak<ListenerRegistry>,
}

impl Subscription {
    /// Stop delivering notifications to this listener.
    ///
    /// Safe to call from inside a listener callback; the listener is skipped
    /// for the rest of the current round. Calling it again is a no-op.
    pub fn unsubscribe(&self) {
        if let Some(entry) = self.entry.upgrade() {
            entry.active.store(false, Ordering::Release);
        }
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }

    pub fn is_active(&self) -> bool {
        self.entry
            .upgrade()
            .map(|entry| entry.active.load(Ordering::Acquire))
            .unwrap_or(false)
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
