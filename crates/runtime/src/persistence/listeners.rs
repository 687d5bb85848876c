//! Manager-local synchronous listener list.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::events::DomainEvent;

type Listener = Arc<dyn Fn(&DomainEvent) + Send + Sync>;

/// Identifies a registered listener so it can be removed later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Ordered list of synchronous callbacks.
///
/// Notification iterates a copy of the list, so listeners may register or
/// remove listeners from inside a callback. A panicking listener is logged
/// and skipped; the rest still run.
#[derive(Default)]
pub(crate) struct LocalListeners {
    next_id: AtomicU64,
    listeners: RwLock<Vec<(ListenerId, Listener)>>,
}

impl LocalListeners {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&DomainEvent) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.write().push((id, Arc::new(listener)));
        id
    }

    pub(crate) fn remove(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    /// Calls every listener, in registration order, on the current thread.
    pub(crate) fn notify(&self, event: &DomainEvent) {
        let snapshot: Vec<Listener> = self
            .listeners
            .read()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in snapshot {
            if catch_unwind(AssertUnwindSafe(|| listener(event))).is_err() {
                tracing::error!(
                    event_type = event.event_type(),
                    "state manager listener panicked"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use parking_lot::Mutex;

    #[test]
    fn test_notify_in_order_and_remove() {
        let listeners = LocalListeners::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let first = {
            let seen = Arc::clone(&seen);
            listeners.add(move |_| seen.lock().push("first"))
        };
        {
            let seen = Arc::clone(&seen);
            listeners.add(move |_| seen.lock().push("second"));
        }

        let event = DomainEvent::new(EventKind::StateManagerUpdated, "test");
        listeners.notify(&event);
        assert!(listeners.remove(first));
        assert!(!listeners.remove(first));
        listeners.notify(&event);

        assert_eq!(*seen.lock(), vec!["first", "second", "second"]);
    }

    #[test]
    fn test_panicking_listener_does_not_stop_others() {
        let listeners = LocalListeners::new();
        let calls = Arc::new(Mutex::new(0));

        listeners.add(|_| panic!("listener bug"));
        let counter = Arc::clone(&calls);
        listeners.add(move |_| *counter.lock() += 1);

        listeners.notify(&DomainEvent::new(EventKind::SaveCreated, "test"));
        assert_eq!(*calls.lock(), 1);
    }
}
