//! Ordered observer lists with unsubscribe support

use std::{
    panic::{self, AssertUnwindSafe},
    sync::{Arc, Mutex},
};
use tracing::warn;

use crate::utils::lock_or_recover;

/// Callback invoked with every published value
pub type Observer<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Handle returned by `subscribe`, used to unsubscribe later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Registry<T> {
    next_id: u64,
    observers: Vec<(SubscriptionId, Observer<T>)>,
}

/// Registered observers, notified synchronously in registration order
pub struct ObserverRegistry<T> {
    inner: Mutex<Registry<T>>,
}

impl<T> ObserverRegistry<T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Registry {
                next_id: 0,
                observers: Vec::new(),
            }),
        }
    }

    /// Register an observer without notifying it
    pub fn subscribe<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.register(Arc::new(observer)).0
    }

    /// Register an observer and hand it `current` straight away
    pub fn subscribe_with<F>(&self, observer: F, current: &T) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let (id, observer) = self.register(Arc::new(observer));
        invoke(&observer, current);
        id
    }

    /// Remove an observer. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut registry = lock_or_recover(&self.inner);
        let before = registry.observers.len();
        registry.observers.retain(|(existing, _)| *existing != id);
        registry.observers.len() != before
    }

    /// Call every observer with `value`. A panicking observer is logged and
    /// skipped; the rest still run.
    pub fn notify(&self, value: &T) {
        // Observers may subscribe or unsubscribe from inside the callback
        let observers: Vec<Observer<T>> = lock_or_recover(&self.inner)
            .observers
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();

        for observer in &observers {
            invoke(observer, value);
        }
    }

    /// Call a single observer with `value`. Returns false if it is no longer registered.
    pub fn notify_one(&self, id: SubscriptionId, value: &T) -> bool {
        let observer = lock_or_recover(&self.inner)
            .observers
            .iter()
            .find(|(existing, _)| *existing == id)
            .map(|(_, observer)| Arc::clone(observer));

        match observer {
            Some(observer) => {
                invoke(&observer, value);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        lock_or_recover(&self.inner).observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn register(&self, observer: Observer<T>) -> (SubscriptionId, Observer<T>) {
        let mut registry = lock_or_recover(&self.inner);
        let id = SubscriptionId(registry.next_id);
        registry.next_id += 1;
        registry.observers.push((id, Arc::clone(&observer)));
        (id, observer)
    }
}

impl<T> Default for ObserverRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn invoke<T>(observer: &Observer<T>, value: &T) {
    if panic::catch_unwind(AssertUnwindSafe(|| observer(value))).is_err() {
        warn!("Observer panicked while handling a notification");
    }
}
