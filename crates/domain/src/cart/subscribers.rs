//! Change subscribers for the cart aggregate.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use super::CartSnapshot;

type Callback = Arc<dyn Fn(&CartSnapshot) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    callbacks: Vec<(u64, Callback)>,
}

/// Ordered list of callbacks invoked after every cart mutation.
#[derive(Default)]
pub struct SubscriberRegistry {
    inner: Arc<Mutex<Registry>>,
}

impl SubscriberRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a callback. It runs after callbacks registered before it.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&CartSnapshot) + Send + Sync + 'static,
    {
        let mut registry = self.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.callbacks.push((id, Arc::new(callback)));

        Subscription {
            id,
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Invokes every callback with the snapshot and returns how many ran.
    ///
    /// The registry is not locked while callbacks run, so a callback may
    /// subscribe or unsubscribe. Such changes take effect on the next
    /// notification.
    pub fn notify(&self, snapshot: &CartSnapshot) -> usize {
        let callbacks: Vec<Callback> = self
            .lock()
            .callbacks
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        for callback in &callbacks {
            callback(snapshot);
        }

        callbacks.len()
    }

    /// Drops every callback. Outstanding [`Subscription`]s become inert.
    pub fn clear(&self) {
        self.lock().callbacks.clear();
    }

    /// Number of registered callbacks.
    pub fn len(&self) -> usize {
        self.lock().callbacks.len()
    }

    /// Returns true if nothing is subscribed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for SubscriberRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriberRegistry")
            .field("subscribers", &self.len())
            .finish()
    }
}

/// Handle returned by [`SubscriberRegistry::subscribe`].
///
/// Dropping the handle does not unsubscribe; call [`unsubscribe`](Self::unsubscribe).
#[derive(Debug)]
#[must_use = "dropping a Subscription leaves the callback registered with no way to remove it"]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    /// Removes exactly the callback this handle was created for.
    ///
    /// Returns false if it was already gone (the cart was cleared or dropped).
    pub fn unsubscribe(self) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        let mut registry = registry.lock().unwrap_or_else(PoisonError::into_inner);
        let before = registry.callbacks.len();
        registry.callbacks.retain(|(id, _)| *id != self.id);
        registry.callbacks.len() != before
    }
}
