//! Event subscriptions released on drop.
//!
//! [`Listeners`] is a list of handlers for one event type. Subscribing returns
//! a [`Subscription`]; the handler stays registered exactly as long as that
//! value lives. Whatever owns the subscriptions (the sort dropdown, for
//! example) tears them all down by being dropped.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tracing::trace;

type Handler<E> = Arc<dyn Fn(&E) + Send + Sync>;

struct Registry<E> {
    next_id: u64,
    handlers: BTreeMap<u64, Handler<E>>,
}

/// Handlers for events of type `E`. Clones share the same handler list.
pub struct Listeners<E> {
    inner: Arc<Mutex<Registry<E>>>,
}

impl<E> Clone for Listeners<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Registry {
                next_id: 0,
                handlers: BTreeMap::new(),
            })),
        }
    }
}

impl<E: 'static> Listeners<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, handler: impl Fn(&E) + Send + Sync + 'static) -> Subscription {
        let mut registry = lock(&self.inner);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.handlers.insert(id, Arc::new(handler));

        let weak: Weak<Mutex<Registry<E>>> = Arc::downgrade(&self.inner);
        Subscription {
            release: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    lock(&inner).handlers.remove(&id);
                    trace!(id, "listener removed");
                }
            })),
        }
    }

    /// Call every handler with `event`, in subscription order. Returns how
    /// many ran.
    ///
    /// Handlers are called without holding the lock, so a handler may drop
    /// its own subscription or subscribe new ones.
    pub fn emit(&self, event: &E) -> usize {
        let handlers: Vec<Handler<E>> = lock(&self.inner).handlers.values().cloned().collect();
        for handler in &handlers {
            handler(event);
        }
        handlers.len()
    }

    pub fn len(&self) -> usize {
        lock(&self.inner).handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lock<E>(inner: &Mutex<Registry<E>>) -> MutexGuard<'_, Registry<E>> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A registered handler. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Unsubscribe now rather than at drop.
    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}
