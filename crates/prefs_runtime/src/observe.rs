//! Observation registrar for observed-mode settings types.
//!
//! Generated accessors report reads and bracket mutations through an
//! [`ObservationRegistrar`] held by the owning instance:
//!
//! - getters call [`ObservationRegistrar::access`] before returning the
//!   shadow field, so external observers can track which property was read;
//! - setters run inside [`ObservationRegistrar::with_mutation`], which
//!   guarantees exactly one `WillSet`/`DidSet` pair per mutation;
//! - in-place mutation hands out a [`MutationGuard`] whose drop hook fires
//!   `DidSet` (and persists the value) on every exit path.
//!
//! Observer callbacks are invoked outside the registrar's lock, so an
//! observer may re-enter the registrar — for example by reading the property
//! being mutated — without deadlocking.

use crate::store::{self, Store};
use parking_lot::Mutex;
use serde::Serialize;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// The kind of property event delivered to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObservationEvent {
    /// A property was read.
    Access,
    /// A mutation window is about to open.
    WillSet,
    /// A mutation window closed.
    DidSet,
}

/// Handle identifying a registered observer, used for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type ObserverFn = Arc<dyn Fn(&str, ObservationEvent) + Send + Sync>;

struct ObserverList {
    next_id: u64,
    entries: Vec<(u64, ObserverFn)>,
}

/// Tracks reads and mutations of an observed settings instance.
///
/// One registrar is generated per instance; every property accessor of the
/// instance routes through it.
///
/// # Example
///
/// ```
/// use prefs_runtime::observe::{ObservationEvent, ObservationRegistrar};
///
/// let registrar = ObservationRegistrar::new();
/// let id = registrar.observe(|key, event| {
///     println!("{key}: {event:?}");
/// });
///
/// registrar.with_mutation("volume", || {
///     // mutate the shadow field, write to the store
/// });
///
/// registrar.remove(id);
/// ```
pub struct ObservationRegistrar {
    observers: Mutex<ObserverList>,
}

impl Default for ObservationRegistrar {
    fn default() -> Self {
        Self::new()
    }
}

impl ObservationRegistrar {
    /// Creates a registrar with no observers.
    pub fn new() -> Self {
        Self {
            observers: Mutex::new(ObserverList {
                next_id: 0,
                entries: Vec::new(),
            }),
        }
    }

    /// Registers an observer receiving `(key, event)` pairs.
    pub fn observe<F>(&self, observer: F) -> ObserverId
    where
        F: Fn(&str, ObservationEvent) + Send + Sync + 'static,
    {
        let mut list = self.observers.lock();
        let id = list.next_id;
        list.next_id += 1;
        list.entries.push((id, Arc::new(observer)));
        ObserverId(id)
    }

    /// Removes a previously registered observer.
    ///
    /// Returns `false` if the observer was already removed.
    pub fn remove(&self, id: ObserverId) -> bool {
        let mut list = self.observers.lock();
        let before = list.entries.len();
        list.entries.retain(|(entry_id, _)| *entry_id != id.0);
        list.entries.len() != before
    }

    /// Records a read of the property stored under `key`.
    pub fn access(&self, key: &str) {
        self.notify(key, ObservationEvent::Access);
    }

    /// Opens a mutation window for `key`.
    pub fn will_set(&self, key: &str) {
        self.notify(key, ObservationEvent::WillSet);
    }

    /// Closes a mutation window for `key`.
    pub fn did_set(&self, key: &str) {
        self.notify(key, ObservationEvent::DidSet);
    }

    /// Runs `mutation` inside a `WillSet`/`DidSet` pair for `key`.
    ///
    /// `DidSet` fires on every exit path, including unwinding out of the
    /// mutation closure.
    pub fn with_mutation<R>(&self, key: &str, mutation: impl FnOnce() -> R) -> R {
        self.will_set(key);
        let _close = DidSetOnDrop {
            registrar: self,
            key,
        };
        mutation()
    }

    fn notify(&self, key: &str, event: ObservationEvent) {
        // Snapshot under the lock, invoke outside it: observers may re-enter.
        let observers: Vec<ObserverFn> = self
            .observers
            .lock()
            .entries
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();
        for observer in observers {
            observer(key, event);
        }
    }
}

/// Fires `DidSet` when dropped, closing the mutation window unconditionally.
struct DidSetOnDrop<'a> {
    registrar: &'a ObservationRegistrar,
    key: &'a str,
}

impl Drop for DidSetOnDrop<'_> {
    fn drop(&mut self) {
        self.registrar.did_set(self.key);
    }
}

/// Scoped handle for mutating a property in place.
///
/// Fires `WillSet` on construction and, on drop, persists the value (when a
/// store was attached) and fires `DidSet` — observers see exactly one
/// notification pair per in-place mutation, on every exit path.
#[must_use = "dropping the guard immediately closes the mutation window"]
pub struct MutationGuard<'a, T: Serialize> {
    value: &'a mut T,
    registrar: &'a ObservationRegistrar,
    key: &'a str,
    store: Option<&'a dyn Store>,
}

impl<'a, T: Serialize> MutationGuard<'a, T> {
    /// Opens a mutation window around `value` without persistence.
    pub fn new(value: &'a mut T, registrar: &'a ObservationRegistrar, key: &'a str) -> Self {
        registrar.will_set(key);
        Self {
            value,
            registrar,
            key,
            store: None,
        }
    }

    /// Opens a mutation window around `value`, persisting it to `store`
    /// when the window closes.
    pub fn with_store(
        value: &'a mut T,
        registrar: &'a ObservationRegistrar,
        key: &'a str,
        store: &'a dyn Store,
    ) -> Self {
        registrar.will_set(key);
        Self {
            value,
            registrar,
            key,
            store: Some(store),
        }
    }
}

impl<T: Serialize> Deref for MutationGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.value
    }
}

impl<T: Serialize> DerefMut for MutationGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.value
    }
}

impl<T: Serialize> Drop for MutationGuard<'_, T> {
    fn drop(&mut self) {
        if let Some(store) = self.store {
            store::persist(store, self.key, &*self.value);
        }
        self.registrar.did_set(self.key);
    }
}
