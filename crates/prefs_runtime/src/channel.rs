//! Per-property change-broadcast channels for plain-mode settings types.
//!
//! Every generated setter publishes the new value on its property's
//! [`Publisher`]. The generated `subscribe` step attaches a listener per
//! property that writes published values into the persistence store, and
//! collects the resulting [`Subscription`] handles in a [`SubscriptionBag`]
//! that the generated `Drop` impl drains.

use parking_lot::Mutex;
use std::sync::{Arc, Weak};

type Handler<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct SubscriberList<T> {
    next_id: u64,
    entries: Vec<(u64, Handler<T>)>,
}

/// Broadcast channel carrying every newly assigned value of one property.
///
/// # Example
///
/// ```
/// use prefs_runtime::channel::Publisher;
///
/// let publisher = Publisher::new();
/// let subscription = publisher.subscribe(|value: &i64| {
///     println!("changed to {value}");
/// });
///
/// publisher.publish(&42);
/// subscription.cancel();
/// publisher.publish(&7); // nobody listening
/// ```
pub struct Publisher<T> {
    subscribers: Arc<Mutex<SubscriberList<T>>>,
}

impl<T> Default for Publisher<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Publisher<T> {
    /// Creates a channel with no subscribers.
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(SubscriberList {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    /// Delivers `value` to every live subscriber, in subscription order.
    pub fn publish(&self, value: &T) {
        // Snapshot under the lock, invoke outside it: a handler may cancel
        // its own or another subscription.
        let handlers: Vec<Handler<T>> = self
            .subscribers
            .lock()
            .entries
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();
        for handler in handlers {
            handler(value);
        }
    }

    /// Attaches `handler` to the channel.
    ///
    /// The handler is invoked for every published value until the returned
    /// [`Subscription`] is cancelled or dropped.
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
        T: 'static,
    {
        let mut list = self.subscribers.lock();
        let id = list.next_id;
        list.next_id += 1;
        list.entries.push((id, Arc::new(handler)));

        let subscribers = Arc::downgrade(&self.subscribers);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(subscribers) = Weak::upgrade(&subscribers) {
                    subscribers
                        .lock()
                        .entries
                        .retain(|(entry_id, _)| *entry_id != id);
                }
            })),
        }
    }

    /// Returns the number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().entries.len()
    }
}

/// Cancelable handle for one channel subscription.
///
/// Dropping the handle cancels the subscription, so handles must be kept
/// alive — typically inside a [`SubscriptionBag`] — for as long as the
/// listener should run.
#[must_use = "dropping a Subscription cancels it"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Detaches the handler from its channel.
    pub fn cancel(mut self) {
        self.run_cancel();
    }

    fn run_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

/// Bag of subscription handles owned by one settings instance.
///
/// Populated during construction and drained during teardown; the drain loop
/// cancels every handle before the bag is cleared, so no notification fires
/// after teardown begins.
#[derive(Default)]
pub struct SubscriptionBag {
    subscriptions: Vec<Subscription>,
}

impl SubscriptionBag {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a subscription handle, keeping its listener alive.
    pub fn insert(&mut self, subscription: Subscription) {
        self.subscriptions.push(subscription);
    }

    /// Cancels every held subscription and clears the bag.
    pub fn cancel_all(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            subscription.cancel();
        }
    }

    /// Returns the number of held subscriptions.
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// Returns `true` if the bag holds no subscriptions.
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}
