#![forbid(unsafe_code)]

//! Synchronous change signals with RAII unsubscription.
//!
//! [`Signal`] is the publish/subscribe primitive behind both the per-instance
//! property-changed signal and each command's enablement-changed signal.
//!
//! # Invariants
//!
//! 1. Subscribers are notified in subscription order.
//! 2. Delivery is synchronous and never dropped or batched.
//! 3. Dropping a [`Subscription`] removes the callback before the next
//!    emission cycle.
//! 4. Emission never holds a borrow across a callback, so callbacks may
//!    re-enter the signal (subscribe, or trigger a nested emission).
//!
//! Callbacks are stored as `Weak` function pointers; the returned
//! [`Subscription`] guard owns the only strong reference. Dead entries are
//! cleaned up lazily during emission.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// A single-threaded signal carrying a borrowed payload `T`.
pub struct Signal<T: ?Sized + 'static> {
    subscribers: RefCell<Vec<Weak<dyn Fn(&T)>>>,
}

/// RAII guard for a signal subscription.
///
/// The callback stays registered for as long as the guard is alive and is
/// unregistered when the guard drops.
#[must_use = "dropping a Subscription immediately unsubscribes its callback"]
pub struct Subscription {
    _guard: Rc<dyn Any>,
}

impl<T: ?Sized + 'static> Signal<T> {
    pub fn new() -> Self {
        Self {
            subscribers: RefCell::new(Vec::new()),
        }
    }

    /// Register a callback, keeping it alive via the returned guard.
    pub fn subscribe<F: Fn(&T) + 'static>(&self, callback: F) -> Subscription {
        let strong = Rc::new(callback);
        let guard: Rc<dyn Any> = strong.clone();
        let erased: Rc<dyn Fn(&T)> = strong;
        self.subscribers.borrow_mut().push(Rc::downgrade(&erased));
        Subscription { _guard: guard }
    }

    /// Deliver `value` to every live subscriber, in subscription order.
    ///
    /// Dead entries (dropped guards) are pruned first. The subscriber list
    /// borrow is released before any callback runs.
    pub fn emit(&self, value: &T) {
        let live: Vec<Rc<dyn Fn(&T)>> = {
            let mut subscribers = self.subscribers.borrow_mut();
            subscribers.retain(|weak| weak.strong_count() > 0);
            subscribers.iter().filter_map(Weak::upgrade).collect()
        };

        for callback in live {
            callback(value);
        }
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .borrow()
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }
}

impl<T: ?Sized + 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized + 'static> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Subscription")
    }
}
