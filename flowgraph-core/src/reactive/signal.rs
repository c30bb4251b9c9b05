//! Signal Implementation
//!
//! A Signal is the fundamental reactive primitive: a container for mutable
//! state that knows who reads it.
//!
//! # How Signals Work
//!
//! 1. When a signal is read inside a tracking scope (a recomputing memo),
//!    the runtime records the reader as a subscriber.
//!
//! 2. When the signal's value changes, the runtime invalidates every
//!    subscriber, so the next read of a dependent memo recomputes.
//!
//! # Thread Safety
//!
//! The value sits behind a `parking_lot::RwLock`; clones of a signal share
//! the same value and ID, so a clone captured by a closure observes writes
//! made through the original.

use std::fmt::Debug;
use std::sync::Arc;

use parking_lot::RwLock;

use super::runtime::{next_source_id, Runtime, SourceId};
use super::scope::TrackingScope;

/// A reactive cell holding a value of type `T`.
///
/// # Example
///
/// ```rust,ignore
/// let name = Signal::new(String::from("a"));
///
/// let value = name.get();   // tracked read
/// name.set(String::from("b"));  // invalidates dependents
/// ```
pub struct Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Source ID shared with memos, used for dependency tracking.
    id: SourceId,

    /// The current value.
    value: Arc<RwLock<T>>,
}

impl<T> Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a new signal with the given initial value.
    pub fn new(value: T) -> Self {
        Self {
            id: next_source_id(),
            value: Arc::new(RwLock::new(value)),
        }
    }

    /// The signal's source ID.
    pub fn id(&self) -> SourceId {
        self.id
    }

    /// Get the current value.
    ///
    /// If called within a tracking scope, registers the running computation
    /// as a dependent of this signal.
    pub fn get(&self) -> T {
        if TrackingScope::is_active() {
            TrackingScope::track(self.id);

            if let Some(observer) = TrackingScope::current_observer() {
                Runtime::add_dependency(self.id, observer);
            }
        }

        self.value.read().clone()
    }

    /// Get the current value without registering a dependency.
    pub fn get_untracked(&self) -> T {
        self.value.read().clone()
    }

    /// Set a new value and invalidate subscribers.
    pub fn set(&self, value: T) {
        {
            let mut guard = self.value.write();
            *guard = value;
        }

        tracing::trace!(source = self.id, "signal write");
        Runtime::notify_change(self.id);
    }

    /// Update the value with a function of the current value.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        let new_value = {
            let guard = self.value.read();
            f(&guard)
        };
        self.set(new_value);
    }
}

impl<T> Clone for Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            value: Arc::clone(&self.value),
        }
    }
}

impl<T> Debug for Signal<T>
where
    T: Clone + Send + Sync + Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("id", &self.id)
            .field("value", &self.get_untracked())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_get_and_set() {
        let signal = Signal::new(0);
        assert_eq!(signal.get(), 0);

        signal.set(42);
        assert_eq!(signal.get(), 42);
    }

    #[test]
    fn signal_update() {
        let signal = Signal::new(10);
        signal.update(|v| v + 5);
        assert_eq!(signal.get(), 15);
    }

    #[test]
    fn signal_clone_shares_state() {
        let a = Signal::new(0);
        let b = a.clone();

        a.set(42);
        assert_eq!(b.get(), 42);

        b.set(100);
        assert_eq!(a.get(), 100);
    }

    #[test]
    fn signal_ids_are_unique() {
        let a = Signal::new(0);
        let b = Signal::new(0);

        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn untracked_read_matches_tracked_read() {
        let signal = Signal::new(String::from("x"));
        assert_eq!(signal.get(), signal.get_untracked());
    }
}
