//! Reactive Runtime
//!
//! The runtime is the central coordinator between reactive sources (signals,
//! memos) and the observers that read them. It owns the global
//! source→observer subscription table and propagates invalidation when a
//! source changes.
//!
//! # How It Works
//!
//! 1. Every source (signal or memo) carries a unique [`SourceId`].
//!
//! 2. When an observer reads a source inside a tracking scope, the runtime
//!    records the subscription.
//!
//! 3. When a source changes, the runtime looks up its subscribers and calls
//!    [`Observer::invalidate`] on each. Memos respond by marking their cache
//!    stale; recomputation stays lazy (on next read).
//!
//! # Registry
//!
//! Observers are held as weak references so the runtime never keeps a
//! dropped memo alive. Registration returns a handle whose drop removes the
//! observer and all of its subscriptions.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, Weak};

use dashmap::DashMap;
use smallvec::SmallVec;

use super::scope::ObserverId;

/// Unique identifier for a reactive source (signal or memo).
pub type SourceId = u64;

static SOURCE_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Allocate a source ID. Signals and memos share one ID space so a memo can
/// be tracked exactly like a signal.
pub(crate) fn next_source_id() -> SourceId {
    SOURCE_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// A computation that depends on reactive sources and can be told that one
/// of them changed.
pub trait Observer: Send + Sync {
    /// The observer's unique ID.
    fn observer_id(&self) -> ObserverId;

    /// One of the observer's sources changed; any cached result is no longer
    /// trustworthy.
    fn invalidate(&self);
}

/// Handle for a registered observer.
///
/// Dropping the handle unregisters the observer and removes its
/// subscriptions.
pub struct ObserverHandle {
    observer: ObserverId,
}

impl Drop for ObserverHandle {
    fn drop(&mut self) {
        Runtime::unregister(self.observer);
    }
}

/// The global reactive runtime.
pub struct Runtime;

static OBSERVERS: OnceLock<DashMap<ObserverId, Weak<dyn Observer>>> = OnceLock::new();
static SUBSCRIPTIONS: OnceLock<DashMap<SourceId, SmallVec<[ObserverId; 4]>>> = OnceLock::new();

fn observers() -> &'static DashMap<ObserverId, Weak<dyn Observer>> {
    OBSERVERS.get_or_init(DashMap::new)
}

fn subscriptions() -> &'static DashMap<SourceId, SmallVec<[ObserverId; 4]>> {
    SUBSCRIPTIONS.get_or_init(DashMap::new)
}

impl Runtime {
    /// Register an observer. The returned handle unregisters it on drop.
    pub fn register(observer: Arc<dyn Observer>) -> ObserverHandle {
        let id = observer.observer_id();
        observers().insert(id, Arc::downgrade(&observer));
        ObserverHandle { observer: id }
    }

    fn unregister(observer: ObserverId) {
        observers().remove(&observer);
        Self::clear_subscriptions(observer);
    }

    /// Record that `observer` depends on `source`.
    ///
    /// Called automatically when a source is read inside a tracking scope.
    pub fn add_dependency(source: SourceId, observer: ObserverId) {
        let mut subs = subscriptions().entry(source).or_default();
        if !subs.contains(&observer) {
            subs.push(observer);
        }
    }

    /// Remove every subscription held by `observer`.
    ///
    /// Called before an observer re-runs, so stale dependencies from the
    /// previous run do not linger.
    pub fn clear_subscriptions(observer: ObserverId) {
        for mut entry in subscriptions().iter_mut() {
            entry.value_mut().retain(|o| *o != observer);
        }
    }

    /// Notify every subscriber of `source` that it changed.
    ///
    /// Invalidation may cascade: a memo invalidated here notifies its own
    /// subscribers in turn.
    pub fn notify_change(source: SourceId) {
        let subscribers: SmallVec<[ObserverId; 4]> = match subscriptions().get(&source) {
            Some(entry) => entry.clone(),
            None => return,
        };

        if subscribers.is_empty() {
            return;
        }

        tracing::trace!(source, count = subscribers.len(), "invalidating subscribers");

        for observer_id in subscribers {
            // Clone the weak ref out so no map guard is held across the
            // invalidate call (which may re-enter the runtime).
            let weak = observers().get(&observer_id).map(|entry| entry.value().clone());

            if let Some(observer) = weak.and_then(|w| w.upgrade()) {
                observer.invalidate();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Probe {
        id: ObserverId,
        invalidations: AtomicUsize,
    }

    impl Probe {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                id: ObserverId::new(),
                invalidations: AtomicUsize::new(0),
            })
        }

        fn count(&self) -> usize {
            self.invalidations.load(Ordering::SeqCst)
        }
    }

    impl Observer for Probe {
        fn observer_id(&self) -> ObserverId {
            self.id
        }

        fn invalidate(&self) {
            self.invalidations.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn source_ids_are_unique() {
        let a = next_source_id();
        let b = next_source_id();
        assert_ne!(a, b);
    }

    #[test]
    fn notify_reaches_subscribers() {
        let probe = Probe::new();
        let source = next_source_id();

        let _handle = Runtime::register(probe.clone());
        Runtime::add_dependency(source, probe.observer_id());

        assert_eq!(probe.count(), 0);

        Runtime::notify_change(source);
        assert_eq!(probe.count(), 1);

        Runtime::notify_change(source);
        assert_eq!(probe.count(), 2);
    }

    #[test]
    fn duplicate_dependencies_notify_once() {
        let probe = Probe::new();
        let source = next_source_id();

        let _handle = Runtime::register(probe.clone());
        Runtime::add_dependency(source, probe.observer_id());
        Runtime::add_dependency(source, probe.observer_id());

        Runtime::notify_change(source);
        assert_eq!(probe.count(), 1);
    }

    #[test]
    fn cleared_subscriptions_stop_notifications() {
        let probe = Probe::new();
        let source = next_source_id();

        let _handle = Runtime::register(probe.clone());
        Runtime::add_dependency(source, probe.observer_id());

        Runtime::notify_change(source);
        assert_eq!(probe.count(), 1);

        Runtime::clear_subscriptions(probe.observer_id());
        Runtime::notify_change(source);
        assert_eq!(probe.count(), 1);
    }

    #[test]
    fn dropped_handle_unregisters() {
        let probe = Probe::new();
        let source = next_source_id();

        let handle = Runtime::register(probe.clone());
        Runtime::add_dependency(source, probe.observer_id());
        drop(handle);

        Runtime::notify_change(source);
        assert_eq!(probe.count(), 0);
    }
}
