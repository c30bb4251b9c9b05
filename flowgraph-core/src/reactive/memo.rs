//! Memo Implementation
//!
//! A Memo is a cached derived value. It recomputes lazily: a source change
//! only marks the cache stale, and the actual recomputation happens on the
//! next read.
//!
//! # How Memos Work
//!
//! 1. On first read, the memo runs its computation inside a tracking scope,
//!    caches the result, and subscribes to every source it read.
//!
//! 2. When any of those sources changes, the runtime invalidates the memo.
//!
//! 3. The next read recomputes, re-subscribes against the sources actually
//!    read this time, and refreshes the cache.
//!
//! Memos are themselves sources: reading a memo inside another memo's
//! computation links the two, and invalidation cascades through the chain.

use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use super::runtime::{next_source_id, Observer, ObserverHandle, Runtime, SourceId};
use super::scope::{ObserverId, TrackingScope};

/// A lazily recomputed derived value.
///
/// # Example
///
/// ```rust,ignore
/// let count = Signal::new(1);
/// let doubled = Memo::new({
///     let count = count.clone();
///     move || count.get() * 2
/// });
///
/// assert_eq!(doubled.get(), 2);
/// count.set(5);               // marks the memo stale
/// assert_eq!(doubled.get(), 10);  // recomputes here
/// ```
pub struct Memo<T>
where
    T: Clone + Send + Sync + 'static,
{
    inner: Arc<MemoInner<T>>,

    /// Keeps the memo registered with the runtime for as long as any clone
    /// is alive.
    _registration: Arc<ObserverHandle>,
}

struct MemoInner<T> {
    /// Source ID under which dependents track this memo.
    source_id: SourceId,

    /// Observer ID under which this memo tracks its own sources.
    observer_id: ObserverId,

    compute: Box<dyn Fn() -> T + Send + Sync>,

    /// Cached result; `None` until the first computation.
    cache: RwLock<Option<T>>,

    /// Whether the cache needs refreshing. Starts true.
    stale: AtomicBool,

    /// Sources read during the last computation.
    reads: RwLock<Vec<SourceId>>,
}

impl<T> Observer for MemoInner<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn observer_id(&self) -> ObserverId {
        self.observer_id
    }

    fn invalidate(&self) {
        // Cascade only on the clean→stale transition so diamond-shaped
        // dependency graphs do not invalidate the same memo repeatedly.
        if !self.stale.swap(true, Ordering::SeqCst) {
            Runtime::notify_change(self.source_id);
        }
    }
}

impl<T> Memo<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a new memo from a computation.
    ///
    /// The computation does not run until the first read.
    pub fn new<F>(compute: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        let inner = Arc::new(MemoInner {
            source_id: next_source_id(),
            observer_id: ObserverId::new(),
            compute: Box::new(compute),
            cache: RwLock::new(None),
            stale: AtomicBool::new(true),
            reads: RwLock::new(Vec::new()),
        });

        let observer: Arc<dyn Observer> = inner.clone();
        let registration = Runtime::register(observer);

        Self {
            inner,
            _registration: Arc::new(registration),
        }
    }

    /// The memo's source ID (as seen by its dependents).
    pub fn id(&self) -> SourceId {
        self.inner.source_id
    }

    /// Get the current value, recomputing if the cache is stale.
    pub fn get(&self) -> T {
        // Track this memo as a source for any enclosing computation before
        // recursing into our own recomputation.
        if TrackingScope::is_active() {
            TrackingScope::track(self.inner.source_id);

            if let Some(observer) = TrackingScope::current_observer() {
                Runtime::add_dependency(self.inner.source_id, observer);
            }
        }

        if !self.inner.stale.load(Ordering::SeqCst) {
            if let Some(value) = self.inner.cache.read().clone() {
                return value;
            }
        }

        self.recompute()
    }

    fn recompute(&self) -> T {
        // Subscriptions from the previous run are stale; rebuild from what
        // this run actually reads.
        Runtime::clear_subscriptions(self.inner.observer_id);

        let value = {
            let _scope = TrackingScope::enter(self.inner.observer_id);
            let value = (self.inner.compute)();
            *self.inner.reads.write() = TrackingScope::collected_reads();
            value
        };

        *self.inner.cache.write() = Some(value.clone());
        self.inner.stale.store(false, Ordering::SeqCst);

        value
    }

    /// Whether the next read will recompute.
    pub fn is_stale(&self) -> bool {
        self.inner.stale.load(Ordering::SeqCst)
    }

    /// Whether the memo has computed at least once.
    pub fn has_value(&self) -> bool {
        self.inner.cache.read().is_some()
    }

    /// Number of sources read during the last computation.
    pub fn dependency_count(&self) -> usize {
        self.inner.reads.read().len()
    }
}

impl<T> Clone for Memo<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            _registration: Arc::clone(&self._registration),
        }
    }
}

impl<T> Debug for Memo<T>
where
    T: Clone + Send + Sync + Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memo")
            .field("id", &self.inner.source_id)
            .field("stale", &self.is_stale())
            .field("has_value", &self.has_value())
            .finish()
    }
}
