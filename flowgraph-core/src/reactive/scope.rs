//! Tracking Scope
//!
//! The tracking scope records which derived computation is currently running.
//! This enables automatic dependency discovery: when a signal or memo is read,
//! the read registers the current computation as a dependent of that source.
//!
//! # Implementation
//!
//! A thread-local stack holds the currently executing computation. Entering a
//! scope (recomputing a memo) pushes an entry; the guard pops it on drop, so
//! the stack stays balanced even if the computation panics.
//!
//! Nested scopes are supported: a memo that reads another memo pushes a second
//! entry while the inner recomputation runs, and dependencies land on the
//! innermost entry.

use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, Ordering};

use super::runtime::SourceId;

/// Unique identifier for an observer (a derived computation that reads
/// reactive sources).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

impl ObserverId {
    /// Generate a new unique observer ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ObserverId {
    fn default() -> Self {
        Self::new()
    }
}

thread_local! {
    static SCOPE_STACK: RefCell<Vec<ScopeEntry>> = RefCell::new(Vec::new());
}

/// An entry on the scope stack: the running observer plus the source IDs it
/// has read so far.
#[derive(Debug, Clone)]
struct ScopeEntry {
    observer: ObserverId,
    reads: Vec<SourceId>,
}

/// Guard for an active tracking scope. Pops the scope entry when dropped.
pub struct TrackingScope {
    observer: ObserverId,
}

impl TrackingScope {
    /// Enter a tracking scope for the given observer.
    ///
    /// While the guard is alive, every signal or memo read on this thread
    /// records the observer as a dependent.
    pub fn enter(observer: ObserverId) -> Self {
        SCOPE_STACK.with(|stack| {
            stack.borrow_mut().push(ScopeEntry {
                observer,
                reads: Vec::new(),
            });
        });

        Self { observer }
    }

    /// Whether any tracking scope is active on this thread.
    pub fn is_active() -> bool {
        SCOPE_STACK.with(|stack| !stack.borrow().is_empty())
    }

    /// The observer of the innermost active scope, if any.
    pub fn current_observer() -> Option<ObserverId> {
        SCOPE_STACK.with(|stack| stack.borrow().last().map(|entry| entry.observer))
    }

    /// Record a read of the given source in the innermost scope.
    ///
    /// Called by signals and memos from their `get` paths.
    pub fn track(source: SourceId) {
        SCOPE_STACK.with(|stack| {
            if let Some(entry) = stack.borrow_mut().last_mut() {
                entry.reads.push(source);
            }
        });
    }

    /// The source IDs read so far in the innermost scope.
    pub fn collected_reads() -> Vec<SourceId> {
        SCOPE_STACK.with(|stack| {
            stack
                .borrow()
                .last()
                .map(|entry| entry.reads.clone())
                .unwrap_or_default()
        })
    }
}

impl Drop for TrackingScope {
    fn drop(&mut self) {
        SCOPE_STACK.with(|stack| {
            let popped = stack.borrow_mut().pop();

            // Catch mismatched enter/drop pairs early in debug builds.
            if let Some(entry) = popped {
                debug_assert_eq!(
                    entry.observer, self.observer,
                    "TrackingScope mismatch: expected {:?}, got {:?}",
                    self.observer, entry.observer
                );
            }
        });
    }
}
