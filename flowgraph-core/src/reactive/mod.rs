//! Reactive Primitives
//!
//! This module implements the fine-grained reactivity the rest of the crate
//! is built on: signals, memos, and the tracking machinery that links them.
//!
//! # Concepts
//!
//! ## Signals
//!
//! A Signal is a container for mutable state. When a signal is read inside a
//! tracking scope (a recomputing memo), the reader is registered as a
//! dependent. Writing the signal invalidates all dependents.
//!
//! ## Memos
//!
//! A Memo is a derived value with a cache. A source change only marks the
//! cache stale; the value recomputes on the next read. Memos are sources in
//! their own right, so memo→memo chains invalidate transitively.
//!
//! # Implementation Notes
//!
//! Dependency discovery is automatic: recomputation runs inside a
//! thread-local tracking scope, and every source read during the run is
//! recorded. The global [`Runtime`] holds the source→observer subscription
//! table and drives invalidation. This is the transparent-reactivity design
//! used by Vue 3, SolidJS, and Leptos.

mod memo;
mod runtime;
mod scope;
mod signal;

pub use memo::Memo;
pub use runtime::{Observer, ObserverHandle, Runtime, SourceId};
pub use scope::{ObserverId, TrackingScope};
pub use signal::Signal;
