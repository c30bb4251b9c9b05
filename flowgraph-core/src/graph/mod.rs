//! Flow Graph
//!
//! The domain side of the crate: node and edge records, the store that owns
//! them, and the node accessor that derives per-node views from the store.
//!
//! # Overview
//!
//! - [`FlowNode`] and [`Edge`] are plain serializable records. Nodes may
//!   reference a parent node; edges reference their endpoints by id.
//! - [`GraphStore`] owns the collections. They live in signals, so a store
//!   mutation invalidates every derived value reading them.
//! - [`NodeAccessor`] resolves an effective node id (explicit input or
//!   component context), then derives the node, its parent, its rendered
//!   element, and its connected edges as memoized reactive values.
//!
//! # Design Decisions
//!
//! 1. The node map is insertion ordered and edges are a plain sequence, so
//!    derived views preserve the order the application established.
//!
//! 2. Resolution failures are structured [`FlowError`] values. Whether they
//!    surface on the store's notification channel or as `Err` from the read
//!    is fixed per accessor by [`ErrorPolicy`], never mixed.
//!
//! 3. An unresolved node degrades downstream values to empty results
//!    instead of faulting: absent parent, no edges.

mod accessor;
mod edge;
mod error;
mod node;
mod store;

pub use accessor::{use_contextual_node, use_node, IdSource, NodeAccessor, NodeContext, ResolvedNode};
pub use edge::Edge;
pub use error::{ErrorPolicy, FlowError};
pub use node::{FlowNode, Position};
pub use store::{ElementRef, ErrorSubscription, GraphStore};
