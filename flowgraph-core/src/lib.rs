//! Flowgraph Core
//!
//! This crate provides the core runtime for the Flowgraph reactive
//! node-graph UI library. It implements:
//!
//! - Reactive primitives (signals, memos, automatic dependency tracking)
//! - The graph store holding node and edge collections
//! - The node accessor: per-node derived views (node, parent, element,
//!   connected edges) that stay fresh as the graph changes
//!
//! # Architecture
//!
//! The crate is organized into two modules:
//!
//! - `reactive`: signals, memos, and the invalidation runtime
//! - `graph`: node/edge records, the graph store, and the node accessor
//!
//! # Example
//!
//! ```rust,ignore
//! use flowgraph_core::{use_node, Edge, FlowNode, GraphStore};
//!
//! let store = GraphStore::new();
//! store.add_node(FlowNode::new("a"));
//! store.add_node(FlowNode::new("b").with_parent("a"));
//! store.add_edge(Edge::new("e1", "a", "b"));
//!
//! let accessor = use_node(&store, "b");
//! let view = accessor.resolve()?;
//!
//! assert_eq!(view.id, "b");
//! assert_eq!(view.parent_node.unwrap().id, "a");
//! assert_eq!(view.connected_edges.len(), 1);
//! ```

pub mod graph;
pub mod reactive;

pub use graph::{
    use_contextual_node, use_node, Edge, ElementRef, ErrorPolicy, ErrorSubscription, FlowError,
    FlowNode, GraphStore, IdSource, NodeAccessor, NodeContext, Position, ResolvedNode,
};
pub use reactive::{Memo, Signal};
