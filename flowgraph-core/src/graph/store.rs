//! Graph Store
//!
//! The store owns the authoritative node and edge collections, the element
//! registry, and the error-notification channel. Collections live in signals
//! so every mutation invalidates the derived values that read them.
//!
//! Clones of a store share state, in the same way signal clones do; a store
//! can be handed to accessors and closures freely.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use super::edge::Edge;
use super::error::FlowError;
use super::node::FlowNode;
use crate::reactive::Signal;

/// Opaque handle to a rendered element.
///
/// The core has no rendering layer; the handle only promises identity, so a
/// renderer can map it back to whatever it drew for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementRef(u64);

impl ElementRef {
    /// Allocate a fresh element handle.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for ElementRef {
    fn default() -> Self {
        Self::new()
    }
}

type ErrorCallback = Box<dyn Fn(&FlowError) + Send + Sync>;

/// The authoritative holder of the graph's nodes and edges.
pub struct GraphStore {
    /// Nodes keyed by id, insertion ordered. Inserting an existing id
    /// replaces the record in place.
    nodes: Signal<IndexMap<String, FlowNode>>,

    /// Edges in insertion order.
    edges: Signal<Vec<Edge>>,

    /// Rendered-element handles keyed by node id.
    elements: Signal<IndexMap<String, ElementRef>>,

    error_listeners: Arc<RwLock<Vec<(u64, ErrorCallback)>>>,
    next_listener_id: Arc<AtomicU64>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self {
            nodes: Signal::new(IndexMap::new()),
            edges: Signal::new(Vec::new()),
            elements: Signal::new(IndexMap::new()),
            error_listeners: Arc::new(RwLock::new(Vec::new())),
            next_listener_id: Arc::new(AtomicU64::new(0)),
        }
    }

    // --- nodes ---------------------------------------------------------

    /// Insert a node, replacing any existing node with the same id.
    pub fn add_node(&self, node: FlowNode) {
        tracing::debug!(id = %node.id, "add node");
        self.nodes.update(|nodes| {
            let mut nodes = nodes.clone();
            nodes.insert(node.id.clone(), node.clone());
            nodes
        });
    }

    /// Remove a node by id. Edges referencing it are left untouched.
    pub fn remove_node(&self, id: &str) {
        tracing::debug!(id, "remove node");
        self.nodes.update(|nodes| {
            let mut nodes = nodes.clone();
            nodes.shift_remove(id);
            nodes
        });
    }

    /// Look up a node by id. A tracked read: callers recompute when the node
    /// collection changes.
    pub fn find_node(&self, id: &str) -> Option<FlowNode> {
        self.nodes.get().get(id).cloned()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.get().len()
    }

    // --- edges ---------------------------------------------------------

    pub fn add_edge(&self, edge: Edge) {
        tracing::debug!(id = %edge.id, source = %edge.source, target = %edge.target, "add edge");
        self.edges.update(|edges| {
            let mut edges = edges.clone();
            edges.push(edge.clone());
            edges
        });
    }

    /// Snapshot of all edges, in insertion order. A tracked read.
    pub fn edges(&self) -> Vec<Edge> {
        self.edges.get()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.get().len()
    }

    // --- elements ------------------------------------------------------

    /// Associate a rendered element with a node id.
    pub fn register_element(&self, node_id: impl Into<String>, element: ElementRef) {
        let node_id = node_id.into();
        self.elements.update(|elements| {
            let mut elements = elements.clone();
            elements.insert(node_id.clone(), element);
            elements
        });
    }

    /// Look up the rendered element for a node id. A tracked read.
    pub fn find_element(&self, node_id: &str) -> Option<ElementRef> {
        self.elements.get().get(node_id).copied()
    }

    // --- error channel -------------------------------------------------

    /// Subscribe to emitted errors. Dropping the returned subscription
    /// unsubscribes.
    pub fn on_error<F>(&self, callback: F) -> ErrorSubscription
    where
        F: Fn(&FlowError) + Send + Sync + 'static,
    {
        let id = self.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.error_listeners.write().push((id, Box::new(callback)));

        ErrorSubscription {
            id,
            listeners: Arc::clone(&self.error_listeners),
        }
    }

    /// Emit a structured error to every subscriber.
    pub fn emit_error(&self, error: FlowError) {
        tracing::warn!(%error, "graph error");

        let listeners = self.error_listeners.read();
        for (_, callback) in listeners.iter() {
            callback(&error);
        }
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for GraphStore {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
            elements: self.elements.clone(),
            error_listeners: Arc::clone(&self.error_listeners),
            next_listener_id: Arc::clone(&self.next_listener_id),
        }
    }
}

impl std::fmt::Debug for GraphStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphStore")
            .field("nodes", &self.node_count())
            .field("edges", &self.edge_count())
            .finish()
    }
}

/// Guard for an error-channel subscription; unsubscribes on drop.
pub struct ErrorSubscription {
    id: u64,
    listeners: Arc<RwLock<Vec<(u64, ErrorCallback)>>>,
}

impl Drop for ErrorSubscription {
    fn drop(&mut self) {
        self.listeners.write().retain(|(id, _)| *id != self.id);
    }
}
