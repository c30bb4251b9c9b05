//! Node Accessor
//!
//! Resolves a node id (explicit or contextual), looks up the node, its
//! parent, its rendered element, and its connected edges, and exposes each
//! as a memoized derived value. Every read is fresh relative to the last
//! store mutation or id change; nothing here mutates the store.
//!
//! # Resolution
//!
//! The effective id is the explicit input when present and non-empty,
//! otherwise the contextual id from [`NodeContext`]. An empty effective id
//! is the `MissingIdentifier` error; a non-empty id matching no node is
//! `NodeNotFound`. How either is reported depends on the accessor's
//! [`ErrorPolicy`], fixed at construction:
//!
//! - `Notify`: the error goes out on the store's notification channel and
//!   reads degrade (empty id, absent node, empty edge set).
//! - `Fail`: the read returns `Err`; nothing is emitted.
//!
//! An absent node never faults downstream: parent and connected edges are
//! computed against `Option<FlowNode>` and collapse to empty results.

use std::sync::Arc;

use crate::reactive::{Memo, Signal};

use super::edge::Edge;
use super::error::{ErrorPolicy, FlowError};
use super::node::FlowNode;
use super::store::{ElementRef, GraphStore};

/// An explicit node-id input: a plain value, a signal, or a getter.
///
/// Signals and getters are re-read on every resolution pass, so an id that
/// changes over time re-resolves automatically.
#[derive(Clone)]
pub enum IdSource {
    Value(String),
    Signal(Signal<String>),
    Getter(Arc<dyn Fn() -> String + Send + Sync>),
}

impl IdSource {
    /// Wrap a getter closure.
    pub fn getter<F>(f: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        Self::Getter(Arc::new(f))
    }

    /// The input's current value. Signal reads are tracked.
    fn current(&self) -> String {
        match self {
            IdSource::Value(id) => id.clone(),
            IdSource::Signal(signal) => signal.get(),
            IdSource::Getter(get) => get(),
        }
    }
}

impl From<&str> for IdSource {
    fn from(id: &str) -> Self {
        Self::Value(id.to_owned())
    }
}

impl From<String> for IdSource {
    fn from(id: String) -> Self {
        Self::Value(id)
    }
}

impl From<Signal<String>> for IdSource {
    fn from(signal: Signal<String>) -> Self {
        Self::Signal(signal)
    }
}

impl std::fmt::Debug for IdSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdSource::Value(id) => f.debug_tuple("Value").field(id).finish(),
            IdSource::Signal(signal) => f.debug_tuple("Signal").field(signal).finish(),
            IdSource::Getter(_) => f.debug_tuple("Getter").finish(),
        }
    }
}

/// Contextual values supplied by the enclosing component scope.
///
/// Passed explicitly rather than read from ambient state, so accessors stay
/// pure and testable. The default context carries no id and no element.
#[derive(Debug, Clone, Default)]
pub struct NodeContext {
    /// Contextual node id; empty means "no ambient id".
    pub node_id: String,

    /// Rendered element of the enclosing node component, if known.
    pub element: Option<ElementRef>,
}

impl NodeContext {
    /// Context as set up by a node component wrapping its children.
    pub fn for_node(node_id: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            element: None,
        }
    }

    pub fn with_element(mut self, element: ElementRef) -> Self {
        self.element = Some(element);
        self
    }
}

/// One consistent snapshot of everything the accessor derives.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedNode {
    pub id: String,
    pub element: Option<ElementRef>,
    pub node: Option<FlowNode>,
    pub parent_node: Option<FlowNode>,
    pub connected_edges: Vec<Edge>,
}

/// Reactive access to one node, its parent, and its connected edges.
pub struct NodeAccessor {
    policy: ErrorPolicy,
    id: Memo<Result<String, FlowError>>,
    element: Memo<Option<ElementRef>>,
    node: Memo<Result<FlowNode, FlowError>>,
    parent_node: Memo<Option<FlowNode>>,
    connected_edges: Memo<Vec<Edge>>,
}

impl NodeAccessor {
    /// Build an accessor over `store`.
    ///
    /// `explicit` is the optional explicit id input; `context` carries the
    /// ambient id and element; `policy` fixes error reporting for the
    /// accessor's lifetime.
    pub fn new(
        store: &GraphStore,
        explicit: Option<IdSource>,
        context: NodeContext,
        policy: ErrorPolicy,
    ) -> Self {
        let ambient_id = context.node_id.clone();
        let ambient_element = context.element;

        let id = Memo::new({
            let store = store.clone();
            move || {
                let explicit_value = explicit
                    .as_ref()
                    .map(IdSource::current)
                    .filter(|id| !id.is_empty());

                let effective = explicit_value.unwrap_or_else(|| ambient_id.clone());

                if effective.is_empty() {
                    if policy == ErrorPolicy::Notify {
                        store.emit_error(FlowError::MissingIdentifier);
                    }
                    return Err(FlowError::MissingIdentifier);
                }

                Ok(effective)
            }
        });

        let element = Memo::new({
            let store = store.clone();
            let id = id.clone();
            move || {
                if ambient_element.is_some() {
                    return ambient_element;
                }
                match id.get() {
                    Ok(id) => store.find_element(&id),
                    Err(_) => None,
                }
            }
        });

        let node = Memo::new({
            let store = store.clone();
            let id = id.clone();
            move || match id.get() {
                Ok(id) => match store.find_node(&id) {
                    Some(node) => Ok(node),
                    None => {
                        let error = FlowError::NodeNotFound { id };
                        if policy == ErrorPolicy::Notify {
                            store.emit_error(error.clone());
                        }
                        Err(error)
                    }
                },
                // Already reported by the id computation.
                Err(error) => Err(error),
            }
        });

        let parent_node = Memo::new({
            let store = store.clone();
            let node = node.clone();
            move || {
                let node = node.get().ok()?;
                let parent_id = node.parent_node?;
                // A dangling parent reference is a valid empty result.
                store.find_node(&parent_id)
            }
        });

        let connected_edges = Memo::new({
            let store = store.clone();
            let node = node.clone();
            move || match node.get() {
                Ok(node) => store
                    .edges()
                    .into_iter()
                    .filter(|edge| edge.touches(&node.id))
                    .collect(),
                Err(_) => Vec::new(),
            }
        });

        Self {
            policy,
            id,
            element,
            node,
            parent_node,
            connected_edges,
        }
    }

    /// The effective node id.
    ///
    /// Under `Notify` this is `Ok`, degrading to an empty string when no id
    /// resolves; under `Fail` an unresolvable id is `Err`.
    pub fn id(&self) -> Result<String, FlowError> {
        match self.policy {
            ErrorPolicy::Notify => Ok(self.id.get().unwrap_or_default()),
            ErrorPolicy::Fail => self.id.get(),
        }
    }

    /// The rendered element for the effective id: the contextual element
    /// when one was supplied, else the store's element registry entry.
    pub fn element(&self) -> Option<ElementRef> {
        self.element.get()
    }

    /// The node record for the effective id.
    ///
    /// Under `Notify` this is `Ok`, degrading to `None` when resolution
    /// failed; under `Fail` it is `Err`.
    pub fn node(&self) -> Result<Option<FlowNode>, FlowError> {
        match self.policy {
            ErrorPolicy::Notify => Ok(self.node.get().ok()),
            ErrorPolicy::Fail => self.node.get().map(Some),
        }
    }

    /// The node's parent record. `None` for root nodes, dangling parent
    /// references, and unresolved nodes; never an error.
    pub fn parent_node(&self) -> Option<FlowNode> {
        self.parent_node.get()
    }

    /// Edges whose source or target is the resolved node, in store order,
    /// each at most once. Empty when the node is unresolved.
    pub fn connected_edges(&self) -> Vec<Edge> {
        self.connected_edges.get()
    }

    /// Read all derived values in one pass.
    ///
    /// Under `Fail` the first resolution error aborts the pass.
    pub fn resolve(&self) -> Result<ResolvedNode, FlowError> {
        Ok(ResolvedNode {
            id: self.id()?,
            element: self.element(),
            node: self.node()?,
            parent_node: self.parent_node(),
            connected_edges: self.connected_edges(),
        })
    }
}

impl std::fmt::Debug for NodeAccessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeAccessor")
            .field("policy", &self.policy)
            .field("id", &self.id)
            .finish()
    }
}

/// Accessor for an explicitly identified node, with the default `Notify`
/// policy and no surrounding context.
pub fn use_node(store: &GraphStore, id: impl Into<IdSource>) -> NodeAccessor {
    NodeAccessor::new(
        store,
        Some(id.into()),
        NodeContext::default(),
        ErrorPolicy::Notify,
    )
}

/// Accessor for the node identified by the surrounding component context,
/// with the default `Notify` policy.
pub fn use_contextual_node(store: &GraphStore, context: NodeContext) -> NodeAccessor {
    NodeAccessor::new(store, None, context, ErrorPolicy::Notify)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn sample_store() -> GraphStore {
        let store = GraphStore::new();
        store.add_node(FlowNode::new("a"));
        store.add_node(FlowNode::new("b").with_parent("a"));
        store.add_edge(Edge::new("e1", "a", "b"));
        store
    }

    fn collect_errors(store: &GraphStore) -> (Arc<Mutex<Vec<FlowError>>>, crate::graph::ErrorSubscription) {
        let seen: Arc<Mutex<Vec<FlowError>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let sub = store.on_error(move |err| sink.lock().push(err.clone()));
        (seen, sub)
    }

    #[test]
    fn explicit_id_wins_over_context() {
        let store = sample_store();
        let accessor = NodeAccessor::new(
            &store,
            Some("b".into()),
            NodeContext::for_node("a"),
            ErrorPolicy::Fail,
        );

        assert_eq!(accessor.id().unwrap(), "b");
    }

    #[test]
    fn empty_explicit_id_falls_back_to_context() {
        let store = sample_store();
        let accessor = NodeAccessor::new(
            &store,
            Some("".into()),
            NodeContext::for_node("a"),
            ErrorPolicy::Fail,
        );

        assert_eq!(accessor.id().unwrap(), "a");
    }

    #[test]
    fn absent_explicit_id_falls_back_to_context() {
        let store = sample_store();
        let accessor = NodeAccessor::new(
            &store,
            None,
            NodeContext::for_node("b"),
            ErrorPolicy::Fail,
        );

        assert_eq!(accessor.id().unwrap(), "b");
        assert_eq!(accessor.node().unwrap().unwrap().id, "b");
    }

    #[test]
    fn missing_identifier_fail_mode() {
        let store = sample_store();
        let (seen, _sub) = collect_errors(&store);
        let accessor =
            NodeAccessor::new(&store, None, NodeContext::default(), ErrorPolicy::Fail);

        assert_eq!(accessor.id(), Err(FlowError::MissingIdentifier));
        assert_eq!(accessor.node(), Err(FlowError::MissingIdentifier));
        assert_eq!(accessor.resolve(), Err(FlowError::MissingIdentifier));

        // Fail mode never touches the notification channel.
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn missing_identifier_notify_mode() {
        let store = sample_store();
        let (seen, _sub) = collect_errors(&store);
        let accessor =
            NodeAccessor::new(&store, None, NodeContext::default(), ErrorPolicy::Notify);

        assert_eq!(accessor.id(), Ok(String::new()));
        assert_eq!(accessor.node(), Ok(None));
        assert_eq!(accessor.parent_node(), None);
        assert!(accessor.connected_edges().is_empty());

        // One emission per resolution pass, not per read.
        assert_eq!(seen.lock().as_slice(), &[FlowError::MissingIdentifier]);
    }

    #[test]
    fn node_not_found_fail_mode() {
        let store = sample_store();
        let accessor = NodeAccessor::new(
            &store,
            Some("z".into()),
            NodeContext::default(),
            ErrorPolicy::Fail,
        );

        assert_eq!(accessor.id().unwrap(), "z");
        assert_eq!(
            accessor.node(),
            Err(FlowError::NodeNotFound { id: "z".into() })
        );
        assert_eq!(
            accessor.resolve(),
            Err(FlowError::NodeNotFound { id: "z".into() })
        );
    }

    #[test]
    fn node_not_found_notify_mode_degrades() {
        let store = sample_store();
        let (seen, _sub) = collect_errors(&store);
        let accessor = use_node(&store, "z");

        assert_eq!(accessor.node(), Ok(None));
        assert_eq!(accessor.parent_node(), None);
        assert!(accessor.connected_edges().is_empty());
        assert_eq!(
            seen.lock().as_slice(),
            &[FlowError::NodeNotFound { id: "z".into() }]
        );
    }

    #[test]
    fn parent_resolution() {
        let store = sample_store();

        let child = use_node(&store, "b");
        assert_eq!(child.parent_node().unwrap().id, "a");

        let root = use_node(&store, "a");
        assert_eq!(root.parent_node(), None);
    }

    #[test]
    fn dangling_parent_reference_is_absent_not_an_error() {
        let store = GraphStore::new();
        store.add_node(FlowNode::new("orphan").with_parent("gone"));
        let (seen, _sub) = collect_errors(&store);

        let accessor = use_node(&store, "orphan");
        assert_eq!(accessor.parent_node(), None);
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn connected_edges_preserve_store_order() {
        let store = sample_store();
        store.add_edge(Edge::new("e2", "c", "b"));
        store.add_edge(Edge::new("e3", "a", "c"));

        let accessor = use_node(&store, "b");
        let ids: Vec<String> = accessor.connected_edges().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["e1", "e2"]);
    }

    #[test]
    fn self_loop_appears_once() {
        let store = GraphStore::new();
        store.add_node(FlowNode::new("a"));
        store.add_edge(Edge::new("loop", "a", "a"));

        let accessor = use_node(&store, "a");
        assert_eq!(accessor.connected_edges().len(), 1);
    }

    #[test]
    fn ambient_element_wins_over_registry() {
        let store = sample_store();
        let registered = ElementRef::new();
        let ambient = ElementRef::new();
        store.register_element("a", registered);

        let with_ambient = NodeAccessor::new(
            &store,
            Some("a".into()),
            NodeContext::default().with_element(ambient),
            ErrorPolicy::Fail,
        );
        assert_eq!(with_ambient.element(), Some(ambient));

        let without_ambient = use_node(&store, "a");
        assert_eq!(without_ambient.element(), Some(registered));
    }

    #[test]
    fn signal_backed_id_re_resolves() {
        let store = sample_store();
        let id = Signal::new(String::from("a"));
        let accessor = use_node(&store, id.clone());

        assert_eq!(accessor.node().unwrap().unwrap().id, "a");

        id.set(String::from("b"));
        assert_eq!(accessor.node().unwrap().unwrap().id, "b");
        assert_eq!(accessor.parent_node().unwrap().id, "a");
    }

    #[test]
    fn getter_backed_id_resolves() {
        let store = sample_store();
        let accessor = NodeAccessor::new(
            &store,
            Some(IdSource::getter(|| String::from("a"))),
            NodeContext::default(),
            ErrorPolicy::Fail,
        );

        assert_eq!(accessor.id().unwrap(), "a");
    }

    #[test]
    fn contextual_accessor_uses_component_context() {
        let store = sample_store();
        let accessor = use_contextual_node(&store, NodeContext::for_node("b"));

        assert_eq!(accessor.id().unwrap(), "b");
    }
}
