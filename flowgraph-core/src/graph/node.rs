//! Graph node records.

use serde::{Deserialize, Serialize};

/// 2-D position of a node on the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A node in the flow graph.
///
/// Nodes are identified by a string id, unique within the graph. A node may
/// reference another node as its parent (nesting/grouping); root nodes have
/// no parent. The `data` payload is opaque to the core and carried through
/// for the embedding application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowNode {
    pub id: String,

    /// Id of the enclosing parent node, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_node: Option<String>,

    #[serde(default)]
    pub position: Position,

    /// Application-defined payload.
    #[serde(default)]
    pub data: serde_json::Value,
}

impl FlowNode {
    /// Create a node with the given id, no parent, at the origin.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_node: None,
            position: Position::default(),
            data: serde_json::Value::Null,
        }
    }

    /// Set the parent node id.
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent_node = Some(parent.into());
        self
    }

    /// Set the canvas position.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Position { x, y };
        self
    }

    /// Attach an application payload.
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let node = FlowNode::new("a")
            .with_parent("root")
            .at(10.0, 20.0)
            .with_data(serde_json::json!({"label": "A"}));

        assert_eq!(node.id, "a");
        assert_eq!(node.parent_node.as_deref(), Some("root"));
        assert_eq!(node.position, Position { x: 10.0, y: 20.0 });
        assert_eq!(node.data["label"], "A");
    }

    #[test]
    fn root_node_has_no_parent() {
        let node = FlowNode::new("root");
        assert!(node.parent_node.is_none());
    }

    #[test]
    fn serde_skips_absent_parent() {
        let json = serde_json::to_string(&FlowNode::new("a")).unwrap();
        assert!(!json.contains("parent_node"));

        let back: FlowNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, FlowNode::new("a"));
    }
}
