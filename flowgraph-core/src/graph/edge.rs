//! Graph edge records.

use serde::{Deserialize, Serialize};

/// A directed connection between two nodes, referencing them by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl Edge {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
        }
    }

    /// Whether this edge starts or ends at the given node.
    ///
    /// A self-loop matches once, not twice: this is a single predicate per
    /// edge, so filtering with it can never include an edge twice.
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touches_source_and_target() {
        let edge = Edge::new("e1", "a", "b");

        assert!(edge.touches("a"));
        assert!(edge.touches("b"));
        assert!(!edge.touches("c"));
    }

    #[test]
    fn self_loop_matches_once_per_filter() {
        let edges = vec![Edge::new("loop", "a", "a"), Edge::new("e2", "a", "b")];

        let connected: Vec<&Edge> = edges.iter().filter(|e| e.touches("a")).collect();
        assert_eq!(connected.len(), 2);
        assert_eq!(connected[0].id, "loop");
    }
}
