//! Whole-graph documents: node records in dependency order, plus JSON
//! helpers.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::{GraphError, NodeRecord};
use crate::graph::Node;

/// A serializable collection of node records.
///
/// [`export`](Self::export) emits records in an order where every operand
/// precedes the nodes derived from it, which is exactly the order
/// [`import`](Self::import) consumes them in. Reading or writing the JSON
/// text to storage is left to the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub nodes: Vec<NodeRecord>,
}

impl GraphDocument {
    /// Flattens the graphs reachable from `roots` into a document.
    ///
    /// The walk is a depth-first post-order, so every record's operands
    /// appear before it; a sub-DAG shared between several derived nodes is
    /// recorded once. Two distinct nodes sharing one name are both exported
    /// as-is and left for [`import`](Self::import) to reject, rather than
    /// being silently renamed.
    pub fn export(roots: &[Node]) -> Self {
        let mut nodes = Vec::new();
        let mut visited = HashSet::new();
        for root in roots {
            collect(root, &mut visited, &mut nodes);
        }
        GraphDocument { nodes }
    }

    /// Rebuilds every node in the document, front to back.
    ///
    /// Returns the name-to-node map accumulated along the way; callers
    /// retrieve their roots from it by name. Records must be in dependency
    /// order, as produced by [`export`](Self::export): an operand name not
    /// yet in the map is [`GraphError::UnknownNode`], and a name
    /// reconstructed twice is [`GraphError::DuplicateNode`].
    pub fn import(&self) -> Result<HashMap<String, Node>, GraphError> {
        let mut node_by_name: HashMap<String, Node> = HashMap::with_capacity(self.nodes.len());
        for record in &self.nodes {
            let node = Node::from_record(record, &node_by_name)?;
            let name = node.name().to_string();
            if node_by_name.insert(name.clone(), node).is_some() {
                return Err(GraphError::DuplicateNode { name });
            }
        }
        Ok(node_by_name)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

// Post-order over the operand DAG: dependencies are pushed before the node
// itself, identity-based dedup keeps shared operands from repeating.
fn collect(node: &Node, visited: &mut HashSet<usize>, out: &mut Vec<NodeRecord>) {
    if !visited.insert(node.key()) {
        return;
    }
    if let Some((left, right, _)) = node.operands() {
        collect(left, visited, out);
        collect(right, visited, out);
    }
    out.push(node.to_record());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_orders_operands_first() {
        // Diamond: the shared square is recorded once, before its consumer.
        let a = Node::leaf("a", 2.0);
        let sq = &a * &a;
        let quad = &sq + &sq;

        let doc = GraphDocument::export(&[quad]);
        let names: Vec<_> = doc.nodes.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "(a * a)", "((a * a) + (a * a))"]);
    }

    #[test]
    fn test_export_multiple_roots_shares_operands() {
        let a = Node::leaf("a", 1.0);
        let b = Node::leaf("b", 2.0);
        let sum = &a + &b;
        let diff = &a - &b;

        let doc = GraphDocument::export(&[sum, diff]);
        let names: Vec<_> = doc.nodes.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "(a + b)", "(a - b)"]);
    }

    #[test]
    fn test_json_round_trip_recomputes() {
        let a = Node::leaf("a", 3.0);
        let b = Node::leaf("b", 5.0);
        let c = &a + &b;
        c.compute();

        let json = GraphDocument::export(&[c]).to_json().unwrap();
        let restored = GraphDocument::from_json(&json).unwrap().import().unwrap();

        // The cache does not survive the trip, recomputability does.
        let c2 = &restored["(a + b)"];
        assert_eq!(c2.value(), None);
        assert_eq!(c2.compute(), 8.0);
    }

    #[test]
    fn test_import_rejects_duplicate_names() {
        let doc = GraphDocument {
            nodes: vec![
                Node::leaf("a", 1.0).to_record(),
                Node::leaf("a", 2.0).to_record(),
            ],
        };

        let err = doc.import().unwrap_err();
        assert_eq!(
            err,
            GraphError::DuplicateNode {
                name: "a".to_string()
            }
        );
    }

    #[test]
    fn test_import_rejects_out_of_order_records() {
        let a = Node::leaf("a", 1.0);
        let b = Node::leaf("b", 2.0);
        let mut doc = GraphDocument::export(&[&a + &b]);

        // A derived record ahead of its operands must fail the lookup.
        doc.nodes.reverse();
        let err = doc.import().unwrap_err();
        assert!(matches!(err, GraphError::UnknownNode { .. }));
    }
}
