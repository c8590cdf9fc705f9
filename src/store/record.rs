//! Per-node record types mirroring the wire shape
//! `{ "name", "value", "parents": [{ "parent1", "parent2", "operation" }] }`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::GraphError;
use crate::graph::{Node, Operation};

/// One operand entry of a serialized node.
///
/// Operands are referenced by name, not nested; `operation` serializes as
/// one of the literal strings `"add"`, `"subtract"`, `"multiply"`,
/// `"divide"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentRecord {
    pub parent1: String,
    pub parent2: String,
    pub operation: Operation,
}

/// The serialized form of a single node.
///
/// `parents` holds zero entries for a leaf and exactly one for a derived
/// node; the inline capacity covers both without a heap allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub name: String,
    /// `None` (JSON `null`) for derived nodes that have not been computed.
    pub value: Option<f64>,
    pub parents: SmallVec<[ParentRecord; 1]>,
}

impl Node {
    /// Flattens the node into its serialized record.
    pub fn to_record(&self) -> NodeRecord {
        NodeRecord {
            name: self.name().to_string(),
            value: self.value(),
            parents: self
                .operands()
                .map(|(left, right, op)| ParentRecord {
                    parent1: left.name().to_string(),
                    parent2: right.name().to_string(),
                    operation: op,
                })
                .into_iter()
                .collect(),
        }
    }

    /// Rebuilds a node from its record and a map of already-reconstructed
    /// operands.
    ///
    /// A leaf record (no operand entry) rebuilds a leaf with the stored name
    /// and value. A record with an operand entry is re-derived through
    /// [`Node::apply`], which regenerates the name from the operand names
    /// and leaves the value unset: a cached value does not survive the
    /// round-trip, only recomputability does.
    ///
    /// Both operand names must already be present in `node_by_name`; feeding
    /// records in dependency order is the caller's responsibility, and a
    /// missing name is reported as [`GraphError::UnknownNode`].
    pub fn from_record(
        record: &NodeRecord,
        node_by_name: &HashMap<String, Node>,
    ) -> Result<Node, GraphError> {
        match record.parents.first() {
            None => Ok(Node::from_parts(record.name.clone(), record.value, None)),
            Some(entry) => {
                let left = lookup(node_by_name, &entry.parent1)?;
                let right = lookup(node_by_name, &entry.parent2)?;
                Ok(Node::apply(entry.operation, left, right))
            }
        }
    }
}

fn lookup<'a>(
    node_by_name: &'a HashMap<String, Node>,
    name: &str,
) -> Result<&'a Node, GraphError> {
    node_by_name.get(name).ok_or_else(|| GraphError::UnknownNode {
        name: name.to_string(),
    })
}
