//! Defines the `Node` handle and its associated types, representing a single
//! value or derived expression in the computation graph.

use std::cell::Cell;
use std::fmt;
use std::ops;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Defines the specific calculation performed by a derived node.
///
/// The enum is closed: an operator kind outside these four cannot be
/// represented in memory, and an unrecognized operation string on the wire
/// is rejected at deserialization time rather than silently evaluating to
/// zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    /// The printable symbol used in auto-generated expression names.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Subtract => "-",
            Operation::Multiply => "*",
            Operation::Divide => "/",
        }
    }

    /// Applies the operation to two already-computed operand values.
    ///
    /// Division by zero yields `0.0` instead of raising; evaluation is
    /// total.
    pub(crate) fn eval(&self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Operation::Add => lhs + rhs,
            Operation::Subtract => lhs - rhs,
            Operation::Multiply => lhs * rhs,
            Operation::Divide => {
                if rhs == 0.0 {
                    0.0
                } else {
                    lhs / rhs
                }
            }
        }
    }
}

/// The operation record of a derived node.
///
/// Operands are shared handles to pre-existing nodes. The same operand may
/// appear under several derived nodes, so the structure is a DAG, not a
/// tree. The order is significant for subtraction and division.
#[derive(Debug, Clone)]
pub(crate) struct OpRecord {
    pub(crate) left: Node,
    pub(crate) right: Node,
    pub(crate) op: Operation,
}

#[derive(Debug)]
pub(crate) struct NodeInner {
    pub(crate) name: String,
    /// Present at construction for leaves; filled exactly once by the first
    /// `compute` on a derived node and never written again.
    pub(crate) value: Cell<Option<f64>>,
    pub(crate) op: Option<OpRecord>,
}

/// A node in the expression graph: either a leaf holding a literal value or
/// a lazily evaluated binary operation over two operand nodes.
///
/// `Node` is a cheap shared handle; cloning it aliases the same underlying
/// node. The graph is single-threaded by design, hence `Rc` rather than
/// `Arc`.
#[derive(Debug, Clone)]
pub struct Node(pub(crate) Rc<NodeInner>);

impl Node {
    /// Creates a leaf node with a concrete value and no operation record.
    pub fn leaf(name: impl Into<String>, value: f64) -> Self {
        Self::from_parts(name.into(), Some(value), None)
    }

    /// Creates a derived node applying `op` to two existing nodes.
    ///
    /// The name is auto-generated as `(<left> <symbol> <right>)`; the value
    /// stays unset until the first call to [`compute`](Self::compute).
    pub fn apply(op: Operation, left: &Node, right: &Node) -> Self {
        let name = format!("({} {} {})", left.name(), op.symbol(), right.name());
        let record = OpRecord {
            left: left.clone(),
            right: right.clone(),
            op,
        };
        Self::from_parts(name, None, Some(record))
    }

    pub(crate) fn from_parts(name: String, value: Option<f64>, op: Option<OpRecord>) -> Self {
        Node(Rc::new(NodeInner {
            name,
            value: Cell::new(value),
            op,
        }))
    }

    /// The node's identifier: user-supplied for leaves, the generated
    /// expression string for derived nodes.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// The cached value, if the node is a leaf or has already been computed.
    pub fn value(&self) -> Option<f64> {
        self.0.value.get()
    }

    /// Whether the node carries no operation record.
    pub fn is_leaf(&self) -> bool {
        self.0.op.is_none()
    }

    /// The operand handles and operator of a derived node.
    pub fn operands(&self) -> Option<(&Node, &Node, Operation)> {
        self.0.op.as_ref().map(|rec| (&rec.left, &rec.right, rec.op))
    }

    /// Evaluates the node, memoizing the result.
    ///
    /// A cached value (leaf, or previously computed node) is returned in
    /// O(1) without revisiting operands. Otherwise the operands are computed
    /// recursively and the operator applied; recursion depth equals graph
    /// depth, and cycles cannot be built through the public constructors.
    ///
    /// Evaluation is total: division by zero yields `0.0`, and a
    /// deserialized node with neither value nor operation record evaluates
    /// to `0.0`. The result is cached before returning.
    pub fn compute(&self) -> f64 {
        if let Some(cached) = self.0.value.get() {
            return cached;
        }
        let value = match &self.0.op {
            Some(rec) => rec.op.eval(rec.left.compute(), rec.right.compute()),
            None => 0.0,
        };
        self.0.value.set(Some(value));
        value
    }

    /// Stable identity key, used to deduplicate shared sub-DAGs.
    pub(crate) fn key(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Operator sugar: `&a + &b` builds the same node as
// `Node::apply(Operation::Add, &a, &b)`. Applying an operator to anything
// that is not a `Node` is a compile-time type error.
macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $op:expr) => {
        impl ops::$trait for &Node {
            type Output = Node;

            fn $method(self, rhs: &Node) -> Node {
                Node::apply($op, self, rhs)
            }
        }

        impl ops::$trait for Node {
            type Output = Node;

            fn $method(self, rhs: Node) -> Node {
                Node::apply($op, &self, &rhs)
            }
        }
    };
}

impl_binary_op!(Add, add, Operation::Add);
impl_binary_op!(Sub, sub, Operation::Subtract);
impl_binary_op!(Mul, mul, Operation::Multiply);
impl_binary_op!(Div, div, Operation::Divide);
