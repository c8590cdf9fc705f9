//! A minimal lazy, memoizing expression graph.
//!
//! Nodes hold either a literal value or a binary operation over two operand
//! nodes. Values are computed on demand and cached; a graph can be
//! flattened to a name-referencing record form and rebuilt from it.
//!
//! ```
//! use exprgraph::Node;
//!
//! let a = Node::leaf("a", 2.0);
//! let b = Node::leaf("b", 3.0);
//! let c = Node::leaf("c", 4.0);
//!
//! let result = &a + &(&b * &c);
//! assert_eq!(result.name(), "(a + (b * c))");
//! assert_eq!(result.compute(), 14.0);
//! ```

pub mod display;
pub mod graph;
pub mod store;

pub use display::trace::format_trace;
pub use graph::{Node, Operation};
pub use store::{GraphDocument, GraphError, NodeRecord, ParentRecord};
