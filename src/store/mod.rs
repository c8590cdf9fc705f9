//! The flat, name-referencing serialized form of a graph.
//!
//! Records reference their operands by name only. Rebuilding a node
//! therefore requires a map of already-reconstructed nodes, and a
//! whole-graph document keeps its records in dependency order so that map
//! can be grown front to back.

pub mod document;
pub mod record;

pub use document::GraphDocument;
pub use record::{NodeRecord, ParentRecord};

pub use self::error::GraphError;
mod error {
    use thiserror::Error;

    /// Failures while rebuilding nodes from their serialized form.
    ///
    /// Evaluation itself is total and never fails; errors only arise at the
    /// serialization boundary.
    #[derive(Error, Debug, Clone, PartialEq)]
    pub enum GraphError {
        #[error("Record references unknown node '{name}'")]
        UnknownNode { name: String },
        #[error("Duplicate node name '{name}' in document")]
        DuplicateNode { name: String },
    }
}
