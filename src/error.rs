//! Error types for dualtape

use thiserror::Error;

use crate::node::NodeId;
use crate::tape::TapeState;

/// Result type alias using dualtape's [`GraphError`]
pub type Result<T> = std::result::Result<T, GraphError>;

/// Misuse of a reverse-mode tape that would otherwise yield a silently wrong
/// gradient.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphError {
    /// A sweep was requested before any adjoint was seeded
    #[error("cannot evaluate: no adjoint has been seeded since the last reset")]
    NotSeeded,

    /// The tape was already swept; adjoints must be reset first
    #[error("tape already evaluated; call reset() before seeding or evaluating again")]
    AlreadyEvaluated,

    /// A gradient was read before the tape was swept
    #[error("gradient requested while tape is {state:?}; run evaluate() first")]
    NotEvaluated {
        /// Tape state at the time of the read
        state: TapeState,
    },

    /// A seeded node is not part of the graph the sweep starts from
    #[error("seeded node {node} is not reachable from root {root}; reset() and seed within the root's graph")]
    UnreachableSeed {
        /// The seeded node
        node: NodeId,
        /// Root of the requested sweep
        root: NodeId,
    },

    /// A node id was issued by a different tape
    #[error("node {node} belongs to a different tape")]
    ForeignNode {
        /// The offending id
        node: NodeId,
    },
}
