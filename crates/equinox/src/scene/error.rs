//! Scene graph errors

use thiserror::Error;

use super::node::NodeId;

/// Errors raised by hierarchy and component edits
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// Node id is stale or belongs to another graph
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Requested parent is the child itself or one of its descendants
    #[error("Cannot parent {child:?} under {parent:?}: would create a cycle")]
    CyclicHierarchy {
        /// Node being moved
        child: NodeId,
        /// Requested parent
        parent: NodeId,
    },

    /// Node already owns a transform component
    #[error("Node {0:?} already has a transform component")]
    DuplicateTransform(NodeId),

    /// Every component id of this graph has been handed out
    #[error("Component ids exhausted")]
    ComponentIdsExhausted,
}

/// Result alias for scene operations
pub type SceneResult<T> = Result<T, SceneError>;
