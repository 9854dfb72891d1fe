//! Error types for rakit-scene.

use thiserror::Error;

/// Result type for scene graph operations.
pub type Result<T> = std::result::Result<T, SceneError>;

/// Errors from structural scene graph edits.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    /// No node with this index.
    #[error("node {index} not found")]
    NodeNotFound { index: usize },

    /// The new parent lies inside the subtree being moved.
    #[error("cannot attach node {child} under its own descendant {parent}")]
    Cycle { child: usize, parent: usize },

    /// The parent's world transform cannot be inverted (zero scale).
    #[error("world transform of node {index} is not invertible")]
    SingularTransform { index: usize },
}
