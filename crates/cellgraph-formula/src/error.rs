//! Graph query error types

use thiserror::Error;

/// Result type for graph queries
pub type GraphResult<T> = std::result::Result<T, GraphError>;

/// Errors raised by graph queries
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// Queried identifier is not a node of the graph
    #[error("Node not found: {0}")]
    NodeNotFound(String),
}
