//! Error types for the pipeline-graph crate

use thiserror::Error;

/// Result type for pipeline-graph operations
pub type Result<T> = std::result::Result<T, GraphError>;

/// Error type for pipeline construction and graph-algebra operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A referenced node name does not exist in the pipeline
    #[error("pipeline contains no node named '{0}'")]
    UnknownNode(String),

    /// A referenced input is not consumed by any node in the pipeline
    #[error("no node in the pipeline consumes input '{0}'")]
    UnknownInput(String),

    /// Two nodes in the same pipeline share a name
    #[error("duplicate node name '{0}'")]
    DuplicateNode(String),

    /// Two nodes in the same pipeline produce the same output
    #[error("output '{output}' is produced by both '{first}' and '{second}'")]
    DuplicateOutput {
        output: String,
        first: String,
        second: String,
    },
}
