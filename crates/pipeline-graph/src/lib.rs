//! Processing-graph primitives for Trainlink
//!
//! This crate provides the pipeline abstraction used throughout Trainlink:
//! nodes with named inputs and outputs, pipelines as immutable node sets
//! with graph-algebra operations, and the data catalog that binds dataset
//! names to storage locations.

pub mod catalog;
pub mod error;
pub mod node;
pub mod pipeline;

// Re-export commonly used types
pub use catalog::{Binding, Catalog};
pub use error::{GraphError, Result};
pub use node::Node;
pub use pipeline::Pipeline;
