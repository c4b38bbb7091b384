//! Packaging trained pipelines for a model-tracking store
//!
//! This crate links a training pipeline to the inference pipeline it
//! trains for, keeps that linkage valid across pipeline transformations,
//! and projects the data catalog onto exactly the artifacts the inference
//! pipeline needs so it can be stored as one deployable unit.

pub mod environment;
pub mod error;
pub mod linkage;
pub mod package;
pub mod projection;

// Re-export commonly used types
pub use environment::{normalize, EnvironmentSpec, RuntimeEnvironment};
pub use error::{PackagingError, Result};
pub use linkage::{LinkedPipeline, DEFAULT_MODEL_NAME};
pub use package::{ModelPackage, ModelTracker};
pub use projection::{LocalFileResolver, LocationResolver};
