//! Trainlink: link training pipelines to deployable inference pipelines
//!
//! Trainlink sits between a pipeline-orchestration framework and a
//! model-tracking store. A training pipeline is declared together with a
//! companion inference pipeline; once training has run, the trained model
//! and every artifact the inference pipeline needs are projected out of
//! the data catalog and bundled into one deployable package for the
//! tracking store.
//!
//! ```
//! use trainlink::{Binding, Catalog, LinkedPipeline, Node, Pipeline};
//!
//! # fn main() -> anyhow::Result<()> {
//! let full = Pipeline::new([
//!     Node::new("preprocess", ["raw_data"], ["data"]).with_tags(["training", "inference"]),
//!     Node::new("train", ["data"], ["model"]).with_tags(["training"]),
//!     Node::new("predict", ["model", "data"], ["predictions"]).with_tags(["inference"]),
//! ])?;
//!
//! let linked = LinkedPipeline::new(
//!     full.only_nodes_with_tags(&["training"]),
//!     full.only_nodes_with_tags(&["inference"]),
//!     "raw_data",
//! )?;
//!
//! let mut catalog = Catalog::new();
//! catalog.insert("model", Binding::persisted("artifacts/model.pkl"));
//!
//! let package = linked.package(&catalog, "3.8.5")?;
//! assert_eq!(package.artifacts.get("model").unwrap().scheme(), "file");
//! # Ok(())
//! # }
//! ```

use tracing_subscriber::{fmt, EnvFilter};

pub use pipeline_graph::{Binding, Catalog, GraphError, Node, Pipeline};

pub use model_packaging::{
    normalize, EnvironmentSpec, LinkedPipeline, LocalFileResolver, LocationResolver,
    ModelPackage, ModelTracker, PackagingError, RuntimeEnvironment, DEFAULT_MODEL_NAME,
};

/// Initializes logging for applications embedding Trainlink
///
/// Respects `RUST_LOG`, defaulting to `info`. Library code never calls
/// this; it is a convenience for binaries and tests.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
