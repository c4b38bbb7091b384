//! Error types for the model-packaging crate
//!
//! Every failure here is deterministic in the inputs: nothing is retried
//! internally, and each variant carries the names the caller needs to
//! correct the problem.

use thiserror::Error;

use pipeline_graph::GraphError;

/// Result type for model-packaging operations
pub type Result<T> = std::result::Result<T, PackagingError>;

/// Error type for linkage validation, catalog projection and packaging
#[derive(Error, Debug)]
pub enum PackagingError {
    /// The declared prediction input is not an input of the inference pipeline
    #[error(
        "input_name '{input_name}' is not an input of the inference pipeline; valid choices are: {}",
        .allowed.join(", ")
    )]
    InvalidInputName {
        input_name: String,
        allowed: Vec<String>,
    },

    /// Inference inputs remain that neither the prediction input nor the
    /// training outputs cover
    #[error(
        "the inference pipeline has unresolved free inputs: {}; every inference input except the prediction input must be an output of the training pipeline",
        .free_inputs.join(", ")
    )]
    FreeInputsRemain { free_inputs: Vec<String> },

    /// A dataset required by the inference pipeline is absent from the catalog
    #[error("the catalog has no entry for '{name}', which is an input of the inference pipeline")]
    MissingCatalogEntry { name: String },

    /// A dataset required by the inference pipeline is only held in memory
    #[error(
        "catalog entry '{name}' is only held in memory; datasets consumed by the inference pipeline must be persisted so they can be packaged"
    )]
    VolatileBinding { name: String },

    /// The runtime environment specification is malformed
    #[error("invalid environment spec: {reason}")]
    InvalidEnvironmentSpec { reason: String },

    /// An algebraic operation that cannot yield one well-defined linked
    /// pipeline was requested
    #[error(
        "'{op}' is not supported on a linked pipeline; transform the training pipeline directly and link it again"
    )]
    UnsupportedLinkageOperation { op: &'static str },

    /// A durable binding could not be expressed as an absolute URI
    #[error("cannot resolve '{name}' to an absolute URI: {reason}")]
    LocationResolution { name: String, reason: String },

    /// Graph construction or subsetting failed
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Reading an environment spec file failed
    #[error("failed to read environment spec file: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing an environment spec failed
    #[error("failed to parse environment spec: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl PackagingError {
    /// Returns true if the error reports an invalid or unresolved input name
    pub fn is_input_name(&self) -> bool {
        matches!(
            self,
            PackagingError::InvalidInputName { .. } | PackagingError::FreeInputsRemain { .. }
        )
    }

    /// Returns true if the error reports an unsupported linkage operation
    pub fn is_unsupported_operation(&self) -> bool {
        matches!(self, PackagingError::UnsupportedLinkageOperation { .. })
    }
}
