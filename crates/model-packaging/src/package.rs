//! The deployable unit handed to the model-tracking store
//!
//! After a training run, everything the inference pipeline needs is
//! bundled into one [`ModelPackage`]: the inference graph itself, the
//! resolved artifact locations, the normalized runtime environment and
//! the label to store the package under. Serializing and uploading the
//! package is the tracking collaborator's job, reached through the
//! [`ModelTracker`] seam.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::info;
use url::Url;

use pipeline_graph::{Catalog, Pipeline};

use crate::environment::{normalize, RuntimeEnvironment};
use crate::error::Result;
use crate::linkage::LinkedPipeline;

/// Everything needed to store a deployable inference pipeline
#[derive(Debug, Clone, Serialize)]
pub struct ModelPackage {
    /// Label under which the package is stored
    pub model_name: String,

    /// The inference pipeline to deploy
    pub inference: Pipeline,

    /// Resolved artifact locations, keyed by dataset name
    pub artifacts: BTreeMap<String, Url>,

    /// Normalized runtime environment for the deployment target
    pub environment: RuntimeEnvironment,
}

/// Destination for finished model packages
///
/// Implemented by the tracking-store collaborator. Taking the run context
/// through `self` keeps this crate free of ambient run state.
pub trait ModelTracker {
    /// Stores a model package in the tracking store
    fn log_model(&self, package: &ModelPackage) -> Result<()>;
}

impl LinkedPipeline {
    /// Assembles the model package for this linkage
    ///
    /// Projects the catalog onto the inference inputs and normalizes the
    /// runtime environment in one step. `target_python` is the interpreter
    /// version recorded when the environment spec does not carry one.
    pub fn package(&self, catalog: &Catalog, target_python: &str) -> Result<ModelPackage> {
        let artifacts = self.extract_artifacts(catalog)?;
        let environment = normalize(self.env_spec(), target_python)?;

        info!(
            model_name = %self.model_name(),
            artifacts = artifacts.len(),
            "assembled model package"
        );

        Ok(ModelPackage {
            model_name: self.model_name().to_string(),
            inference: self.inference().clone(),
            artifacts,
            environment,
        })
    }
}
