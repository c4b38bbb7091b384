//! Linking a training pipeline to its deployable inference pipeline
//!
//! A [`LinkedPipeline`] pairs a training pipeline with the inference
//! pipeline that will be packaged once training has run. Construction
//! validates that the two graphs fit together: apart from the one input
//! supplied fresh at prediction time, every inference input must be an
//! output of the training pipeline. A linked pipeline never exists in an
//! invalid state; every structural transformation rebuilds and re-runs
//! the same validation.

use tracing::debug;

use pipeline_graph::{Node, Pipeline};

use crate::environment::EnvironmentSpec;
use crate::error::{PackagingError, Result};

/// Default folder name for the packaged model in the tracking store
pub const DEFAULT_MODEL_NAME: &str = "model";

/// A training pipeline linked to the inference pipeline it trains for
#[derive(Debug, Clone)]
pub struct LinkedPipeline {
    /// The pipeline whose outputs are the fitted model and co-artifacts
    training: Pipeline,

    /// The pipeline packaged and deployed after training
    inference: Pipeline,

    /// The one inference input supplied fresh at prediction time
    input_name: String,

    /// Runtime dependency environment for the deployed inference pipeline
    env_spec: EnvironmentSpec,

    /// Label under which the packaged artifact is stored
    model_name: String,
}

impl LinkedPipeline {
    /// Links a training pipeline to an inference pipeline
    ///
    /// Uses a default runtime environment and stores the package under
    /// [`DEFAULT_MODEL_NAME`]. Fails when `input_name` is not an inference
    /// input or when the inference pipeline has free inputs the training
    /// pipeline does not produce.
    pub fn new<S: Into<String>>(
        training: Pipeline,
        inference: Pipeline,
        input_name: S,
    ) -> Result<Self> {
        Self::with_options(
            training,
            inference,
            input_name,
            EnvironmentSpec::Default,
            DEFAULT_MODEL_NAME,
        )
    }

    /// Links a training pipeline to an inference pipeline with an explicit
    /// environment spec and model name
    pub fn with_options<S, M>(
        training: Pipeline,
        inference: Pipeline,
        input_name: S,
        env_spec: EnvironmentSpec,
        model_name: M,
    ) -> Result<Self>
    where
        S: Into<String>,
        M: Into<String>,
    {
        let input_name = input_name.into();
        let model_name = model_name.into();
        validate(&training, &inference, &input_name)?;

        debug!(
            input_name = %input_name,
            model_name = %model_name,
            training_nodes = training.len(),
            inference_nodes = inference.len(),
            "linked training and inference pipelines"
        );

        Ok(Self {
            training,
            inference,
            input_name,
            env_spec,
            model_name,
        })
    }

    /// Returns the training pipeline
    pub fn training(&self) -> &Pipeline {
        &self.training
    }

    /// Returns the nodes of the training pipeline
    pub fn nodes(&self) -> &[Node] {
        self.training.nodes()
    }

    /// Returns the inference pipeline
    pub fn inference(&self) -> &Pipeline {
        &self.inference
    }

    /// Returns the name of the prediction-time input
    pub fn input_name(&self) -> &str {
        &self.input_name
    }

    /// Returns the runtime environment spec
    pub fn env_spec(&self) -> &EnvironmentSpec {
        &self.env_spec
    }

    /// Returns the label under which the packaged model is stored
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Keeps only training nodes carrying at least one of the given tags
    pub fn only_nodes_with_tags(&self, tags: &[&str]) -> Result<Self> {
        self.rebuild(self.training.only_nodes_with_tags(tags))
    }

    /// Keeps the named training nodes plus everything downstream
    pub fn from_nodes(&self, names: &[&str]) -> Result<Self> {
        self.rebuild(self.training.from_nodes(names)?)
    }

    /// Keeps the named training nodes plus everything upstream
    pub fn to_nodes(&self, names: &[&str]) -> Result<Self> {
        self.rebuild(self.training.to_nodes(names)?)
    }

    /// Keeps every training node depending on the given inputs
    pub fn from_inputs(&self, inputs: &[&str]) -> Result<Self> {
        self.rebuild(self.training.from_inputs(inputs)?)
    }

    /// Keeps the training nodes shared with another pipeline
    ///
    /// This is the one binary filter the host framework applies when
    /// narrowing a run to a sub-selection, so it must stay supported.
    pub fn intersection(&self, other: &Pipeline) -> Result<Self> {
        self.rebuild(self.training.intersection(other))
    }

    /// Node-set union with another pipeline is not supported
    ///
    /// The result would have no well-defined single inference target.
    pub fn union(&self, _other: &Pipeline) -> Result<Self> {
        Err(PackagingError::UnsupportedLinkageOperation { op: "union" })
    }

    /// Node-set difference with another pipeline is not supported
    pub fn difference(&self, _other: &Pipeline) -> Result<Self> {
        Err(PackagingError::UnsupportedLinkageOperation { op: "difference" })
    }

    /// Selecting nodes by their own external inputs is not supported
    pub fn only_nodes_with_inputs(&self, _inputs: &[&str]) -> Result<Self> {
        Err(PackagingError::UnsupportedLinkageOperation {
            op: "only_nodes_with_inputs",
        })
    }

    /// Truncating the training pipeline at outputs is not supported
    pub fn to_outputs(&self, _outputs: &[&str]) -> Result<Self> {
        Err(PackagingError::UnsupportedLinkageOperation { op: "to_outputs" })
    }

    /// Rebuilds the linkage around a transformed training pipeline
    ///
    /// The inference pipeline, input name, environment spec and model name
    /// are carried over unchanged; validation runs again so a transformation
    /// can never silently break the linkage.
    fn rebuild(&self, training: Pipeline) -> Result<Self> {
        Self::with_options(
            training,
            self.inference.clone(),
            self.input_name.clone(),
            self.env_spec.clone(),
            self.model_name.clone(),
        )
    }
}

/// Checks that the inference pipeline is fully fed by the training pipeline
fn validate(training: &Pipeline, inference: &Pipeline, input_name: &str) -> Result<()> {
    let allowed = inference.inputs();
    if !allowed.contains(input_name) {
        return Err(PackagingError::InvalidInputName {
            input_name: input_name.to_string(),
            allowed: allowed.into_iter().collect(),
        });
    }

    let produced = training.all_outputs();
    let free_inputs: Vec<String> = allowed
        .into_iter()
        .filter(|name| name != input_name && !produced.contains(name))
        .collect();
    if !free_inputs.is_empty() {
        return Err(PackagingError::FreeInputsRemain { free_inputs });
    }

    Ok(())
}
