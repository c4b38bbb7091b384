//! Processing steps with named inputs and outputs
//!
//! A node is the unit of work in a pipeline: it consumes a set of named
//! datasets and produces another. Nodes carry no executable payload here;
//! execution belongs to the host runner.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single processing step in a pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Unique name of the step within its pipeline
    name: String,

    /// Dataset names consumed by the step
    inputs: BTreeSet<String>,

    /// Dataset names produced by the step
    outputs: BTreeSet<String>,

    /// Free-form tags used for pipeline filtering
    tags: BTreeSet<String>,
}

impl Node {
    /// Creates a new node with the given name, inputs and outputs
    pub fn new<N, I, O>(name: N, inputs: I, outputs: O) -> Self
    where
        N: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        Self {
            name: name.into(),
            inputs: inputs.into_iter().map(Into::into).collect(),
            outputs: outputs.into_iter().map(Into::into).collect(),
            tags: BTreeSet::new(),
        }
    }

    /// Attaches tags to the node
    pub fn with_tags<T>(mut self, tags: T) -> Self
    where
        T: IntoIterator,
        T::Item: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Returns the node name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the dataset names consumed by the node
    pub fn inputs(&self) -> &BTreeSet<String> {
        &self.inputs
    }

    /// Returns the dataset names produced by the node
    pub fn outputs(&self) -> &BTreeSet<String> {
        &self.outputs
    }

    /// Returns the tags attached to the node
    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Returns true if the node carries the given tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inputs: Vec<&str> = self.inputs.iter().map(String::as_str).collect();
        let outputs: Vec<&str> = self.outputs.iter().map(String::as_str).collect();
        write!(
            f,
            "{}([{}]) -> [{}]",
            self.name,
            inputs.join(","),
            outputs.join(",")
        )
    }
}
