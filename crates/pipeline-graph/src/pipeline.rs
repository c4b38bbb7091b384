//! Immutable pipelines and their graph algebra
//!
//! A pipeline is a validated set of nodes. Edges are implicit: node B
//! depends on node A when one of B's inputs is one of A's outputs. All
//! subsetting operations return a new pipeline and never mutate the
//! original.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};
use crate::node::Node;

/// An immutable directed graph of processing steps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    nodes: Vec<Node>,
}

impl Pipeline {
    /// Creates a pipeline from the given nodes
    ///
    /// Fails when two nodes share a name or when the same output is
    /// produced by more than one node.
    pub fn new<I>(nodes: I) -> Result<Self>
    where
        I: IntoIterator<Item = Node>,
    {
        let nodes: Vec<Node> = nodes.into_iter().collect();

        let mut names: BTreeSet<&str> = BTreeSet::new();
        let mut producers: BTreeMap<&str, &str> = BTreeMap::new();
        for node in &nodes {
            if !names.insert(node.name()) {
                return Err(GraphError::DuplicateNode(node.name().to_string()));
            }
            for output in node.outputs() {
                if let Some(first) = producers.insert(output.as_str(), node.name()) {
                    return Err(GraphError::DuplicateOutput {
                        output: output.clone(),
                        first: first.to_string(),
                        second: node.name().to_string(),
                    });
                }
            }
        }

        Ok(Self { nodes })
    }

    /// Returns the nodes of the pipeline in insertion order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Returns the number of nodes in the pipeline
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the pipeline has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the names of all nodes in the pipeline
    pub fn node_names(&self) -> BTreeSet<String> {
        self.nodes.iter().map(|n| n.name().to_string()).collect()
    }

    /// Returns the external inputs of the pipeline
    ///
    /// An external input is consumed by some node but produced by none.
    pub fn inputs(&self) -> BTreeSet<String> {
        let outputs = self.all_outputs();
        self.nodes
            .iter()
            .flat_map(|n| n.inputs().iter())
            .filter(|name| !outputs.contains(*name))
            .cloned()
            .collect()
    }

    /// Returns every output produced by any node of the pipeline
    pub fn all_outputs(&self) -> BTreeSet<String> {
        self.nodes
            .iter()
            .flat_map(|n| n.outputs().iter())
            .cloned()
            .collect()
    }

    /// Returns the subset of nodes carrying at least one of the given tags
    pub fn only_nodes_with_tags(&self, tags: &[&str]) -> Pipeline {
        let nodes = self
            .nodes
            .iter()
            .filter(|n| tags.iter().any(|t| n.has_tag(t)))
            .cloned()
            .collect();
        // A subset of a validated pipeline cannot introduce duplicates.
        Self { nodes }
    }

    /// Returns the named nodes plus everything downstream of them
    pub fn from_nodes(&self, names: &[&str]) -> Result<Pipeline> {
        let seed = self.indexes_of(names)?;
        Ok(self.downstream_closure(seed))
    }

    /// Returns the named nodes plus everything upstream of them
    pub fn to_nodes(&self, names: &[&str]) -> Result<Pipeline> {
        let seed = self.indexes_of(names)?;
        Ok(self.upstream_closure(seed))
    }

    /// Returns every node depending directly or transitively on the given inputs
    pub fn from_inputs(&self, inputs: &[&str]) -> Result<Pipeline> {
        let mut seed = BTreeSet::new();
        for input in inputs {
            let consumers: Vec<usize> = self
                .nodes
                .iter()
                .enumerate()
                .filter(|(_, n)| n.inputs().contains(*input))
                .map(|(idx, _)| idx)
                .collect();
            if consumers.is_empty() {
                return Err(GraphError::UnknownInput(input.to_string()));
            }
            seed.extend(consumers);
        }
        Ok(self.downstream_closure(seed))
    }

    /// Returns the nodes present (by name) in both pipelines
    pub fn intersection(&self, other: &Pipeline) -> Pipeline {
        let other_names = other.node_names();
        let nodes = self
            .nodes
            .iter()
            .filter(|n| other_names.contains(n.name()))
            .cloned()
            .collect();
        Self { nodes }
    }

    /// Returns the node-set union of two pipelines
    ///
    /// Nodes appearing in both pipelines must be identical; conflicting
    /// definitions or conflicting producers fail.
    pub fn union(&self, other: &Pipeline) -> Result<Pipeline> {
        let mut merged = self.nodes.clone();
        for node in &other.nodes {
            match merged.iter().find(|n| n.name() == node.name()) {
                Some(existing) if existing == node => {}
                Some(_) => return Err(GraphError::DuplicateNode(node.name().to_string())),
                None => merged.push(node.clone()),
            }
        }
        Self::new(merged)
    }

    /// Maps node names to their indexes, failing on an unknown name
    fn indexes_of(&self, names: &[&str]) -> Result<BTreeSet<usize>> {
        let mut indexes = BTreeSet::new();
        for name in names {
            let idx = self
                .nodes
                .iter()
                .position(|n| n.name() == *name)
                .ok_or_else(|| GraphError::UnknownNode(name.to_string()))?;
            indexes.insert(idx);
        }
        Ok(indexes)
    }

    /// Grows a node selection with every node reachable through outputs
    fn downstream_closure(&self, mut selected: BTreeSet<usize>) -> Pipeline {
        loop {
            let produced: BTreeSet<&String> = selected
                .iter()
                .flat_map(|idx| self.nodes[*idx].outputs().iter())
                .collect();
            let additions: Vec<usize> = self
                .nodes
                .iter()
                .enumerate()
                .filter(|(idx, node)| {
                    !selected.contains(idx) && node.inputs().iter().any(|i| produced.contains(i))
                })
                .map(|(idx, _)| idx)
                .collect();
            if additions.is_empty() {
                break;
            }
            selected.extend(additions);
        }
        self.select(&selected)
    }

    /// Grows a node selection with every node reachable through inputs
    fn upstream_closure(&self, mut selected: BTreeSet<usize>) -> Pipeline {
        loop {
            let consumed: BTreeSet<&String> = selected
                .iter()
                .flat_map(|idx| self.nodes[*idx].inputs().iter())
                .collect();
            let additions: Vec<usize> = self
                .nodes
                .iter()
                .enumerate()
                .filter(|(idx, node)| {
                    !selected.contains(idx) && node.outputs().iter().any(|o| consumed.contains(o))
                })
                .map(|(idx, _)| idx)
                .collect();
            if additions.is_empty() {
                break;
            }
            selected.extend(additions);
        }
        self.select(&selected)
    }

    /// Builds a pipeline from a set of node indexes, preserving order
    fn select(&self, indexes: &BTreeSet<usize>) -> Pipeline {
        let nodes = indexes.iter().map(|idx| self.nodes[*idx].clone()).collect();
        Self { nodes }
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.nodes.iter().map(|n| n.name()).collect();
        write!(f, "Pipeline[{}]", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_pipeline() -> Pipeline {
        Pipeline::new([
            Node::new("preprocess", ["raw_data"], ["data"])
                .with_tags(["training", "inference"]),
            Node::new("train", ["data"], ["model"]).with_tags(["training"]),
            Node::new("predict", ["model", "data"], ["predictions"]).with_tags(["inference"]),
        ])
        .unwrap()
    }

    fn names(pipeline: &Pipeline) -> Vec<&str> {
        pipeline.nodes().iter().map(|n| n.name()).collect()
    }

    #[test]
    fn computes_external_inputs_and_outputs() {
        let pipeline = dummy_pipeline();

        assert_eq!(pipeline.inputs(), BTreeSet::from(["raw_data".to_string()]));
        assert_eq!(
            pipeline.all_outputs(),
            BTreeSet::from([
                "data".to_string(),
                "model".to_string(),
                "predictions".to_string()
            ])
        );
    }

    #[test]
    fn filters_by_tag() {
        let pipeline = dummy_pipeline();

        let training = pipeline.only_nodes_with_tags(&["training"]);
        assert_eq!(names(&training), vec!["preprocess", "train"]);

        let inference = pipeline.only_nodes_with_tags(&["inference"]);
        assert_eq!(names(&inference), vec!["preprocess", "predict"]);
    }

    #[test]
    fn from_nodes_takes_downstream_closure() {
        let pipeline = dummy_pipeline();

        let all = pipeline.from_nodes(&["preprocess"]).unwrap();
        assert_eq!(names(&all), vec!["preprocess", "train", "predict"]);

        let tail = pipeline.from_nodes(&["train"]).unwrap();
        assert_eq!(names(&tail), vec!["train", "predict"]);
    }

    #[test]
    fn to_nodes_takes_upstream_closure() {
        let pipeline = dummy_pipeline();

        let head = pipeline.to_nodes(&["train"]).unwrap();
        assert_eq!(names(&head), vec!["preprocess", "train"]);
    }

    #[test]
    fn from_inputs_follows_consumers() {
        let pipeline = dummy_pipeline();

        let tail = pipeline.from_inputs(&["data"]).unwrap();
        assert_eq!(names(&tail), vec!["train", "predict"]);
    }

    #[test]
    fn unknown_names_are_rejected() {
        let pipeline = dummy_pipeline();

        assert_eq!(
            pipeline.from_nodes(&["missing"]).unwrap_err(),
            GraphError::UnknownNode("missing".to_string())
        );
        assert_eq!(
            pipeline.from_inputs(&["missing"]).unwrap_err(),
            GraphError::UnknownInput("missing".to_string())
        );
    }

    #[test]
    fn duplicate_producers_are_rejected() {
        let result = Pipeline::new([
            Node::new("a", ["x"], ["y"]),
            Node::new("b", ["x"], ["y"]),
        ]);

        assert_eq!(
            result.unwrap_err(),
            GraphError::DuplicateOutput {
                output: "y".to_string(),
                first: "a".to_string(),
                second: "b".to_string(),
            }
        );
    }

    #[test]
    fn duplicate_node_names_are_rejected() {
        let result = Pipeline::new([
            Node::new("a", ["x"], ["y"]),
            Node::new("a", ["y"], ["z"]),
        ]);

        assert_eq!(result.unwrap_err(), GraphError::DuplicateNode("a".to_string()));
    }

    #[test]
    fn union_merges_disjoint_pipelines() {
        let left = Pipeline::new([Node::new("a", ["x"], ["y"])]).unwrap();
        let right = Pipeline::new([Node::new("b", ["y"], ["z"])]).unwrap();

        let merged = left.union(&right).unwrap();
        assert_eq!(names(&merged), vec!["a", "b"]);
        assert_eq!(merged.inputs(), BTreeSet::from(["x".to_string()]));
    }

    #[test]
    fn union_rejects_conflicting_nodes() {
        let left = Pipeline::new([Node::new("a", ["x"], ["y"])]).unwrap();
        let right = Pipeline::new([Node::new("a", ["x"], ["z"])]).unwrap();

        assert_eq!(
            left.union(&right).unwrap_err(),
            GraphError::DuplicateNode("a".to_string())
        );
    }

    #[test]
    fn intersection_keeps_shared_nodes() {
        let pipeline = dummy_pipeline();
        let filter = pipeline.only_nodes_with_tags(&["training"]);

        let shared = pipeline.intersection(&filter);
        assert_eq!(names(&shared), vec!["preprocess", "train"]);
    }
}
