//! Projecting the catalog onto the inference pipeline
//!
//! Packaging a linked pipeline needs exactly the catalog entries the
//! inference pipeline consumes. The projection extracts that subset and
//! resolves each durable binding to an absolute, scheme-qualified URI.
//! The prediction-time input is the one exception: it may be unbound at
//! packaging time and is never part of the artifact set.

use std::collections::BTreeMap;

use tracing::debug;
use url::Url;

use pipeline_graph::{Binding, Catalog};

use crate::error::{PackagingError, Result};
use crate::linkage::LinkedPipeline;

/// Strategy turning a durable binding into an absolute URI
///
/// The default [`LocalFileResolver`] assumes bindings point at the local
/// filesystem. Stores that keep artifacts elsewhere (object stores,
/// artifact servers) plug in their own resolver.
pub trait LocationResolver {
    /// Resolves a durable binding to an absolute, scheme-qualified URI
    fn resolve(&self, name: &str, binding: &Binding) -> Result<Url>;
}

/// Resolves persisted bindings against the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileResolver;

impl LocationResolver for LocalFileResolver {
    fn resolve(&self, name: &str, binding: &Binding) -> Result<Url> {
        match binding {
            Binding::Persisted { path } => {
                let absolute = std::path::absolute(path)?;
                Url::from_file_path(&absolute).map_err(|_| PackagingError::LocationResolution {
                    name: name.to_string(),
                    reason: format!(
                        "path '{}' cannot be expressed as a file URI",
                        absolute.display()
                    ),
                })
            }
            Binding::Remote { uri } => Ok(uri.clone()),
            Binding::Memory => Err(PackagingError::VolatileBinding {
                name: name.to_string(),
            }),
        }
    }
}

impl LinkedPipeline {
    /// Extracts the sub-catalog the inference pipeline needs
    ///
    /// The prediction-time input is bound to whatever the catalog holds,
    /// or to a fresh in-memory placeholder when absent. Every other
    /// inference input must be present and durable. The caller's catalog
    /// is never mutated.
    pub fn extract_inference_catalog(&self, catalog: &Catalog) -> Result<Catalog> {
        let mut sub_catalog = Catalog::new();
        for name in self.inference().inputs() {
            if name == self.input_name() {
                // The prediction input need not be persisted before packaging.
                let binding = catalog.get(&name).cloned().unwrap_or(Binding::Memory);
                sub_catalog.insert(name, binding);
                continue;
            }
            match catalog.get(&name) {
                None => return Err(PackagingError::MissingCatalogEntry { name }),
                Some(binding) if binding.is_volatile() => {
                    return Err(PackagingError::VolatileBinding { name })
                }
                Some(binding) => sub_catalog.insert(name, binding.clone()),
            }
        }

        debug!(entries = sub_catalog.len(), "extracted inference sub-catalog");
        Ok(sub_catalog)
    }

    /// Resolves the artifact bindings of the inference pipeline
    ///
    /// Returns `name -> absolute URI` for every inference input except the
    /// prediction-time one, using the local-filesystem resolver.
    pub fn extract_artifacts(&self, catalog: &Catalog) -> Result<BTreeMap<String, Url>> {
        self.extract_artifacts_with(catalog, &LocalFileResolver)
    }

    /// Resolves the artifact bindings with a custom location resolver
    pub fn extract_artifacts_with(
        &self,
        catalog: &Catalog,
        resolver: &dyn LocationResolver,
    ) -> Result<BTreeMap<String, Url>> {
        let sub_catalog = self.extract_inference_catalog(catalog)?;
        let mut artifacts = BTreeMap::new();
        for (name, binding) in sub_catalog.iter() {
            if name == self.input_name() {
                continue;
            }
            artifacts.insert(name.clone(), resolver.resolve(name, binding)?);
        }

        debug!(count = artifacts.len(), "resolved inference artifacts");
        Ok(artifacts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pipeline_graph::{Node, Pipeline};

    fn dummy_linked() -> LinkedPipeline {
        let full = Pipeline::new([
            Node::new("preprocess", ["raw_data"], ["data"])
                .with_tags(["training", "inference"]),
            Node::new("train", ["data"], ["model"]).with_tags(["training"]),
            Node::new("predict", ["model", "data"], ["predictions"]).with_tags(["inference"]),
        ])
        .unwrap();
        LinkedPipeline::new(
            full.only_nodes_with_tags(&["training"]),
            full.only_nodes_with_tags(&["inference"]),
            "raw_data",
        )
        .unwrap()
    }

    fn dummy_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.insert("raw_data", Binding::Memory);
        catalog.insert("data", Binding::Memory);
        catalog.insert("model", Binding::persisted("artifacts/model.pkl"));
        catalog
    }

    #[test]
    fn projection_contains_exactly_the_inference_inputs() {
        let linked = dummy_linked();
        let sub_catalog = linked.extract_inference_catalog(&dummy_catalog()).unwrap();

        // "data" is produced inside the inference pipeline, so it is not
        // part of the projection even though the catalog binds it.
        assert_eq!(sub_catalog.len(), 2);
        assert!(sub_catalog.contains("raw_data"));
        assert!(sub_catalog.contains("model"));
    }

    #[test]
    fn unbound_prediction_input_gets_a_placeholder() {
        let linked = dummy_linked();
        let mut catalog = Catalog::new();
        catalog.insert("data", Binding::Memory);
        catalog.insert("model", Binding::persisted("artifacts/model.pkl"));

        let sub_catalog = linked.extract_inference_catalog(&catalog).unwrap();
        assert!(sub_catalog.get("raw_data").unwrap().is_volatile());
    }

    #[test]
    fn missing_artifact_binding_fails() {
        let linked = dummy_linked();
        let mut catalog = Catalog::new();
        catalog.insert("raw_data", Binding::Memory);

        let err = linked.extract_inference_catalog(&catalog).unwrap_err();
        match err {
            PackagingError::MissingCatalogEntry { name } => assert_eq!(name, "model"),
            other => panic!("expected MissingCatalogEntry, got {other}"),
        }
    }

    #[test]
    fn volatile_artifact_binding_fails() {
        let linked = dummy_linked();
        let mut catalog = dummy_catalog();
        catalog.insert("model", Binding::Memory);

        let err = linked.extract_inference_catalog(&catalog).unwrap_err();
        match err {
            PackagingError::VolatileBinding { name } => assert_eq!(name, "model"),
            other => panic!("expected VolatileBinding, got {other}"),
        }
    }

    #[test]
    fn artifacts_are_absolute_uris_without_the_prediction_input() {
        let linked = dummy_linked();
        let artifacts = linked.extract_artifacts(&dummy_catalog()).unwrap();

        assert_eq!(artifacts.len(), 1);
        assert!(!artifacts.contains_key("raw_data"));

        let uri = artifacts.get("model").unwrap();
        assert_eq!(uri.scheme(), "file");
        assert!(uri.path().ends_with("/artifacts/model.pkl"));
        // A file URI always round-trips to an absolute path.
        assert!(uri.to_file_path().unwrap().is_absolute());
    }

    #[test]
    fn remote_bindings_pass_through_unchanged() {
        let linked = dummy_linked();
        let mut catalog = dummy_catalog();
        let uri = Url::parse("s3://bucket/run-42/model.pkl").unwrap();
        catalog.insert("model", Binding::remote(uri.clone()));

        let artifacts = linked.extract_artifacts(&catalog).unwrap();
        assert_eq!(artifacts.get("model"), Some(&uri));
    }

    #[test]
    fn custom_resolver_controls_the_location_scheme() {
        struct RunStoreResolver;

        impl LocationResolver for RunStoreResolver {
            fn resolve(&self, name: &str, _binding: &Binding) -> Result<Url> {
                Url::parse(&format!("mlruns://current/{name}")).map_err(|e| {
                    PackagingError::LocationResolution {
                        name: name.to_string(),
                        reason: e.to_string(),
                    }
                })
            }
        }

        let linked = dummy_linked();
        let artifacts = linked
            .extract_artifacts_with(&dummy_catalog(), &RunStoreResolver)
            .unwrap();

        assert_eq!(
            artifacts.get("model").unwrap().as_str(),
            "mlruns://current/model"
        );
    }
}
