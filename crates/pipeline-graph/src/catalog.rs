//! Dataset catalog: names bound to storage locations
//!
//! The catalog maps dataset names to bindings. A binding is either a
//! volatile in-memory placeholder or a durable location (local file or
//! already-resolved remote URI). The catalog is owned by the caller;
//! consumers of this crate only read it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

/// Storage binding for a single dataset name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Binding {
    /// Volatile placeholder held only in memory for the current session
    Memory,

    /// Durable binding backed by a local file path
    Persisted {
        /// Location of the dataset on the local filesystem
        path: PathBuf,
    },

    /// Durable binding that already carries a resolved URI
    Remote {
        /// Absolute, scheme-qualified location of the dataset
        uri: Url,
    },
}

impl Binding {
    /// Creates a durable binding for a local file path
    pub fn persisted<P: Into<PathBuf>>(path: P) -> Self {
        Binding::Persisted { path: path.into() }
    }

    /// Creates a durable binding for an already-resolved URI
    pub fn remote(uri: Url) -> Self {
        Binding::Remote { uri }
    }

    /// Returns true if the binding lives only in memory
    pub fn is_volatile(&self) -> bool {
        matches!(self, Binding::Memory)
    }

    /// Returns the local path of a persisted binding, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            Binding::Persisted { path } => Some(path),
            _ => None,
        }
    }
}

/// Mapping from dataset names to storage bindings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    bindings: BTreeMap<String, Binding>,
}

impl Catalog {
    /// Creates an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a binding
    pub fn insert<N: Into<String>>(&mut self, name: N, binding: Binding) {
        self.bindings.insert(name.into(), binding);
    }

    /// Looks up a binding by dataset name
    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    /// Returns true if the catalog contains the given name
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Iterates over all bindings in name order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Binding)> {
        self.bindings.iter()
    }

    /// Returns the number of bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns true if the catalog holds no bindings
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl FromIterator<(String, Binding)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (String, Binding)>>(iter: I) -> Self {
        Self {
            bindings: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_and_looks_up_bindings() {
        let mut catalog = Catalog::new();
        catalog.insert("model", Binding::persisted("/tmp/model.bin"));
        catalog.insert("scratch", Binding::Memory);

        assert!(catalog.contains("model"));
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.get("model").and_then(Binding::path),
            Some(Path::new("/tmp/model.bin"))
        );
        assert!(catalog.get("scratch").unwrap().is_volatile());
        assert!(catalog.get("missing").is_none());
    }

    #[test]
    fn remote_bindings_keep_their_uri() {
        let uri = Url::parse("s3://bucket/encoder.pkl").unwrap();
        let binding = Binding::remote(uri.clone());

        assert!(!binding.is_volatile());
        assert_eq!(binding.path(), None);
        match binding {
            Binding::Remote { uri: stored } => assert_eq!(stored, uri),
            _ => panic!("expected remote binding"),
        }
    }
}
