//! Runtime-environment specs and their normalization
//!
//! The deployed inference pipeline carries a description of its runtime
//! dependency environment. Callers may supply it in several shapes; the
//! normalizer turns each into one canonical [`RuntimeEnvironment`]. The
//! target interpreter version is an explicit argument: this crate holds
//! no ambient run state.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PackagingError, Result};

/// How the caller describes the runtime environment
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EnvironmentSpec {
    /// No spec given; derive a minimal default for the target interpreter
    #[default]
    Default,

    /// An inline environment; must be a mapping
    Inline(serde_yaml::Value),

    /// A spec file: either a `.txt` dependency list (one requirement per
    /// line) or a `.yml`/`.yaml` environment file taken as-is
    File(PathBuf),
}

impl EnvironmentSpec {
    /// Creates a file-backed spec
    pub fn file<P: Into<PathBuf>>(path: P) -> Self {
        EnvironmentSpec::File(path.into())
    }
}

/// Canonical runtime environment for a packaged model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeEnvironment {
    /// Target interpreter version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub python: Option<String>,

    /// Package requirements, one specifier per entry
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,

    /// Any further keys of a full environment file (name, channels, ...)
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl RuntimeEnvironment {
    /// Returns the minimal environment for a target interpreter version
    pub fn minimal<S: Into<String>>(python: S) -> Self {
        Self {
            python: Some(python.into()),
            ..Self::default()
        }
    }
}

/// Normalizes an environment spec into a [`RuntimeEnvironment`]
///
/// `target_python` is the interpreter version recorded when the spec does
/// not carry one itself (the default and dependency-list forms).
pub fn normalize(spec: &EnvironmentSpec, target_python: &str) -> Result<RuntimeEnvironment> {
    match spec {
        EnvironmentSpec::Default => Ok(RuntimeEnvironment::minimal(target_python)),
        EnvironmentSpec::Inline(value) => {
            if !value.is_mapping() {
                return Err(PackagingError::InvalidEnvironmentSpec {
                    reason: "inline environment must be a mapping of environment keys".to_string(),
                });
            }
            Ok(serde_yaml::from_value(value.clone())?)
        }
        EnvironmentSpec::File(path) => {
            let extension = path
                .extension()
                .and_then(|ext| ext.to_str())
                .unwrap_or_default();
            match extension {
                "txt" => {
                    let contents = fs::read_to_string(path)?;
                    let dependencies: Vec<String> = contents
                        .lines()
                        .map(str::trim)
                        .filter(|line| !line.is_empty() && !line.starts_with('#'))
                        .map(str::to_string)
                        .collect();
                    debug!(
                        path = %path.display(),
                        count = dependencies.len(),
                        "parsed dependency list"
                    );
                    Ok(RuntimeEnvironment {
                        python: Some(target_python.to_string()),
                        dependencies,
                        extra: BTreeMap::new(),
                    })
                }
                "yml" | "yaml" => {
                    let contents = fs::read_to_string(path)?;
                    Ok(serde_yaml::from_str(&contents)?)
                }
                _ => Err(PackagingError::InvalidEnvironmentSpec {
                    reason: format!(
                        "'{}' is neither a .txt dependency list nor a .yml/.yaml environment file",
                        path.display()
                    ),
                }),
            }
        }
    }
}
