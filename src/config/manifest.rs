//! Middleware manifest.
//!
//! Maps the names used in route lines to middleware artifact filenames. The
//! file is written by the scaffolding tool and is read-only here:
//!
//! ```toml
//! [middlewares]
//! timestamp = "timestamp.rs"
//! requireJson = "require_json.rs"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::loader::ConfigError;

/// Reference name → artifact filename.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct MiddlewareManifest {
    #[serde(default)]
    middlewares: BTreeMap<String, String>,
}

impl MiddlewareManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a mapping.
    pub fn with(mut self, name: impl Into<String>, file: impl Into<String>) -> Self {
        self.middlewares.insert(name.into(), file.into());
        self
    }

    /// Artifact filename mapped to `name`.
    pub fn file_for(&self, name: &str) -> Option<&str> {
        self.middlewares.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }
}

/// Read a manifest from a TOML file.
pub fn load_manifest(path: &Path) -> Result<MiddlewareManifest, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let manifest = toml::from_str(&content)?;
    Ok(manifest)
}
