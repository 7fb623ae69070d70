//! Configuration for opening a graph and its storage engine.
//!
//! A [`GraphConfig`] can be built in code or loaded from a JSON file with
//! [`GraphConfig::from_path`]. Missing fields fall back to their defaults, so
//! an empty object `{}` is a valid configuration file.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::TypedGraphError;

/// Label given to vertices created while no label is set on the context.
pub const DEFAULT_VERTEX_LABEL: &str = "VERTEX_LABEL";

/// Configuration for the SQLite storage engine.
///
/// # Default Configuration
///
/// ```rust
/// use typedgraph::SqliteConfig;
/// let config = SqliteConfig::default();
/// assert!(config.cache_size.is_none());
/// assert!(config.pragma_settings.is_empty());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SqliteConfig {
    /// Capacity of the prepared statement cache.
    ///
    /// **Default:** `None` (rusqlite's default capacity)
    pub cache_size: Option<usize>,

    /// Additional SQLite PRAGMA settings
    ///
    /// **Default:** empty
    ///
    /// Applied right after the store is opened, before the schema check.
    /// Common settings are `journal_mode = WAL` and `synchronous = NORMAL`.
    ///
    /// ```rust
    /// use typedgraph::GraphConfig;
    ///
    /// let mut cfg = GraphConfig::default();
    /// cfg.sqlite.pragma_settings.insert("journal_mode".to_string(), "WAL".to_string());
    /// cfg.sqlite.pragma_settings.insert("synchronous".to_string(), "NORMAL".to_string());
    /// ```
    pub pragma_settings: HashMap<String, String>,
}

/// Complete configuration for graph construction.
///
/// ```rust
/// use typedgraph::{GraphConfig, DEFAULT_VERTEX_LABEL};
/// let config = GraphConfig::default();
/// assert_eq!(config.default_vertex_label, DEFAULT_VERTEX_LABEL);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Label used by `add_vertex` when the context has no label set.
    ///
    /// **Default:** [`DEFAULT_VERTEX_LABEL`]
    pub default_vertex_label: String,

    /// SQLite engine options.
    pub sqlite: SqliteConfig,
}

impl GraphConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(raw: &str) -> Result<Self, TypedGraphError> {
        let config: GraphConfig =
            serde_json::from_str(raw).map_err(|e| TypedGraphError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, TypedGraphError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|e| TypedGraphError::config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), TypedGraphError> {
        if self.default_vertex_label.trim().is_empty() {
            return Err(TypedGraphError::config(
                "default_vertex_label must not be empty",
            ));
        }
        Ok(())
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            default_vertex_label: DEFAULT_VERTEX_LABEL.to_string(),
            sqlite: SqliteConfig::default(),
        }
    }
}
