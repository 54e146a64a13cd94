//! Configuration types for Swimlane compilation.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! TOML document with [`AppConfig::from_toml_str`]. Every field is optional;
//! missing values fall back to the defaults listed on each type.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining all sections.
//! - [`LayoutConfig`] - Placement constants of the diagram layout.
//! - [`ScopeConfig`] - Which [`ScopeMode`] reference linking uses.
//! - [`ExportConfig`] - Formatting of the XML output.
//!
//! # Example
//!
//! ```
//! # use swimlane::config::AppConfig;
//! let config = AppConfig::from_toml_str(
//!     r#"
//!     [layout]
//!     node_spacing = 200.0
//!
//!     [scope]
//!     mode = "lane-local"
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.layout().node_spacing(), 200.0);
//! assert_eq!(config.layout().origin_x(), 100.0);
//! assert_eq!(config.export().indent(), 2);
//! ```

use std::{fs, path::Path};

use log::debug;
use serde::Deserialize;

use swimlane_semantic::ScopeMode;

use crate::error::SwimlaneError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Reference scoping section.
    #[serde(default)]
    scope: ScopeConfig,

    /// XML output section.
    #[serde(default)]
    export: ExportConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(layout: LayoutConfig, scope: ScopeConfig, export: ExportConfig) -> Self {
        Self {
            layout,
            scope,
            export,
        }
    }

    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`SwimlaneError::Config`] if the text is not valid TOML or does
    /// not match the configuration schema.
    pub fn from_toml_str(content: &str) -> Result<Self, SwimlaneError> {
        toml::from_str(content).map_err(|err| SwimlaneError::Config(err.to_string()))
    }

    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`SwimlaneError::Io`] if the file cannot be read and
    /// [`SwimlaneError::Config`] if its content is invalid.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SwimlaneError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        debug!(path:? = path; "Loaded configuration file");
        Self::from_toml_str(&content)
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the scoping configuration.
    pub fn scope(&self) -> &ScopeConfig {
        &self.scope
    }

    /// Returns the export configuration.
    pub fn export(&self) -> &ExportConfig {
        &self.export
    }
}

/// Placement constants for the diagram layout.
///
/// Nodes of one process are placed left to right on a single row. Rows are
/// stacked top to bottom, one per process, in compilation order.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Left edge of the first node in every row. Default `100`.
    origin_x: f32,

    /// Distance between the left edges of consecutive nodes. Default `180`.
    node_spacing: f32,

    /// Top edge of the first row. Default `80`.
    origin_y: f32,

    /// Distance between the top edges of consecutive rows. Default `220`.
    row_spacing: f32,

    /// Padding between a pool's border and its nodes. Default `40`.
    pool_padding: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            origin_x: 100.0,
            node_spacing: 180.0,
            origin_y: 80.0,
            row_spacing: 220.0,
            pool_padding: 40.0,
        }
    }
}

impl LayoutConfig {
    pub fn origin_x(&self) -> f32 {
        self.origin_x
    }

    pub fn node_spacing(&self) -> f32 {
        self.node_spacing
    }

    pub fn origin_y(&self) -> f32 {
        self.origin_y
    }

    pub fn row_spacing(&self) -> f32 {
        self.row_spacing
    }

    pub fn pool_padding(&self) -> f32 {
        self.pool_padding
    }

    /// Returns a copy with a different horizontal node spacing.
    pub fn with_node_spacing(mut self, node_spacing: f32) -> Self {
        self.node_spacing = node_spacing;
        self
    }

    /// Returns a copy with a different row spacing.
    pub fn with_row_spacing(mut self, row_spacing: f32) -> Self {
        self.row_spacing = row_spacing;
        self
    }
}

/// Reference scoping configuration.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ScopeConfig {
    /// Default [`ScopeMode::PoolWide`].
    #[serde(default)]
    mode: ScopeMode,
}

impl ScopeConfig {
    pub fn new(mode: ScopeMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ScopeMode {
        self.mode
    }
}

/// Formatting of the generated XML document.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Spaces per nesting level. `0` writes the document on one line.
    indent: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

impl ExportConfig {
    pub fn new(indent: usize) -> Self {
        Self { indent }
    }

    pub fn indent(&self) -> usize {
        self.indent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.layout().origin_x(), 100.0);
        assert_eq!(config.layout().node_spacing(), 180.0);
        assert_eq!(config.layout().origin_y(), 80.0);
        assert_eq!(config.layout().row_spacing(), 220.0);
        assert_eq!(config.layout().pool_padding(), 40.0);
        assert_eq!(config.scope().mode(), ScopeMode::PoolWide);
        assert_eq!(config.export().indent(), 2);
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(*config.layout(), LayoutConfig::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = AppConfig::from_toml_str(
            r#"
            [layout]
            row_spacing = 300.0

            [export]
            indent = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.layout().row_spacing(), 300.0);
        assert_eq!(config.layout().node_spacing(), 180.0);
        assert_eq!(config.export().indent(), 4);
        assert_eq!(config.scope().mode(), ScopeMode::PoolWide);
    }

    #[test]
    fn test_lane_local_mode() {
        let config = AppConfig::from_toml_str("[scope]\nmode = \"lane-local\"").unwrap();
        assert_eq!(config.scope().mode(), ScopeMode::LaneLocal);
    }

    #[test]
    fn test_missing_file() {
        let err = AppConfig::from_file("no/such/swimlane.toml").unwrap_err();
        assert!(matches!(err, SwimlaneError::Io(_)));
    }

    #[test]
    fn test_invalid_document() {
        let err = AppConfig::from_toml_str("[scope]\nmode = \"everywhere\"").unwrap_err();
        assert!(matches!(err, SwimlaneError::Config(_)));

        let err = AppConfig::from_toml_str("[layout\n").unwrap_err();
        assert!(err.to_string().starts_with("configuration error:"));
    }
}
