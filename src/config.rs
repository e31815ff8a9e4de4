//! Configuration file support for violence-graph
//!
//! Handles parsing `.violence-graph.toml`, which can adjust how the input is
//! read and how the graph is laid out and drawn. Every setting is optional and
//! the defaults reproduce the tool's fixed behavior. The relationship and
//! frequency taxonomies are not configurable.
//!
//! ## Configuration File Format
//!
//! ```toml
//! # .violence-graph.toml
//!
//! [input]
//! delimiter = ";"
//! relationship_column = "Relação_vítima_suspeito"
//! frequency_column = "Frequência"
//!
//! [layout]
//! seed = 42
//! k = 1.3
//! iterations = 50
//!
//! [render]
//! # Node area per record
//! node_scale = 0.2
//! # Where views are written before being opened (default: <tmp>/violence-graph)
//! output_dir = "/tmp/violence-graph"
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::graph::DEFAULT_NODE_SCALE;
use crate::layout::LayoutParams;
use crate::loader::{DEFAULT_DELIMITER, DEFAULT_FREQUENCY_COLUMN, DEFAULT_RELATIONSHIP_COLUMN};

/// Errors that can occur when loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid delimiter {0:?}: must be a single ASCII character")]
    InvalidDelimiter(String),

    #[error("Invalid {key} = {value}: {expected}")]
    InvalidSetting {
        key: &'static str,
        value: f64,
        expected: &'static str,
    },
}

/// Input section
#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    #[serde(default = "default_relationship_column")]
    pub relationship_column: String,

    #[serde(default = "default_frequency_column")]
    pub frequency_column: String,
}

fn default_delimiter() -> String {
    char::from(DEFAULT_DELIMITER).to_string()
}

fn default_relationship_column() -> String {
    DEFAULT_RELATIONSHIP_COLUMN.to_string()
}

fn default_frequency_column() -> String {
    DEFAULT_FREQUENCY_COLUMN.to_string()
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            relationship_column: default_relationship_column(),
            frequency_column: default_frequency_column(),
        }
    }
}

impl InputConfig {
    /// The delimiter as the single byte the CSV reader expects
    pub fn delimiter_byte(&self) -> Result<u8, ConfigError> {
        match self.delimiter.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => Err(ConfigError::InvalidDelimiter(self.delimiter.clone())),
        }
    }
}

/// Render section
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_node_scale")]
    pub node_scale: f64,

    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

fn default_node_scale() -> f64 {
    DEFAULT_NODE_SCALE
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            node_scale: default_node_scale(),
            output_dir: None,
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct GraphConfig {
    #[serde(default)]
    pub input: InputConfig,

    #[serde(default)]
    pub layout: LayoutParams,

    #[serde(default)]
    pub render: RenderConfig,
}

impl GraphConfig {
    /// Reject settings that would produce an unusable figure
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.input.delimiter_byte()?;

        let checks = [
            ("layout.k", self.layout.k, self.layout.k > 0.0, "must be a positive number"),
            (
                "layout.threshold",
                self.layout.threshold,
                self.layout.threshold >= 0.0,
                "must be zero or positive",
            ),
            (
                "render.node_scale",
                self.render.node_scale,
                self.render.node_scale >= 0.0,
                "must be zero or positive",
            ),
        ];
        for (key, value, in_range, expected) in checks {
            if !value.is_finite() || !in_range {
                return Err(ConfigError::InvalidSetting {
                    key,
                    value,
                    expected,
                });
            }
        }
        Ok(())
    }
}

/// Load configuration for an input file or directory
///
/// Searches for `.violence-graph.toml` in the given directory and parent
/// directories. No file found means defaults.
pub fn load_config(start_path: &Path) -> Result<GraphConfig, ConfigError> {
    match find_config_file(start_path) {
        Some(path) => load_config_file(&path),
        None => Ok(GraphConfig::default()),
    }
}

/// Load a specific configuration file
pub fn load_config_file(path: &Path) -> Result<GraphConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: GraphConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Find the config file by searching up the directory tree
pub fn find_config_file(start_path: &Path) -> Option<PathBuf> {
    let config_names = [".violence-graph.toml", "violence-graph.toml"];

    let start = if start_path.is_dir() {
        start_path
    } else {
        start_path.parent()?
    };
    // A bare file name has an empty parent
    let start = if start.as_os_str().is_empty() {
        Path::new(".")
    } else {
        start
    };

    start
        .ancestors()
        .flat_map(|dir| config_names.iter().map(move |name| dir.join(name)))
        .find(|candidate| candidate.exists())
}
