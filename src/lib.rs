//! # violence-graph - Aggressor Relationship Graph
//!
//! Reads a table of domestic-violence incident records and shows how often
//! incidents happen per victim/aggressor relationship, split into family and
//! non-family aggressors.
//!
//! ## Usage
//!
//! ```bash
//! # Read ./violencia_mulher.csv and open both views
//! violence-graph
//!
//! # Another file, with a summary table printed first
//! violence-graph --summary data/incidents.csv
//!
//! # Write the views without opening a browser
//! violence-graph --no-open
//! ```
//!
//! ## Pipeline
//!
//! 1. **Load** - semicolon-delimited table, incomplete rows dropped
//! 2. **Classify** - relationship as Family / Non-family, frequency text as
//!    Daily / Weekly / Monthly / Other
//! 3. **Aggregate** - counts per relationship and per frequency band
//! 4. **Render** - one node per relationship sized by count, every pair of
//!    same-category nodes joined, shown as a static and an interactive view

pub mod aggregate;
pub mod classifier;
pub mod config;
pub mod graph;
pub mod layout;
pub mod loader;
pub mod pipeline;
pub mod render;
pub mod report;

pub use aggregate::{Aggregation, RelationshipSummary, aggregate};
pub use classifier::{
    ClassifiedRecord, Classifier, FAMILY_RELATIONS, FREQUENCY_KEYWORDS, FrequencyBand,
    RelationshipCategory, Taxonomy, classify_frequency, classify_relationship,
};
pub use config::{ConfigError, GraphConfig, load_config, load_config_file};
pub use graph::{Edge, Node, RelationshipGraph, build_graph};
pub use layout::{Layout, LayoutParams, Point, spring_layout};
pub use loader::{
    DataLoadError, MissingColumnError, Record, RecordSet, Table, load_table, parse_table,
};
pub use pipeline::{Analysis, Pipeline, PipelineError, PipelineSettings, Stage};
pub use render::{
    BrowserDisplay, DisplayBackend, DisplayConfig, RenderError, RenderMode, View, render_view,
};
pub use report::generate_summary;
