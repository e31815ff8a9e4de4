//! The load → classify → aggregate → render pipeline
//!
//! Each stage runs exactly once, in order. A failure in any stage is returned
//! immediately and no later stage runs.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::aggregate::{Aggregation, aggregate};
use crate::classifier::{ClassifiedRecord, Classifier};
use crate::config::{ConfigError, GraphConfig};
use crate::graph::{DEFAULT_NODE_SCALE, RelationshipGraph, build_graph};
use crate::layout::{Layout, LayoutParams, spring_layout};
use crate::loader::{
    DEFAULT_DELIMITER, DEFAULT_FREQUENCY_COLUMN, DEFAULT_RELATIONSHIP_COLUMN, DataLoadError,
    MissingColumnError, load_table,
};
use crate::render::{DisplayBackend, RenderError, RenderMode, render_view};

/// Errors that abort the pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Could not load data: {0}")]
    DataLoad(#[from] DataLoadError),

    #[error("{0}")]
    MissingColumn(#[from] MissingColumnError),

    #[error("Could not render graph: {0}")]
    Render(#[from] RenderError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Pipeline progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Start,
    Loaded,
    Classified,
    Aggregated,
    RenderedStatic,
    RenderedInteractive,
    End,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Start => "start",
            Stage::Loaded => "loaded",
            Stage::Classified => "classified",
            Stage::Aggregated => "aggregated",
            Stage::RenderedStatic => "rendered (static)",
            Stage::RenderedInteractive => "rendered (interactive)",
            Stage::End => "end",
        };
        f.write_str(name)
    }
}

/// Everything the pipeline needs to know about its input and output
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub input: PathBuf,
    pub delimiter: u8,
    pub relationship_column: String,
    pub frequency_column: String,
    pub layout: LayoutParams,
    pub node_scale: f64,
}

impl PipelineSettings {
    /// Settings with all defaults for the given input file
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            delimiter: DEFAULT_DELIMITER,
            relationship_column: DEFAULT_RELATIONSHIP_COLUMN.to_string(),
            frequency_column: DEFAULT_FREQUENCY_COLUMN.to_string(),
            layout: LayoutParams::default(),
            node_scale: DEFAULT_NODE_SCALE,
        }
    }

    pub fn from_config(input: &Path, config: &GraphConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            input: input.to_path_buf(),
            delimiter: config.input.delimiter_byte()?,
            relationship_column: config.input.relationship_column.clone(),
            frequency_column: config.input.frequency_column.clone(),
            layout: config.layout,
            node_scale: config.render.node_scale,
        })
    }
}

/// Output of the first three stages plus the graph and its layout
#[derive(Debug, Clone)]
pub struct Analysis {
    pub records: Vec<ClassifiedRecord>,
    pub dropped_rows: usize,
    /// Distinct frequency texts seen in the input, in first-seen order
    pub frequency_values: Vec<String>,
    pub aggregation: Aggregation,
    pub graph: RelationshipGraph,
    pub layout: Layout,
}

/// Runs the stages in order, tracking which one has completed
#[derive(Debug)]
pub struct Pipeline {
    settings: PipelineSettings,
    classifier: Classifier,
    stage: Stage,
}

impl Pipeline {
    pub fn new(settings: PipelineSettings) -> Self {
        Self::with_classifier(settings, Classifier::default())
    }

    pub fn with_classifier(settings: PipelineSettings, classifier: Classifier) -> Self {
        Self {
            settings,
            classifier,
            stage: Stage::Start,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn advance(&mut self, next: Stage) {
        debug!(from = %self.stage, to = %next, "Stage complete");
        self.stage = next;
    }

    /// Load, classify and aggregate, then build and lay out the graph
    pub fn analyze(&mut self) -> Result<Analysis, PipelineError> {
        let table = load_table(&self.settings.input, self.settings.delimiter)?;
        info!(
            path = %self.settings.input.display(),
            rows = table.row_count(),
            "Loaded table"
        );
        self.advance(Stage::Loaded);

        let set = table.records(
            &self.settings.relationship_column,
            &self.settings.frequency_column,
        )?;
        let frequency_values = table.distinct_values(&self.settings.frequency_column)?;
        let records = self.classifier.classify(&set.records);
        info!(
            records = records.len(),
            dropped = set.dropped,
            "Classified records"
        );
        self.advance(Stage::Classified);

        let aggregation = aggregate(&records);
        info!(
            relationships = aggregation.summaries().len(),
            "Aggregated records"
        );
        self.advance(Stage::Aggregated);

        let graph = build_graph(&aggregation, self.settings.node_scale);
        let layout = spring_layout(&graph, &self.settings.layout);
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Built graph"
        );

        Ok(Analysis {
            records,
            dropped_rows: set.dropped,
            frequency_values,
            aggregation,
            graph,
            layout,
        })
    }

    /// Show the static view, then the interactive one
    pub fn render<D: DisplayBackend>(
        &mut self,
        analysis: &Analysis,
        display: &mut D,
    ) -> Result<(), PipelineError> {
        for (mode, next) in [
            (RenderMode::Static, Stage::RenderedStatic),
            (RenderMode::Interactive, Stage::RenderedInteractive),
        ] {
            let view = render_view(&analysis.graph, &analysis.layout, mode)?;
            display.show(&view)?;
            self.advance(next);
        }
        self.advance(Stage::End);
        Ok(())
    }

    /// Run every stage
    pub fn run<D: DisplayBackend>(&mut self, display: &mut D) -> Result<Analysis, PipelineError> {
        let analysis = self.analyze()?;
        self.render(&analysis, display)?;
        Ok(analysis)
    }
}
