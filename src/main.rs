//! violence-graph CLI
//!
//! Loads the incident table, prints progress, and opens the static and the
//! interactive graph views. The process exits as soon as both views have
//! been handed to the browser.
//!
//! Usage:
//!   violence-graph [OPTIONS] [PATH]

use std::io::stdout;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use violence_graph::{
    BrowserDisplay, DisplayConfig, GraphConfig, Pipeline, PipelineSettings, generate_summary,
    load_config, load_config_file,
    loader::DEFAULT_INPUT,
    render::display::default_output_dir,
};

/// violence-graph - Family vs. non-family aggressor relationship graph
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the semicolon-delimited incident table
    #[arg(default_value = DEFAULT_INPUT)]
    path: PathBuf,

    /// Config file path (default: search for .violence-graph.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print a summary table of the aggregated counts before rendering
    #[arg(short, long)]
    summary: bool,

    /// Don't open the browser; only write the views and print their paths
    #[arg(long)]
    no_open: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Show timing information
    #[arg(long)]
    timing: bool,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    // The views belong to the browser now; nothing to wait for
    process::exit(0);
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.verbose);

    let total_start = Instant::now();

    let config: GraphConfig = match &args.config {
        Some(path) => load_config_file(path)?,
        None => load_config(&args.path)?,
    };
    if args.verbose {
        eprintln!(
            "Layout: seed={}, k={}, iterations={}",
            config.layout.seed, config.layout.k, config.layout.iterations
        );
    }

    eprintln!("Loading '{}'...", args.path.display());

    let settings = PipelineSettings::from_config(&args.path, &config)?;
    let mut pipeline = Pipeline::new(settings);

    let analysis_start = Instant::now();
    let analysis = pipeline.analyze()?;
    let analysis_time = analysis_start.elapsed();

    let message = format!(
        "Analysis complete: {} records ({} dropped), {} relationships, {} edges",
        analysis.aggregation.total_records(),
        analysis.dropped_rows,
        analysis.graph.node_count(),
        analysis.graph.edge_count()
    );
    if args.timing {
        eprintln!("{} (took {:.2?})\n", message, analysis_time);
    } else {
        eprintln!("{}\n", message);
    }

    if args.summary {
        generate_summary(
            &analysis.aggregation,
            analysis.dropped_rows,
            &analysis.frequency_values,
            &mut stdout(),
        )?;
    }

    let mut display = BrowserDisplay::new(DisplayConfig {
        output_dir: config
            .render
            .output_dir
            .clone()
            .unwrap_or_else(default_output_dir),
        open_browser: !args.no_open,
    });
    pipeline.render(&analysis, &mut display)?;

    eprintln!("Rendered {} views", display.shown().len());

    if args.timing {
        eprintln!("Total time: {:.2?}", total_start.elapsed());
    }

    Ok(())
}
