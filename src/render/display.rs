//! Showing views on screen
//!
//! Views are handed to a [`DisplayBackend`]. The browser backend writes each
//! view to a scratch directory and launches the system browser detached, so
//! `show` returns immediately and the windows outlive this process.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::RenderError;
use super::view::View;

/// Something that can put a view in front of the user
pub trait DisplayBackend {
    /// Show the view without waiting for it to be closed
    fn show(&mut self, view: &View) -> Result<(), RenderError>;
}

/// Configuration for the browser backend
#[derive(Debug, Clone)]
pub struct DisplayConfig {
    pub output_dir: PathBuf,
    pub open_browser: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            open_browser: true,
        }
    }
}

/// `<tmp>/violence-graph`
pub fn default_output_dir() -> PathBuf {
    std::env::temp_dir().join("violence-graph")
}

/// Opens views in the system browser
#[derive(Debug)]
pub struct BrowserDisplay {
    config: DisplayConfig,
    shown: Vec<PathBuf>,
}

impl BrowserDisplay {
    pub fn new(config: DisplayConfig) -> Self {
        Self {
            config,
            shown: Vec::new(),
        }
    }

    /// Files written so far, in the order they were shown
    pub fn shown(&self) -> &[PathBuf] {
        &self.shown
    }

    fn write_view(&self, view: &View) -> Result<PathBuf, RenderError> {
        fs::create_dir_all(&self.config.output_dir)?;
        let path = self
            .config
            .output_dir
            .join(format!("{}.html", view.mode.slug()));
        fs::write(&path, &view.html)?;
        debug!(path = %path.display(), bytes = view.html.len(), "Wrote view");
        Ok(path)
    }
}

impl DisplayBackend for BrowserDisplay {
    fn show(&mut self, view: &View) -> Result<(), RenderError> {
        let path = self.write_view(view)?;

        if self.config.open_browser {
            launch(&path)?;
            info!(path = %path.display(), mode = view.mode.tag(), "Opened view");
        } else {
            eprintln!("View written to: {}", path.display());
        }

        self.shown.push(path);
        Ok(())
    }
}

fn launch(path: &Path) -> Result<(), RenderError> {
    open::that_detached(path).map_err(|source| RenderError::Display {
        path: path.to_path_buf(),
        source,
    })
}
