//! Rendering of the relationship graph
//!
//! Produces two views of the same figure:
//! - Static: nodes, edges, labels, legend and title
//! - Interactive: the same figure plus hover annotations per node

pub mod display;
pub mod svg;
pub mod view;

use std::path::PathBuf;

use thiserror::Error;

pub use display::{BrowserDisplay, DisplayBackend, DisplayConfig};
pub use view::{RenderMode, View, render_view};

/// Errors that can occur while rendering or showing a view
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Embedded asset not found: {0}")]
    MissingAsset(String),

    #[error("Failed to serialize hover data: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write view: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not open {} in a browser: {source}", .path.display())]
    Display {
        path: PathBuf,
        source: std::io::Error,
    },
}
