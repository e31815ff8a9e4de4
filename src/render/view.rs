//! HTML views built from embedded assets
//!
//! Each view is a self-contained HTML document: the SVG figure, the style
//! sheet and, for the interactive view, the hover script together with the
//! node id to hover text table it reads from.

use rust_embed::RustEmbed;

use super::RenderError;
use super::svg;
use crate::graph::RelationshipGraph;
use crate::layout::Layout;

/// Embedded static assets
#[derive(RustEmbed)]
#[folder = "web-assets/"]
struct Assets;

pub const TITLE: &str = "Frequency of Aggressions Against Women: Family vs. Non-family Aggressor";

/// Which of the two views to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Static,
    Interactive,
}

impl RenderMode {
    pub fn tag(&self) -> &'static str {
        match self {
            RenderMode::Static => "Non-interactive",
            RenderMode::Interactive => "Interactive",
        }
    }

    /// Used for the view's file name
    pub fn slug(&self) -> &'static str {
        match self {
            RenderMode::Static => "static",
            RenderMode::Interactive => "interactive",
        }
    }
}

/// A rendered view ready to be shown
#[derive(Debug, Clone)]
pub struct View {
    pub mode: RenderMode,
    pub title: String,
    pub html: String,
}

fn asset(name: &str) -> Result<String, RenderError> {
    let file = Assets::get(name).ok_or_else(|| RenderError::MissingAsset(name.to_string()))?;
    Ok(String::from_utf8_lossy(&file.data).into_owned())
}

/// Render one view of the graph
pub fn render_view(
    graph: &RelationshipGraph,
    layout: &Layout,
    mode: RenderMode,
) -> Result<View, RenderError> {
    let title = format!("{} ({})", TITLE, mode.tag());
    let figure = svg::draw(graph, layout, &title);

    let scripts = match mode {
        RenderMode::Static => String::new(),
        RenderMode::Interactive => {
            // `<` never appears outside JSON strings, so escaping it keeps
            // `</script>` out of the embedded table
            let table = serde_json::to_string(&graph.hover_lookup())?.replace('<', "\\u003c");
            format!(
                "<div id=\"tooltip\"></div>\n<script type=\"application/json\" id=\"hover-data\">{}</script>\n<script>\n{}</script>",
                table,
                asset("hover.js")?
            )
        }
    };

    let escaped_title = svg::escape_xml(&title);
    let style = asset("style.css")?;
    let html = fill_template(
        &asset("view.html")?,
        &[
            ("title", escaped_title.as_str()),
            ("style", style.as_str()),
            ("scripts", scripts.as_str()),
            ("svg", figure.as_str()),
        ],
    );

    Ok(View { mode, title, html })
}

/// Substitute `{{name}}` placeholders in a single pass over the template
///
/// Substituted text is never scanned again, so placeholder-like text coming
/// from the data stays literal. Unknown placeholders are kept as they are.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut html = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        html.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            html.push_str(&rest[start..]);
            return html;
        };

        let name = &after[..end];
        match values.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => html.push_str(value),
            None => html.push_str(&rest[start..start + end + 4]),
        }
        rest = &after[end + 2..];
    }

    html.push_str(rest);
    html
}
