//! SVG drawing of the relationship graph
//!
//! Draws edges, nodes, labels, a legend and a title onto a fixed
//! 1400x1000 canvas (14x10 inches at 100 dpi).

use std::fmt::Write;

use crate::classifier::RelationshipCategory;
use crate::graph::RelationshipGraph;
use crate::layout::{Layout, Point};

pub const WIDTH: f64 = 1400.0;
pub const HEIGHT: f64 = 1000.0;

const PADDING: f64 = 70.0;
const TITLE_HEIGHT: f64 = 60.0;
/// Pixels per typographic point at 100 dpi
const PX_PER_PT: f64 = 100.0 / 72.0;
/// Keeps single-record nodes visible and hoverable
const MIN_RADIUS: f64 = 3.0;

const FAMILY_COLOR: &str = "lightcoral";
const NON_FAMILY_COLOR: &str = "lightblue";

pub fn category_color(category: RelationshipCategory) -> &'static str {
    match category {
        RelationshipCategory::Family => FAMILY_COLOR,
        RelationshipCategory::NonFamily => NON_FAMILY_COLOR,
    }
}

/// Marker radius in pixels for a node of the given area (points squared)
pub fn node_radius(size: f64) -> f64 {
    (size.max(0.0).sqrt() * PX_PER_PT / 2.0).max(MIN_RADIUS)
}

/// Map layout space ([-1, 1] on both axes) to canvas pixels, y pointing up
fn to_canvas(p: Point) -> (f64, f64) {
    let left = PADDING;
    let right = WIDTH - PADDING;
    let top = TITLE_HEIGHT + PADDING;
    let bottom = HEIGHT - PADDING;
    (
        left + (p.x + 1.0) / 2.0 * (right - left),
        bottom - (p.y + 1.0) / 2.0 * (bottom - top),
    )
}

/// Escape text for use in XML content and attribute values
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Draw the whole figure as an `<svg>` element
pub fn draw(graph: &RelationshipGraph, layout: &Layout, title: &str) -> String {
    let mut svg = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}" font-family="sans-serif">"#,
        w = WIDTH,
        h = HEIGHT
    );
    let _ = writeln!(
        svg,
        r#"<rect width="100%" height="100%" fill="white"/>"#
    );
    let _ = writeln!(
        svg,
        r#"<text class="title" x="{}" y="{}" text-anchor="middle" font-size="19" font-weight="bold">{}</text>"#,
        WIDTH / 2.0,
        TITLE_HEIGHT / 2.0 + 10.0,
        escape_xml(title)
    );

    let _ = writeln!(svg, r#"<g class="edges" stroke="gray" stroke-opacity="0.7">"#);
    for edge in &graph.edges {
        let (Some(a), Some(b)) = (layout.position(&edge.source), layout.position(&edge.target))
        else {
            continue;
        };
        let (x1, y1) = to_canvas(a);
        let (x2, y2) = to_canvas(b);
        let _ = writeln!(
            svg,
            r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}"/>"#
        );
    }
    let _ = writeln!(svg, "</g>");

    let _ = writeln!(svg, r#"<g class="nodes" fill-opacity="0.8">"#);
    for node in &graph.nodes {
        let Some(p) = layout.position(&node.id) else {
            continue;
        };
        let (cx, cy) = to_canvas(p);
        let _ = writeln!(
            svg,
            r#"<circle class="node" data-id="{}" cx="{cx:.2}" cy="{cy:.2}" r="{:.2}" fill="{}"/>"#,
            escape_xml(&node.id),
            node_radius(node.size),
            category_color(node.category)
        );
    }
    let _ = writeln!(svg, "</g>");

    let _ = writeln!(
        svg,
        r#"<g class="labels" font-size="11" font-weight="bold" text-anchor="middle" dominant-baseline="central" pointer-events="none">"#
    );
    for node in &graph.nodes {
        let Some(p) = layout.position(&node.id) else {
            continue;
        };
        let (x, y) = to_canvas(p);
        let _ = writeln!(
            svg,
            r#"<text x="{x:.2}" y="{y:.2}">{}</text>"#,
            escape_xml(&node.id)
        );
    }
    let _ = writeln!(svg, "</g>");

    draw_legend(&mut svg);
    svg.push_str("</svg>\n");
    svg
}

fn draw_legend(svg: &mut String) {
    let x = WIDTH - 190.0;
    let y = TITLE_HEIGHT + 10.0;
    let _ = writeln!(svg, r#"<g class="legend" font-size="13">"#);
    let _ = writeln!(
        svg,
        r##"<rect x="{x}" y="{y}" width="170" height="76" rx="4" fill="white" stroke="#cccccc"/>"##
    );
    for (row, category) in [RelationshipCategory::Family, RelationshipCategory::NonFamily]
        .into_iter()
        .enumerate()
    {
        let cy = y + 24.0 + row as f64 * 28.0;
        let _ = writeln!(
            svg,
            r#"<circle cx="{}" cy="{cy}" r="7" fill="{}" fill-opacity="0.7"/>"#,
            x + 22.0,
            category_color(category)
        );
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="{cy}" dominant-baseline="central">{}</text>"#,
            x + 40.0,
            category.label()
        );
    }
    let _ = writeln!(svg, "</g>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, Node};
    use crate::layout::{LayoutParams, spring_layout};

    fn node(id: &str, category: RelationshipCategory, weight: usize) -> Node {
        Node {
            id: id.to_string(),
            category,
            weight,
            size: weight as f64 * 0.2,
            frequencies: "Daily: 1".to_string(),
        }
    }

    fn sample() -> (RelationshipGraph, Layout) {
        let graph = RelationshipGraph {
            nodes: vec![
                node("PAI", RelationshipCategory::Family, 10),
                node("MÃE", RelationshipCategory::Family, 4),
                node("A<B & \"C\"", RelationshipCategory::NonFamily, 1),
            ],
            edges: vec![Edge {
                source: "PAI".to_string(),
                target: "MÃE".to_string(),
                weight: 1,
            }],
        };
        let layout = spring_layout(&graph, &LayoutParams::default());
        (graph, layout)
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(
            escape_xml(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&apos;&amp;&apos;&lt;/a&gt;"
        );
        assert_eq!(escape_xml("IRMÃO(Ã)"), "IRMÃO(Ã)");
    }

    #[test]
    fn test_node_radius_grows_with_size() {
        assert!(node_radius(1000.0) > node_radius(100.0));
        assert_eq!(node_radius(0.0), MIN_RADIUS);
        assert_eq!(node_radius(-5.0), MIN_RADIUS);
    }

    #[test]
    fn test_draw_contains_every_element() {
        let (graph, layout) = sample();
        let svg = draw(&graph, &layout, "Title (Interactive)");

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches(r#"class="node""#).count(), 3);
        assert_eq!(svg.matches("<line ").count(), 1);
        assert!(svg.contains("Title (Interactive)"));
        assert!(svg.contains(r#"data-id="A&lt;B &amp; &quot;C&quot;""#));
        assert!(svg.contains(">Family</text>"));
        assert!(svg.contains(">Non-family</text>"));
        assert!(svg.contains(r#"fill="lightcoral""#));
        assert!(svg.contains(r#"fill="lightblue""#));
    }

    #[test]
    fn test_nodes_stay_on_canvas() {
        let (_, layout) = sample();
        for (_, p) in layout.iter() {
            let (x, y) = to_canvas(p);
            assert!((0.0..=WIDTH).contains(&x));
            assert!((0.0..=HEIGHT).contains(&y));
        }
    }
}
