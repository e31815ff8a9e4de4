//! Relationship graph for visualization
//!
//! Converts an [`Aggregation`] into a JSON-serializable graph: one node per
//! distinct relationship, and an edge between every pair of nodes in the same
//! category. The result is always two cliques with no edge between them.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::aggregate::Aggregation;
use crate::classifier::RelationshipCategory;

/// Default factor from record count to node area (points squared)
pub const DEFAULT_NODE_SCALE: f64 = 0.2;

/// Complete graph data for rendering
#[derive(Debug, Clone, Serialize)]
pub struct RelationshipGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// A node in the graph (one relationship value)
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub id: String,
    pub category: RelationshipCategory,
    /// Total records for this relationship
    pub weight: usize,
    /// Marker area, linear in `weight`
    pub size: f64,
    /// Frequency band summary, e.g. `"Daily: 2, Other: 1"`
    pub frequencies: String,
}

impl Node {
    pub fn hover_text(&self) -> String {
        format!(
            "Relationship: {}\nFrequencies: {}",
            self.id, self.frequencies
        )
    }
}

/// An undirected edge between two nodes of the same category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub weight: u32,
}

impl RelationshipGraph {
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Node id to hover text
    ///
    /// The interactive view resolves hovered elements through this table
    /// rather than through element order.
    pub fn hover_lookup(&self) -> BTreeMap<String, String> {
        self.nodes
            .iter()
            .map(|n| (n.id.clone(), n.hover_text()))
            .collect()
    }

    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        self.edges
            .iter()
            .any(|e| (e.source == a && e.target == b) || (e.source == b && e.target == a))
    }

    /// Node ids of one category, in node order
    pub fn members(&self, category: RelationshipCategory) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|n| n.category == category)
            .map(|n| n.id.as_str())
            .collect()
    }
}

/// Build the two-clique graph from aggregated counts
pub fn build_graph(aggregation: &Aggregation, node_scale: f64) -> RelationshipGraph {
    let nodes: Vec<Node> = aggregation
        .summaries()
        .iter()
        .map(|summary| Node {
            id: summary.relationship.clone(),
            category: summary.category,
            weight: summary.total,
            size: summary.total as f64 * node_scale,
            frequencies: summary.summary_text(),
        })
        .collect();

    let mut edges = Vec::new();
    for (i, a) in nodes.iter().enumerate() {
        for b in &nodes[i + 1..] {
            if a.category == b.category {
                edges.push(Edge {
                    source: a.id.clone(),
                    target: b.id.clone(),
                    weight: 1,
                });
            }
        }
    }

    RelationshipGraph { nodes, edges }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::classifier::Classifier;
    use crate::loader::Record;

    fn graph_for(rows: &[(&str, &str)]) -> RelationshipGraph {
        let records: Vec<Record> = rows.iter().map(|(r, f)| Record::new(*r, *f)).collect();
        let classified = Classifier::default().classify(&records);
        build_graph(&aggregate(&classified), DEFAULT_NODE_SCALE)
    }

    #[test]
    fn test_empty_graph() {
        let graph = build_graph(&Aggregation::default(), DEFAULT_NODE_SCALE);
        assert!(graph.nodes.is_empty());
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn test_one_member_per_category_has_no_edges() {
        let graph = graph_for(&[
            ("ESPOSA(O)", "DIARIAMENTE"),
            ("ESPOSA(O)", "SEMANALMENTE"),
            ("VIZINHO(A)", "MENSALMENTE"),
        ]);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.node("ESPOSA(O)").unwrap().weight, 2);
    }

    #[test]
    fn test_two_cliques_without_cross_edges() {
        let graph = graph_for(&[
            ("PAI", "DIARIAMENTE"),
            ("MÃE", "DIARIAMENTE"),
            ("TIO(A)", "OUTROS"),
            ("VIZINHO(A)", "MENSALMENTE"),
            ("DESCONHECIDO", "SEMANALMENTE"),
        ]);

        let family = graph.members(RelationshipCategory::Family);
        let others = graph.members(RelationshipCategory::NonFamily);
        assert_eq!(family.len(), 3);
        assert_eq!(others.len(), 2);

        for a in &family {
            for b in &others {
                assert!(!graph.has_edge(a, b), "cross edge {a} - {b}");
            }
        }
        for group in [&family, &others] {
            for (i, a) in group.iter().enumerate() {
                for b in &group[i + 1..] {
                    let count = graph
                        .edges
                        .iter()
                        .filter(|e| {
                            (e.source == *a && e.target == *b) || (e.source == *b && e.target == *a)
                        })
                        .count();
                    assert_eq!(count, 1, "{a} - {b}");
                }
            }
        }

        // 3 choose 2 + 2 choose 2
        assert_eq!(graph.edge_count(), 4);
        assert!(graph.edges.iter().all(|e| e.weight == 1));
    }

    #[test]
    fn test_node_size_is_linear_in_weight() {
        let graph = graph_for(&[("PAI", "x"), ("PAI", "y"), ("MÃE", "z")]);
        let pai = graph.node("PAI").unwrap();
        let mae = graph.node("MÃE").unwrap();

        assert!((pai.size - 2.0 * mae.size).abs() < 1e-12);
        assert!((mae.size - DEFAULT_NODE_SCALE).abs() < 1e-12);
    }

    #[test]
    fn test_serializes_for_consumers() {
        let graph = graph_for(&[("PAI", "DIARIAMENTE"), ("PAI", "DIARIAMENTE"), ("MÃE", "x")]);
        let json = serde_json::to_value(&graph).unwrap();

        assert_eq!(json["nodes"][0]["id"], "PAI");
        assert_eq!(json["nodes"][0]["category"], "Family");
        assert_eq!(json["nodes"][0]["weight"], 2);
        assert_eq!(json["edges"][0]["source"], "PAI");
        assert_eq!(json["edges"][0]["target"], "MÃE");
    }

    #[test]
    fn test_hover_lookup_by_id() {
        let graph = graph_for(&[("PAI", "DIARIAMENTE"), ("PAI", "OUTROS"), ("VIZINHO(A)", "?")]);
        let lookup = graph.hover_lookup();

        assert_eq!(
            lookup["PAI"],
            "Relationship: PAI\nFrequencies: Daily: 1, Other: 1"
        );
        assert_eq!(
            lookup["VIZINHO(A)"],
            "Relationship: VIZINHO(A)\nFrequencies: Other: 1"
        );
    }
}
