//! Force-directed node placement
//!
//! Fruchterman-Reingold spring layout. Edges pull their endpoints together,
//! every pair of nodes pushes apart, and a cooling schedule shrinks the step
//! size each iteration. Initial positions come from a seeded RNG so the same
//! graph and parameters always produce the same coordinates.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use crate::graph::RelationshipGraph;

/// Closest two nodes are allowed to get when computing forces
const MIN_DISTANCE: f64 = 0.01;

/// Layout tuning
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LayoutParams {
    /// RNG seed for initial positions
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Optimal distance between nodes; larger spreads the layout out
    #[serde(default = "default_k")]
    pub k: f64,

    #[serde(default = "default_iterations")]
    pub iterations: usize,

    /// Stop early once the mean displacement per node falls below this
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_seed() -> u64 {
    42
}

fn default_k() -> f64 {
    1.3
}

fn default_iterations() -> usize {
    50
}

fn default_threshold() -> f64 {
    1e-4
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            k: default_k(),
            iterations: default_iterations(),
            threshold: default_threshold(),
        }
    }
}

/// A position in layout space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Node positions keyed by node id, centred on the origin within [-1, 1]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    positions: BTreeMap<String, Point>,
}

impl Layout {
    pub fn position(&self, id: &str) -> Option<Point> {
        self.positions.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Point)> {
        self.positions.iter().map(|(id, p)| (id.as_str(), *p))
    }
}

/// Compute a spring layout for the graph
pub fn spring_layout(graph: &RelationshipGraph, params: &LayoutParams) -> Layout {
    let n = graph.nodes.len();
    match n {
        0 => return Layout::default(),
        1 => {
            let mut positions = BTreeMap::new();
            positions.insert(graph.nodes[0].id.clone(), Point::default());
            return Layout { positions };
        }
        _ => {}
    }

    let index: BTreeMap<&str, usize> = graph
        .nodes
        .iter()
        .enumerate()
        .map(|(i, node)| (node.id.as_str(), i))
        .collect();

    let mut adjacency = vec![vec![0.0_f64; n]; n];
    for edge in &graph.edges {
        let (Some(&a), Some(&b)) = (
            index.get(edge.source.as_str()),
            index.get(edge.target.as_str()),
        ) else {
            continue;
        };
        adjacency[a][b] = f64::from(edge.weight);
        adjacency[b][a] = f64::from(edge.weight);
    }

    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut pos: Vec<[f64; 2]> = (0..n)
        .map(|_| [rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0)])
        .collect();

    fruchterman_reingold(&mut pos, &adjacency, params);
    rescale(&mut pos);

    let positions = graph
        .nodes
        .iter()
        .zip(pos)
        .map(|(node, [x, y])| (node.id.clone(), Point { x, y }))
        .collect();

    Layout { positions }
}

fn fruchterman_reingold(pos: &mut [[f64; 2]], adjacency: &[Vec<f64>], params: &LayoutParams) {
    let n = pos.len();
    let k = params.k;

    // Initial temperature: a tenth of the bounding box
    let span = |axis: usize| {
        let (lo, hi) = pos.iter().fold((f64::MAX, f64::MIN), |(lo, hi), p| {
            (lo.min(p[axis]), hi.max(p[axis]))
        });
        hi - lo
    };
    let mut t = span(0).max(span(1)) * 0.1;
    let dt = t / (params.iterations as f64 + 1.0);

    let mut displacement = vec![[0.0_f64; 2]; n];
    for _ in 0..params.iterations {
        for (i, disp) in displacement.iter_mut().enumerate() {
            *disp = [0.0, 0.0];
            for j in 0..n {
                if i == j {
                    continue;
                }
                let dx = pos[i][0] - pos[j][0];
                let dy = pos[i][1] - pos[j][1];
                let distance = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
                // Repulsion k²/d minus spring attraction A·d²/k, along the unit vector
                let force = k * k / (distance * distance) - adjacency[i][j] * distance / k;
                disp[0] += dx * force;
                disp[1] += dy * force;
            }
        }

        let mut moved = 0.0_f64;
        for (p, disp) in pos.iter_mut().zip(&displacement) {
            let mut length = (disp[0] * disp[0] + disp[1] * disp[1]).sqrt();
            if length < MIN_DISTANCE {
                length = 0.1;
            }
            let step = [disp[0] * t / length, disp[1] * t / length];
            p[0] += step[0];
            p[1] += step[1];
            moved += step[0] * step[0] + step[1] * step[1];
        }

        t -= dt;
        if moved.sqrt() / (n as f64) < params.threshold {
            break;
        }
    }
}

/// Centre on the origin and scale so the largest coordinate is 1
fn rescale(pos: &mut [[f64; 2]]) {
    let n = pos.len() as f64;
    let mean = pos
        .iter()
        .fold([0.0, 0.0], |acc, p| [acc[0] + p[0] / n, acc[1] + p[1] / n]);

    let mut extent = 0.0_f64;
    for p in pos.iter_mut() {
        p[0] -= mean[0];
        p[1] -= mean[1];
        extent = extent.max(p[0].abs()).max(p[1].abs());
    }

    if extent > 0.0 {
        for p in pos.iter_mut() {
            p[0] /= extent;
            p[1] /= extent;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::classifier::Classifier;
    use crate::graph::{DEFAULT_NODE_SCALE, build_graph};
    use crate::loader::Record;

    fn sample_graph() -> RelationshipGraph {
        let records: Vec<Record> = [
            ("PAI", "DIARIAMENTE"),
            ("MÃE", "DIARIAMENTE"),
            ("TIO(A)", "OUTROS"),
            ("ESPOSA(O)", "SEMANALMENTE"),
            ("VIZINHO(A)", "MENSALMENTE"),
            ("DESCONHECIDO", "SEMANALMENTE"),
            ("AMIGO(A)", "?"),
        ]
        .iter()
        .map(|(r, f)| Record::new(*r, *f))
        .collect();
        let classified = Classifier::default().classify(&records);
        build_graph(&aggregate(&classified), DEFAULT_NODE_SCALE)
    }

    #[test]
    fn test_empty_and_single() {
        let empty = RelationshipGraph {
            nodes: Vec::new(),
            edges: Vec::new(),
        };
        assert!(spring_layout(&empty, &LayoutParams::default()).is_empty());

        let mut single = sample_graph();
        single.nodes.truncate(1);
        single.edges.clear();
        let layout = spring_layout(&single, &LayoutParams::default());
        assert_eq!(layout.len(), 1);
        assert_eq!(layout.position(&single.nodes[0].id), Some(Point::default()));
    }

    #[test]
    fn test_every_node_placed_within_unit_box() {
        let graph = sample_graph();
        let layout = spring_layout(&graph, &LayoutParams::default());

        assert_eq!(layout.len(), graph.node_count());
        for node in &graph.nodes {
            let p = layout.position(&node.id).unwrap();
            assert!(p.x.is_finite() && p.y.is_finite());
            assert!(p.x.abs() <= 1.0 + 1e-9 && p.y.abs() <= 1.0 + 1e-9);
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let graph = sample_graph();
        let params = LayoutParams::default();
        assert_eq!(spring_layout(&graph, &params), spring_layout(&graph, &params));
    }

    #[test]
    fn test_different_seed_moves_nodes() {
        let graph = sample_graph();
        let a = spring_layout(&graph, &LayoutParams::default());
        let b = spring_layout(
            &graph,
            &LayoutParams {
                seed: 7,
                ..LayoutParams::default()
            },
        );
        assert_ne!(a, b);
    }

    #[test]
    fn test_layout_is_centred() {
        let graph = sample_graph();
        let layout = spring_layout(&graph, &LayoutParams::default());
        let n = layout.len() as f64;
        let (sx, sy) = layout
            .iter()
            .fold((0.0, 0.0), |(sx, sy), (_, p)| (sx + p.x, sy + p.y));

        assert!((sx / n).abs() < 1e-9);
        assert!((sy / n).abs() < 1e-9);
    }
}
