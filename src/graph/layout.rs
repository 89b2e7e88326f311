// src/graph/layout.rs
//
// Force-directed (Fruchterman-Reingold) placement of a neighbour graph.

use crate::physics::neighbours::NeighbourGraph;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    pub iterations: usize,
    /// Half-width of the box the layout is rescaled into
    pub scale: f64,
    pub center: [f64; 2],
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            iterations: 50,
            scale: 1.8,
            center: [0.0, 0.0],
        }
    }
}

/// Node positions, parallel to `nodes` (sorted atom indices).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphLayout {
    pub nodes: Vec<usize>,
    pub positions: Vec<[f64; 2]>,
}

impl GraphLayout {
    pub fn position(&self, atom: usize) -> Option<[f64; 2]> {
        self.nodes
            .binary_search(&atom)
            .ok()
            .map(|i| self.positions[i])
    }

    /// Atom whose node is closest to `p`, if within `max_dist`.
    pub fn nearest(&self, p: [f64; 2], max_dist: f64) -> Option<usize> {
        self.nodes
            .iter()
            .zip(&self.positions)
            .map(|(&atom, q)| (atom, ((q[0] - p[0]).powi(2) + (q[1] - p[1]).powi(2)).sqrt()))
            .filter(|&(_, d)| d <= max_dist)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(atom, _)| atom)
    }
}

// Low-discrepancy starting points in the unit square (R2 sequence)
fn initial_position(i: usize) -> [f64; 2] {
    const A1: f64 = 0.754_877_666_246_692_7;
    const A2: f64 = 0.569_840_290_998_053_3;
    let k = i as f64 + 1.0;
    [(0.5 + A1 * k).fract(), (0.5 + A2 * k).fract()]
}

/// Places the nodes of `graph` with edge weights as spring strengths.
///
/// Deterministic for a given graph. Parallel edges between the same pair of
/// atoms keep the strongest weight; self loops are ignored.
pub fn spring_layout(graph: &NeighbourGraph, settings: &LayoutSettings) -> GraphLayout {
    let nodes = graph.nodes.clone();
    let n = nodes.len();
    if n == 0 {
        return GraphLayout::default();
    }
    if n == 1 {
        return GraphLayout {
            nodes,
            positions: vec![settings.center],
        };
    }

    let mut adjacency = DMatrix::<f64>::zeros(n, n);
    for e in &graph.edges {
        if e.source == e.target {
            continue;
        }
        let (Some(u), Some(v)) = (graph.node_index(e.source), graph.node_index(e.target)) else {
            continue;
        };
        let w = adjacency[(u, v)].max(e.weight);
        adjacency[(u, v)] = w;
        adjacency[(v, u)] = w;
    }

    let mut pos: Vec<[f64; 2]> = (0..n).map(initial_position).collect();
    let k = (1.0 / n as f64).sqrt();

    let span = |pos: &[[f64; 2]], axis: usize| {
        let (lo, hi) = pos
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p[axis]), hi.max(p[axis])));
        hi - lo
    };
    let mut t = span(&pos, 0).max(span(&pos, 1)) * 0.1;
    let dt = t / (settings.iterations as f64 + 1.0);

    let mut displacement = vec![[0.0f64; 2]; n];
    for _ in 0..settings.iterations {
        for i in 0..n {
            let mut d = [0.0, 0.0];
            for j in 0..n {
                if i == j {
                    continue;
                }
                let delta = [pos[i][0] - pos[j][0], pos[i][1] - pos[j][1]];
                let dist = (delta[0] * delta[0] + delta[1] * delta[1]).sqrt().max(0.01);
                // repulsion k²/d minus weighted attraction d²/k, along delta/d
                let f = k * k / (dist * dist) - adjacency[(i, j)] * dist / k;
                d[0] += delta[0] * f;
                d[1] += delta[1] * f;
            }
            displacement[i] = d;
        }
        for (p, d) in pos.iter_mut().zip(&displacement) {
            let len = (d[0] * d[0] + d[1] * d[1]).sqrt().max(0.01);
            p[0] += d[0] * t / len;
            p[1] += d[1] * t / len;
        }
        t -= dt;
    }

    rescale(&mut pos, settings.scale, settings.center);
    GraphLayout { nodes, positions: pos }
}

/// Centres on the mean and scales the largest coordinate to `scale`.
fn rescale(pos: &mut [[f64; 2]], scale: f64, center: [f64; 2]) {
    let n = pos.len() as f64;
    let mean = [
        pos.iter().map(|p| p[0]).sum::<f64>() / n,
        pos.iter().map(|p| p[1]).sum::<f64>() / n,
    ];
    let mut lim: f64 = 0.0;
    for p in pos.iter_mut() {
        p[0] -= mean[0];
        p[1] -= mean[1];
        lim = lim.max(p[0].abs()).max(p[1].abs());
    }
    for p in pos.iter_mut() {
        if lim > 0.0 {
            p[0] *= scale / lim;
            p[1] *= scale / lim;
        }
        p[0] += center[0];
        p[1] += center[1];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::neighbours::GraphEdge;

    fn edge(source: usize, target: usize, weight: f64) -> GraphEdge {
        GraphEdge {
            source,
            target,
            distance: 1.0 / weight,
            weight,
            row: 0,
            col: 0,
        }
    }

    fn ring(n: usize) -> NeighbourGraph {
        NeighbourGraph::from_edges((0..n).map(|i| edge(i, (i + 1) % n, 1.0)).collect())
    }

    #[test]
    fn test_layout_fills_the_box() {
        let settings = LayoutSettings::default();
        let layout = spring_layout(&ring(6), &settings);

        assert_eq!(layout.nodes, vec![0, 1, 2, 3, 4, 5]);
        let lim = layout
            .positions
            .iter()
            .fold(0.0f64, |m, p| m.max(p[0].abs()).max(p[1].abs()));
        assert!((lim - 1.8).abs() < 1e-9);

        let mean_x: f64 = layout.positions.iter().map(|p| p[0]).sum::<f64>() / 6.0;
        assert!(mean_x.abs() < 1e-9);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let g = ring(5);
        let a = spring_layout(&g, &LayoutSettings::default());
        let b = spring_layout(&g, &LayoutSettings::default());
        assert_eq!(a, b);
    }

    #[test]
    fn test_strong_edges_pull_nodes_closer() {
        // 0-1 strongly bound, 2 only weakly attached
        let g = NeighbourGraph::from_edges(vec![edge(0, 1, 10.0), edge(1, 2, 0.05), edge(0, 2, 0.05)]);
        let layout = spring_layout(&g, &LayoutSettings { iterations: 200, ..LayoutSettings::default() });

        let p = |a: usize| layout.position(a).unwrap();
        let d = |a: [f64; 2], b: [f64; 2]| ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt();
        assert!(d(p(0), p(1)) < d(p(0), p(2)));
        assert!(d(p(0), p(1)) < d(p(1), p(2)));
    }

    #[test]
    fn test_degenerate_graphs() {
        assert!(spring_layout(&NeighbourGraph::default(), &LayoutSettings::default())
            .nodes
            .is_empty());

        // A lone self loop leaves one node at the centre
        let g = NeighbourGraph::from_edges(vec![edge(3, 3, 1.0)]);
        let settings = LayoutSettings { center: [0.5, -0.5], ..LayoutSettings::default() };
        let layout = spring_layout(&g, &settings);
        assert_eq!(layout.position(3), Some([0.5, -0.5]));
    }

    #[test]
    fn test_nearest_node() {
        let layout = GraphLayout {
            nodes: vec![2, 7],
            positions: vec![[0.0, 0.0], [1.0, 1.0]],
        };
        assert_eq!(layout.nearest([0.9, 0.8], 0.5), Some(7));
        assert_eq!(layout.nearest([0.5, -1.5], 0.5), None);
    }
}
