// src/physics/neighbours/matrix.rs
//
// Fixed-size neighbourhood matrix around one atom.
//
// Row 0 lists the K nearest neighbours of the target atom. Row r (1..K) is
// anchored on the r-th of those neighbours and lists the nearest members of
// the "sphere" (the K neighbours plus the target) as seen from that anchor.
// Each cell carries the target atom index, the distance and an attention
// weight `A_r / d` with `A_r = d(target, anchor_r)^(-1/6)` (`A_0 = 1`).
// The K×K block is padded to `target_size` with distance 0, weight 0 and
// target index -1.

use super::cutoff::{sorted_distances_from, DEFAULT_SEARCH_CUTOFF};
use super::{check_atom_index, check_positive, NeighbourError, NeighbourPair, NeighbourSearch};
use crate::model::Structure;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Exponent of the per-row attention factor
pub const ATTENTION_EXPONENT: f64 = -1.0 / 6.0;

/// Distances at or below this count as an atom seeing itself.
pub const SELF_DISTANCE_EPS: f64 = 1e-8;

/// Sentinel target index of padding cells and rows
pub const PADDING_INDEX: i64 = -1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapParams {
    /// Atom the map is centred on
    pub target_atom: usize,
    /// Edge length of the output matrices
    pub target_size: usize,
    /// Multiplies the estimated radius so enough candidates are found
    pub cutoff_factor: f64,
    /// Radius used to estimate the map radius (Å)
    pub search_cutoff: f64,
}

impl Default for MapParams {
    fn default() -> Self {
        Self {
            target_atom: 0,
            target_size: 32,
            cutoff_factor: 1.2,
            search_cutoff: DEFAULT_SEARCH_CUTOFF,
        }
    }
}

impl MapParams {
    pub fn validate(&self, structure: &Structure) -> Result<(), NeighbourError> {
        if self.target_size == 0 {
            return Err(NeighbourError::InvalidParameter(
                "target size must be at least 1".to_string(),
            ));
        }
        check_positive("cutoff factor", self.cutoff_factor)?;
        check_positive("search cutoff", self.search_cutoff)?;
        check_atom_index(structure, self.target_atom)
    }
}

/// One non-padded cell of the map seen as a graph edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GraphEdge {
    /// Anchor atom of the cell's row
    pub source: usize,
    /// Atom listed in the cell
    pub target: usize,
    pub distance: f64,
    pub weight: f64,
    pub row: usize,
    pub col: usize,
}

impl GraphEdge {
    pub fn touches(&self, atom: usize) -> bool {
        self.source == atom || self.target == atom
    }
}

/// Node-link view of a neighbourhood map. Nodes are atom indices, sorted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NeighbourGraph {
    pub nodes: Vec<usize>,
    pub edges: Vec<GraphEdge>,
}

impl NeighbourGraph {
    pub fn from_edges(edges: Vec<GraphEdge>) -> Self {
        let nodes: BTreeSet<usize> = edges.iter().flat_map(|e| [e.source, e.target]).collect();
        Self {
            nodes: nodes.into_iter().collect(),
            edges,
        }
    }

    pub fn contains(&self, atom: usize) -> bool {
        self.nodes.binary_search(&atom).is_ok()
    }

    /// Position of `atom` in `nodes`.
    pub fn node_index(&self, atom: usize) -> Option<usize> {
        self.nodes.binary_search(&atom).ok()
    }

    pub fn edges_of(&self, atom: usize) -> impl Iterator<Item = &GraphEdge> + '_ {
        self.edges.iter().filter(move |e| e.touches(atom))
    }
}

#[derive(Clone, Debug)]
pub struct NeighbourhoodMap {
    pub target_atom: usize,
    /// Number of real rows and columns (K)
    pub order: usize,
    /// Radius the neighbour list was built with (Å)
    pub radius: f64,
    pub weights: DMatrix<f64>,
    pub distances: DMatrix<f64>,
    pub targets: DMatrix<i64>,
    /// Anchor atom per row, `PADDING_INDEX` for padding rows
    pub row_anchors: Vec<i64>,
    pub graph: NeighbourGraph,
}

impl NeighbourhoodMap {
    /// Edge length of the padded matrices.
    pub fn size(&self) -> usize {
        self.row_anchors.len()
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn row_anchor(&self, row: usize) -> Option<usize> {
        self.row_anchors
            .get(row)
            .and_then(|&a| usize::try_from(a).ok())
    }

    pub fn target(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.size() || col >= self.size() {
            return None;
        }
        usize::try_from(self.targets[(row, col)]).ok()
    }

    pub fn is_padding(&self, row: usize, col: usize) -> bool {
        self.target(row, col).is_none()
    }

    /// Rows anchored on `atom`.
    pub fn rows_for_atom(&self, atom: usize) -> Vec<usize> {
        (0..self.size())
            .filter(|&r| self.row_anchor(r) == Some(atom))
            .collect()
    }

    /// (min, max) over the whole padded weight matrix.
    pub fn weight_range(&self) -> (f64, f64) {
        self.weights
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &w| {
                (lo.min(w), hi.max(w))
            })
    }
}

struct Cell {
    row: usize,
    col: usize,
    target: usize,
    distance: f64,
}

pub fn attention_scale(anchor_distance: f64) -> f64 {
    anchor_distance.powf(ATTENTION_EXPONENT)
}

/// Builds the padded `target_size × target_size` neighbourhood map of
/// `params.target_atom`.
///
/// The search radius is `cutoff_factor` times the distance to neighbour rank
/// `target_size` of atom 0 (within `search_cutoff`), whichever atom the map is
/// built for. When fewer neighbours exist the farthest one sets the radius
/// and the map is padded.
pub fn build_neighbourhood_map<S: NeighbourSearch + ?Sized>(
    structure: &Structure,
    search: &S,
    params: &MapParams,
) -> Result<NeighbourhoodMap, NeighbourError> {
    params.validate(structure)?;
    let target_atom = params.target_atom;
    let size = params.target_size;

    // 1. Radius, always estimated around atom 0
    let available: Vec<f64> = sorted_distances_from(structure, search, 0, params.search_cutoff)?
        .into_iter()
        .filter(|&d| d > SELF_DISTANCE_EPS)
        .collect();
    let reference = match available.get(size) {
        Some(&d) => d,
        None => {
            let &farthest = available.last().ok_or(NeighbourError::InsufficientNeighbours {
                requested: size + 1,
                found: 0,
            })?;
            log::warn!(
                "Atom 0 has only {} neighbours within {:.2} Å (wanted {}); map will be padded",
                available.len(),
                params.search_cutoff,
                size + 1
            );
            farthest
        }
    };
    let radius = params.cutoff_factor * reference;

    // 2. First shell
    let mut shell: Vec<NeighbourPair> = search
        .search(structure, radius)?
        .into_iter()
        .filter(|p| p.i == target_atom && p.distance > SELF_DISTANCE_EPS)
        .collect();
    shell.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    if shell.is_empty() {
        return Err(NeighbourError::InsufficientNeighbours {
            requested: size,
            found: 0,
        });
    }
    let order = size.min(shell.len());
    shell.truncate(order);

    let mut sphere: Vec<usize> = shell.iter().map(|p| p.j).collect();
    sphere.push(target_atom);

    let mut anchors = Vec::with_capacity(order);
    let mut cells = Vec::with_capacity(order * order);

    anchors.push(target_atom);
    for (col, p) in shell.iter().enumerate() {
        cells.push(Cell {
            row: 0,
            col,
            target: p.j,
            distance: p.distance,
        });
    }

    // 3. One row per neighbour except the last
    for (r, anchor_pair) in shell[..order - 1].iter().enumerate() {
        let row = r + 1;
        let anchor = anchor_pair.j;
        anchors.push(anchor);

        let mut seen: Vec<(usize, f64)> = sphere
            .iter()
            .zip(structure.distances(anchor, &sphere, true))
            .map(|(&atom, d)| (atom, d))
            .filter(|&(_, d)| d > SELF_DISTANCE_EPS)
            .collect();
        seen.sort_by(|a, b| a.1.total_cmp(&b.1));

        for (col, (target, distance)) in seen.into_iter().take(order).enumerate() {
            cells.push(Cell { row, col, target, distance });
        }
    }

    // 4. Attention factor per row
    let scales: Vec<f64> = (0..order)
        .map(|r| if r == 0 { 1.0 } else { attention_scale(shell[r - 1].distance) })
        .collect();

    // 5. Scatter into the padded matrices
    let mut weights = DMatrix::<f64>::zeros(size, size);
    let mut distances = DMatrix::<f64>::zeros(size, size);
    let mut targets = DMatrix::<i64>::from_element(size, size, PADDING_INDEX);
    let mut edges = Vec::with_capacity(cells.len());

    for cell in &cells {
        let weight = scales[cell.row] / cell.distance;
        weights[(cell.row, cell.col)] = weight;
        distances[(cell.row, cell.col)] = cell.distance;
        targets[(cell.row, cell.col)] = cell.target as i64;
        edges.push(GraphEdge {
            source: anchors[cell.row],
            target: cell.target,
            distance: cell.distance,
            weight,
            row: cell.row,
            col: cell.col,
        });
    }

    let mut row_anchors = vec![PADDING_INDEX; size];
    for (r, &a) in anchors.iter().enumerate() {
        row_anchors[r] = a as i64;
    }

    let graph = NeighbourGraph::from_edges(edges);
    log::info!(
        "Neighbourhood map of atom {}: {}x{} of {}x{} filled, radius {:.3} Å, {} nodes, {} edges",
        target_atom,
        order,
        order,
        size,
        size,
        radius,
        graph.nodes.len(),
        graph.edges.len()
    );

    Ok(NeighbourhoodMap {
        target_atom,
        order,
        radius,
        weights,
        distances,
        targets,
        row_anchors,
        graph,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Atom;
    use crate::physics::neighbours::{estimate_cutoff, PeriodicImageSearch};

    fn box20() -> [[f64; 3]; 3] {
        [[20.0, 0.0, 0.0], [0.0, 20.0, 0.0], [0.0, 0.0, 20.0]]
    }

    fn five_atoms() -> Structure {
        Structure::molecule(
            box20(),
            vec![
                Atom::new("C", [0.0, 0.0, 0.0]),
                Atom::new("H", [1.0, 0.0, 0.0]),
                Atom::new("H", [0.0, 1.5, 0.0]),
                Atom::new("H", [0.0, 0.0, 2.0]),
                Atom::new("Ar", [15.0, 15.0, 15.0]),
            ],
        )
    }

    fn rocksalt() -> Structure {
        let a = 5.64;
        let mut atoms = Vec::new();
        for (x, y, z) in [(0.0, 0.0, 0.0), (0.0, 0.5, 0.5), (0.5, 0.0, 0.5), (0.5, 0.5, 0.0)] {
            atoms.push(Atom::new("Na", [x * a, y * a, z * a]));
            atoms.push(Atom::new("Cl", [(x + 0.5) * a, y * a, z * a]));
        }
        Structure::periodic([[a, 0.0, 0.0], [0.0, a, 0.0], [0.0, 0.0, a]], atoms)
    }

    fn params(target_atom: usize, target_size: usize) -> MapParams {
        MapParams {
            target_atom,
            target_size,
            ..MapParams::default()
        }
    }

    fn check_graph_matches_cells(map: &NeighbourhoodMap) {
        let n = map.size();
        let mut real = 0;
        for r in 0..n {
            for c in 0..n {
                let Some(target) = map.target(r, c) else { continue };
                real += 1;
                let hits: Vec<&GraphEdge> =
                    map.graph.edges.iter().filter(|e| e.row == r && e.col == c).collect();
                assert_eq!(hits.len(), 1, "cell ({}, {})", r, c);
                let e = hits[0];
                assert_eq!(Some(e.source), map.row_anchor(r));
                assert_eq!(e.target, target);
                assert_eq!(e.distance, map.distances[(r, c)]);
                assert_eq!(e.weight, map.weights[(r, c)]);
            }
        }
        assert_eq!(real, map.graph.edges.len());
        for e in &map.graph.edges {
            assert!(map.graph.contains(e.source) && map.graph.contains(e.target));
        }
    }

    #[test]
    fn test_five_atom_scenario_is_padded() {
        let s = five_atoms();
        let map = build_neighbourhood_map(&s, &PeriodicImageSearch::new(), &params(0, 4)).unwrap();

        assert_eq!(map.order(), 3);
        assert_eq!(map.size(), 4);
        assert_eq!(map.weights.shape(), (4, 4));
        assert_eq!(map.distances.shape(), (4, 4));
        assert_eq!(map.targets.shape(), (4, 4));
        assert!((map.radius - 2.4).abs() < 1e-12);
        assert_eq!(map.row_anchors, vec![0, 1, 2, -1]);

        // Row 0: neighbours of the carbon by distance
        assert_eq!((0..3).map(|c| map.targets[(0, c)]).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!((map.distances[(0, 0)] - 1.0).abs() < 1e-12);
        assert!((map.distances[(0, 1)] - 1.5).abs() < 1e-12);
        assert!((map.distances[(0, 2)] - 2.0).abs() < 1e-12);

        // Row 1 (anchor 1): 0 at 1.0, 2 at sqrt(3.25), 3 at sqrt(5)
        assert_eq!((0..3).map(|c| map.targets[(1, c)]).collect::<Vec<_>>(), vec![0, 2, 3]);
        assert!((map.distances[(1, 1)] - 3.25f64.sqrt()).abs() < 1e-12);

        // Row 2 (anchor 2): 0 at 1.5, 1 at sqrt(3.25), 3 at 2.5
        assert_eq!((0..3).map(|c| map.targets[(2, c)]).collect::<Vec<_>>(), vec![0, 1, 3]);
        assert!((map.distances[(2, 2)] - 2.5).abs() < 1e-12);

        // Padding in row 3 and column 3
        for k in 0..4 {
            for (r, c) in [(3, k), (k, 3)] {
                assert_eq!(map.targets[(r, c)], PADDING_INDEX);
                assert_eq!(map.distances[(r, c)], 0.0);
                assert_eq!(map.weights[(r, c)], 0.0);
                assert!(map.is_padding(r, c));
            }
        }
        check_graph_matches_cells(&map);
        assert_eq!(map.graph.nodes, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_attention_weights() {
        let s = five_atoms();
        let map = build_neighbourhood_map(&s, &PeriodicImageSearch::new(), &params(0, 4)).unwrap();

        // Row 0 is plain inverse distance
        for c in 0..3 {
            assert!((map.weights[(0, c)] - 1.0 / map.distances[(0, c)]).abs() < 1e-12);
        }
        // Row 2 is scaled by d(0, 2)^(-1/6) = 1.5^(-1/6)
        let scale = 1.5f64.powf(-1.0 / 6.0);
        for c in 0..3 {
            let expected = scale / map.distances[(2, c)];
            assert!((map.weights[(2, c)] - expected).abs() < 1e-12);
        }
        let (lo, hi) = map.weight_range();
        assert_eq!(lo, 0.0);
        assert!((hi - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_periodic_map_properties() {
        let s = rocksalt();
        let size = 12;
        let map = build_neighbourhood_map(&s, &PeriodicImageSearch::new(), &params(0, size)).unwrap();

        // Shape
        assert_eq!(map.order(), size);
        assert_eq!(map.weights.shape(), (size, size));

        // Row 0 ordering
        for c in 1..size {
            assert!(map.distances[(0, c)] >= map.distances[(0, c - 1)]);
        }
        // First shell of Na in rocksalt: 6 Cl at a/2
        for c in 0..6 {
            assert!((map.distances[(0, c)] - 2.82).abs() < 1e-9);
            assert_eq!(s.atoms[map.target(0, c).unwrap()].element, "Cl");
        }

        // No zero distances in real cells, rows sorted
        for r in 0..map.order() {
            for c in 0..size {
                if map.is_padding(r, c) {
                    continue;
                }
                assert!(map.distances[(r, c)] > SELF_DISTANCE_EPS);
                if c > 0 && !map.is_padding(r, c - 1) {
                    assert!(map.distances[(r, c)] >= map.distances[(r, c - 1)]);
                }
            }
        }
        check_graph_matches_cells(&map);
    }

    #[test]
    fn test_single_neighbour_gives_one_cell() {
        let s = Structure::molecule(
            box20(),
            vec![Atom::new("H", [0.0, 0.0, 0.0]), Atom::new("H", [0.74, 0.0, 0.0])],
        );
        let map = build_neighbourhood_map(&s, &PeriodicImageSearch::new(), &params(0, 4)).unwrap();

        assert_eq!(map.order(), 1);
        assert_eq!(map.targets[(0, 0)], 1);
        assert!((map.distances[(0, 0)] - 0.74).abs() < 1e-12);
        assert_eq!(map.row_anchors, vec![0, -1, -1, -1]);
        let real = map.targets.iter().filter(|&&t| t != PADDING_INDEX).count();
        assert_eq!(real, 1);
        assert_eq!(map.graph.nodes, vec![0, 1]);
        assert_eq!(map.graph.edges.len(), 1);
    }

    #[test]
    fn test_self_images_leave_rows_empty() {
        // Every neighbour of a one-atom cell is the atom itself
        let s = Structure::periodic(
            [[3.0, 0.0, 0.0], [0.0, 3.0, 0.0], [0.0, 0.0, 3.0]],
            vec![Atom::new("Po", [0.0, 0.0, 0.0])],
        );
        let map = build_neighbourhood_map(&s, &PeriodicImageSearch::new(), &params(0, 6)).unwrap();

        assert_eq!(map.order(), 6);
        for c in 0..6 {
            assert_eq!(map.target(0, c), Some(0));
            assert!((map.distances[(0, c)] - 3.0).abs() < 1e-10);
        }
        for r in 1..6 {
            assert_eq!(map.row_anchor(r), Some(0));
            assert!((0..6).all(|c| map.is_padding(r, c)));
        }
        assert_eq!(map.rows_for_atom(0).len(), 6);
        check_graph_matches_cells(&map);
    }

    #[test]
    fn test_injected_search_is_sorted_by_builder() {
        let s = five_atoms();
        // Unsorted oracle output, ignores the radius
        let oracle = |st: &Structure, _: f64| -> Result<Vec<NeighbourPair>, NeighbourError> {
            Ok([3usize, 1, 2]
                .iter()
                .map(|&j| NeighbourPair {
                    i: 0,
                    j,
                    distance: st.distance(0, j, false),
                    shift: [0; 3],
                })
                .collect())
        };
        let map = build_neighbourhood_map(&s, &oracle, &params(0, 3)).unwrap();

        assert_eq!(map.order(), 3);
        assert_eq!(map.target(0, 0), Some(1));
        assert_eq!(map.target(0, 1), Some(2));
        assert_eq!(map.target(0, 2), Some(3));
    }

    #[test]
    fn test_parameter_errors() {
        let s = five_atoms();
        let search = PeriodicImageSearch::new();

        assert_eq!(
            build_neighbourhood_map(&s, &search, &params(5, 4)).unwrap_err(),
            NeighbourError::InvalidIndex { index: 5, atoms: 5 }
        );
        assert!(matches!(
            build_neighbourhood_map(&s, &search, &params(0, 0)),
            Err(NeighbourError::InvalidParameter(_))
        ));
        let bad_factor = MapParams {
            cutoff_factor: 0.0,
            ..params(0, 4)
        };
        assert!(matches!(
            build_neighbourhood_map(&s, &search, &bad_factor),
            Err(NeighbourError::InvalidParameter(_))
        ));
        for bad in [0.0, -1.0] {
            let bad_cutoff = MapParams {
                search_cutoff: bad,
                ..params(0, 4)
            };
            assert!(matches!(
                build_neighbourhood_map(&s, &search, &bad_cutoff),
                Err(NeighbourError::InvalidParameter(_))
            ));
        }

        let flat = Structure::periodic(
            [[3.0, 0.0, 0.0], [0.0, 3.0, 0.0], [0.0, 0.0, 0.0]],
            vec![Atom::new("Cu", [0.0; 3]), Atom::new("Cu", [1.5, 0.0, 0.0])],
        );
        assert_eq!(
            build_neighbourhood_map(&flat, &search, &params(0, 4)).unwrap_err(),
            NeighbourError::SingularLattice
        );
    }

    #[test]
    fn test_isolated_atom_has_no_map() {
        let s = five_atoms();
        // Argon is 25 Å from everything, far outside the 2.4 Å radius of atom 0
        assert_eq!(
            build_neighbourhood_map(&s, &PeriodicImageSearch::new(), &params(4, 4)).unwrap_err(),
            NeighbourError::InsufficientNeighbours { requested: 4, found: 0 }
        );

        // Nothing around atom 0 at all
        let lone = Structure::molecule(
            box20(),
            vec![
                Atom::new("Ar", [0.0, 0.0, 0.0]),
                Atom::new("H", [15.0, 0.0, 0.0]),
                Atom::new("H", [15.7, 0.0, 0.0]),
            ],
        );
        assert_eq!(
            build_neighbourhood_map(&lone, &PeriodicImageSearch::new(), &params(1, 2)).unwrap_err(),
            NeighbourError::InsufficientNeighbours { requested: 3, found: 0 }
        );
    }

    #[test]
    fn test_radius_is_estimated_around_atom_zero() {
        // Argon far from a CH3 cluster; the map is built for a cluster atom
        let s = Structure::molecule(
            box20(),
            vec![
                Atom::new("Ar", [0.0, 0.0, 0.0]),
                Atom::new("C", [5.0, 0.0, 0.0]),
                Atom::new("H", [6.0, 0.0, 0.0]),
                Atom::new("H", [5.0, 1.1, 0.0]),
                Atom::new("H", [5.0, 0.0, 1.2]),
            ],
        );
        let search = PeriodicImageSearch::new();
        let p = params(1, 2);
        let map = build_neighbourhood_map(&s, &search, &p).unwrap();

        let reference = estimate_cutoff(&s, &search, 2, p.search_cutoff).unwrap();
        assert!((map.radius - p.cutoff_factor * reference).abs() < 1e-12);
        assert!((reference - 26.44f64.sqrt()).abs() < 1e-12);

        // The wide radius around argon still keeps only the two nearest
        assert_eq!(map.order(), 2);
        assert_eq!(map.target(0, 0), Some(2));
        assert_eq!(map.target(0, 1), Some(3));
        check_graph_matches_cells(&map);
    }
}
