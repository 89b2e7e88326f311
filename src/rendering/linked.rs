// src/rendering/linked.rs
//
// Selection shared by the graph panel and the image panel. A selection is an
// atom: picking a node selects it directly, picking an image cell selects the
// anchor atom of that row. Hover state is separate and never selects.

use crate::physics::neighbours::{GraphEdge, NeighbourhoodMap};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LinkedSelection {
    pub selected_atom: Option<usize>,
    pub hovered_atom: Option<usize>,
    pub hovered_cell: Option<(usize, usize)>,
}

impl LinkedSelection {
    /// Tap on the graph panel; `None` is a tap on empty space.
    pub fn tap_node(&mut self, atom: Option<usize>) {
        self.selected_atom = atom;
    }

    /// Tap on the image panel; padding rows and empty space clear the selection.
    pub fn tap_cell(&mut self, map: &NeighbourhoodMap, cell: Option<(usize, usize)>) {
        self.selected_atom = cell.and_then(|(row, _)| map.row_anchor(row));
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Returns true when the hover target changed (caller redraws).
    pub fn hover_node(&mut self, atom: Option<usize>) -> bool {
        let changed = self.hovered_atom != atom;
        self.hovered_atom = atom;
        changed
    }

    pub fn hover_cell(&mut self, cell: Option<(usize, usize)>) -> bool {
        let changed = self.hovered_cell != cell;
        self.hovered_cell = cell;
        changed
    }

    /// Image rows highlighted by the current selection.
    pub fn selected_rows(&self, map: &NeighbourhoodMap) -> Vec<usize> {
        match self.selected_atom {
            Some(atom) => map.rows_for_atom(atom),
            None => Vec::new(),
        }
    }

    pub fn is_row_selected(&self, map: &NeighbourhoodMap, row: usize) -> bool {
        self.selected_atom.is_some() && map.row_anchor(row) == self.selected_atom
    }

    pub fn is_edge_selected(&self, edge: &GraphEdge) -> bool {
        self.selected_atom.is_some_and(|a| edge.touches(a))
    }

    pub fn is_edge_hovered(&self, edge: &GraphEdge) -> bool {
        self.hovered_atom.is_some_and(|a| edge.touches(a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Atom, Structure};
    use crate::physics::neighbours::{build_neighbourhood_map, MapParams, PeriodicImageSearch};

    fn square_map() -> NeighbourhoodMap {
        // Four atoms on a rectangle; atom 0 sees 1, 2, 3
        let s = Structure::molecule(
            [[20.0, 0.0, 0.0], [0.0, 20.0, 0.0], [0.0, 0.0, 20.0]],
            vec![
                Atom::new("Si", [0.0, 0.0, 0.0]),
                Atom::new("Si", [1.0, 0.0, 0.0]),
                Atom::new("Si", [0.0, 2.0, 0.0]),
                Atom::new("Si", [1.0, 2.0, 0.0]),
            ],
        );
        let params = MapParams {
            target_size: 5,
            ..MapParams::default()
        };
        build_neighbourhood_map(&s, &PeriodicImageSearch::new(), &params).unwrap()
    }

    #[test]
    fn test_node_tap_selects_rows_and_edges() {
        let map = square_map();
        let mut sel = LinkedSelection::default();

        sel.tap_node(Some(1));
        assert_eq!(sel.selected_rows(&map), vec![1]);
        assert!(sel.is_row_selected(&map, 1));
        assert!(!sel.is_row_selected(&map, 0));

        let touching = map.graph.edges.iter().filter(|e| sel.is_edge_selected(e)).count();
        assert_eq!(touching, map.graph.edges_of(1).count());
        assert!(touching > 0);

        sel.tap_node(None);
        assert!(sel.selected_rows(&map).is_empty());
    }

    #[test]
    fn test_cell_tap_selects_row_anchor() {
        let map = square_map();
        let mut sel = LinkedSelection::default();

        sel.tap_cell(&map, Some((2, 0)));
        assert_eq!(sel.selected_atom, map.row_anchor(2));

        // Padding row clears
        sel.tap_cell(&map, Some((4, 1)));
        assert_eq!(sel.selected_atom, None);

        sel.tap_cell(&map, Some((0, 3)));
        assert_eq!(sel.selected_atom, Some(0));
        sel.tap_cell(&map, None);
        assert_eq!(sel.selected_atom, None);
    }

    #[test]
    fn test_hover_does_not_select() {
        let map = square_map();
        let mut sel = LinkedSelection::default();

        assert!(sel.hover_node(Some(2)));
        assert!(!sel.hover_node(Some(2)));
        assert!(sel.hover_cell(Some((0, 0))));
        assert_eq!(sel.selected_atom, None);
        assert!(sel.selected_rows(&map).is_empty());
        assert!(map.graph.edges_of(2).all(|e| sel.is_edge_hovered(e)));

        sel.clear();
        assert_eq!(sel, LinkedSelection::default());
    }
}
