// src/rendering/graph_view.rs
//
// Left panel of the linked plot: the neighbour graph drawn from its spring
// layout with cairo.

use super::linked::LinkedSelection;
use super::palette::{map_linear, EDGE_GREY, SPECTRAL4};
use crate::graph::GraphLayout;
use crate::physics::neighbours::{GraphEdge, NeighbourGraph};
use gtk4::cairo;
use std::f64::consts::PI;

/// Half-width of the layout range shown in the panel
pub const LAYOUT_RANGE: f64 = 2.0;
pub const NODE_RADIUS: f64 = 7.5;
const EDGE_WIDTH: f64 = 5.0;
const EDGE_ALPHA: f64 = 0.8;

/// Maps layout space `[-2, 2]²` onto the largest centred square of a panel.
/// Screen y grows downwards, layout y upwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GraphFrame {
  pub x0: f64,
  pub y0: f64,
  pub side: f64,
}

impl GraphFrame {
  pub fn new(width: f64, height: f64) -> Self {
    let side = width.min(height).max(1.0);
    Self {
      x0: (width - side) / 2.0,
      y0: (height - side) / 2.0,
      side,
    }
  }

  fn pixels_per_unit(&self) -> f64 {
    self.side / (2.0 * LAYOUT_RANGE)
  }

  pub fn to_screen(&self, p: [f64; 2]) -> (f64, f64) {
    let s = self.pixels_per_unit();
    (
      self.x0 + (p[0] + LAYOUT_RANGE) * s,
      self.y0 + (LAYOUT_RANGE - p[1]) * s,
    )
  }

  pub fn to_layout(&self, x: f64, y: f64) -> [f64; 2] {
    let s = self.pixels_per_unit();
    [(x - self.x0) / s - LAYOUT_RANGE, LAYOUT_RANGE - (y - self.y0) / s]
  }

  /// Atom whose node disc contains the pixel `(x, y)`.
  pub fn node_at(&self, layout: &GraphLayout, x: f64, y: f64) -> Option<usize> {
    let radius = NODE_RADIUS / self.pixels_per_unit();
    layout.nearest(self.to_layout(x, y), radius)
  }
}

fn stroke_edge(
  cr: &cairo::Context,
  frame: &GraphFrame,
  layout: &GraphLayout,
  edge: &GraphEdge,
) -> Result<(), cairo::Error> {
  let (Some(a), Some(b)) = (layout.position(edge.source), layout.position(edge.target)) else {
    return Ok(());
  };
  let (ax, ay) = frame.to_screen(a);
  let (bx, by) = frame.to_screen(b);
  cr.move_to(ax, ay);
  cr.line_to(bx, by);
  cr.stroke()
}

pub fn draw_graph(
  cr: &cairo::Context,
  frame: &GraphFrame,
  graph: &NeighbourGraph,
  layout: &GraphLayout,
  selection: &LinkedSelection,
) -> Result<(), cairo::Error> {
  cr.set_line_width(EDGE_WIDTH);
  cr.set_line_cap(cairo::LineCap::Round);

  // Base edges
  let (r, g, b) = EDGE_GREY;
  cr.set_source_rgba(r, g, b, EDGE_ALPHA);
  for edge in &graph.edges {
    stroke_edge(cr, frame, layout, edge)?;
  }

  // Hover
  let (r, g, b) = SPECTRAL4[1];
  cr.set_source_rgb(r, g, b);
  for edge in graph.edges.iter().filter(|e| selection.is_edge_hovered(e)) {
    stroke_edge(cr, frame, layout, edge)?;
  }

  // Selection, coloured by weight
  let selected: Vec<&GraphEdge> = graph
    .edges
    .iter()
    .filter(|e| selection.is_edge_selected(e))
    .collect();
  if !selected.is_empty() {
    let (lo, hi) = selected
      .iter()
      .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), e| {
        (lo.min(e.weight), hi.max(e.weight))
      });
    for edge in selected {
      let (r, g, b) = map_linear(edge.weight, lo, hi);
      cr.set_source_rgb(r, g, b);
      stroke_edge(cr, frame, layout, edge)?;
    }
  }

  // Nodes
  cr.set_line_width(1.0);
  for (&atom, &p) in layout.nodes.iter().zip(&layout.positions) {
    let (x, y) = frame.to_screen(p);
    let (r, g, b) = if selection.selected_atom == Some(atom) {
      SPECTRAL4[2]
    } else if selection.hovered_atom == Some(atom) {
      SPECTRAL4[1]
    } else {
      SPECTRAL4[0]
    };
    cr.new_sub_path();
    cr.arc(x, y, NODE_RADIUS, 0.0, 2.0 * PI);
    cr.set_source_rgb(r, g, b);
    cr.fill_preserve()?;
    cr.set_source_rgb(0.2, 0.2, 0.2);
    cr.stroke()?;
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_frame_roundtrip_and_orientation() {
    let frame = GraphFrame::new(400.0, 200.0);
    assert_eq!(frame.side, 200.0);
    assert_eq!(frame.x0, 100.0);

    // Layout origin sits in the middle, +y is up
    assert_eq!(frame.to_screen([0.0, 0.0]), (200.0, 100.0));
    let (_, y_up) = frame.to_screen([0.0, 1.0]);
    assert!(y_up < 100.0);

    let p = frame.to_layout(260.0, 40.0);
    let (x, y) = frame.to_screen(p);
    assert!((x - 260.0).abs() < 1e-9 && (y - 40.0).abs() < 1e-9);
  }

  #[test]
  fn test_node_hit_testing() {
    let frame = GraphFrame::new(200.0, 200.0);
    let layout = GraphLayout {
      nodes: vec![4, 9],
      positions: vec![[-1.0, 0.0], [1.0, 0.0]],
    };
    let (x, y) = frame.to_screen([1.0, 0.0]);
    assert_eq!(frame.node_at(&layout, x + 3.0, y - 3.0), Some(9));
    assert_eq!(frame.node_at(&layout, 100.0, 100.0), None);
  }

  #[test]
  fn test_draw_graph_offscreen() {
    let graph = NeighbourGraph::from_edges(vec![GraphEdge {
      source: 0,
      target: 1,
      distance: 1.0,
      weight: 1.0,
      row: 0,
      col: 0,
    }]);
    let layout = GraphLayout {
      nodes: vec![0, 1],
      positions: vec![[-1.0, 0.0], [1.0, 0.0]],
    };
    let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, 120, 120).unwrap();
    let cr = cairo::Context::new(&surface).unwrap();
    let selection = LinkedSelection {
      selected_atom: Some(0),
      hovered_atom: Some(1),
      hovered_cell: None,
    };
    draw_graph(&cr, &GraphFrame::new(120.0, 120.0), &graph, &layout, &selection).unwrap();
  }
}
