// src/rendering/painter.rs

use super::scene::{RenderAtom, StructureScene};
use crate::config::ViewerStyle;
use crate::model::cpk_color;
use gtk4::cairo;
use std::f64::consts::PI;

const CELL_EDGES: [(usize, usize); 12] = [
  (0, 1),
  (0, 2),
  (0, 4),
  (1, 3),
  (1, 5),
  (2, 3),
  (2, 6),
  (4, 5),
  (4, 6),
  (7, 6),
  (7, 5),
  (7, 3),
];

pub fn draw_unit_cell(
  cr: &cairo::Context,
  corners: &[[f64; 2]],
  color: (f64, f64, f64),
  line_width: f64,
) -> Result<(), cairo::Error> {
  if corners.len() != 8 {
    return Ok(());
  }
  cr.set_source_rgb(color.0, color.1, color.2);
  cr.set_line_width(line_width);
  for (start, end) in CELL_EDGES {
    cr.move_to(corners[start][0], corners[start][1]);
    cr.line_to(corners[end][0], corners[end][1]);
  }
  cr.stroke()
}

// Shaded sphere: radial gradient offset towards the light
fn draw_sphere(cr: &cairo::Context, atom: &RenderAtom, rgb: (f64, f64, f64)) -> Result<(), cairo::Error> {
  let [x, y, _] = atom.screen_pos;
  let r = atom.radius.max(1.0);
  let gradient = cairo::RadialGradient::new(x - r * 0.3, y - r * 0.3, r * 0.1, x, y, r);
  gradient.add_color_stop_rgb(0.0, (rgb.0 + 0.5).min(1.0), (rgb.1 + 0.5).min(1.0), (rgb.2 + 0.5).min(1.0));
  gradient.add_color_stop_rgb(1.0, rgb.0 * 0.55, rgb.1 * 0.55, rgb.2 * 0.55);

  cr.new_sub_path();
  cr.arc(x, y, r, 0.0, 2.0 * PI);
  cr.set_source(&gradient)?;
  cr.fill()
}

/// Paints the cell, then atoms back to front. `highlight` rings one atom.
pub fn draw_structure_scene(
  cr: &cairo::Context,
  scene: &StructureScene,
  style: &ViewerStyle,
  highlight: Option<usize>,
) -> Result<(), cairo::Error> {
  if style.show_unit_cell {
    draw_unit_cell(cr, &scene.corners, style.cell_color, 1.5)?;
  }

  for atom in &scene.atoms {
    draw_sphere(cr, atom, cpk_color(&atom.element))?;

    if highlight == Some(atom.index) {
      let [x, y, _] = atom.screen_pos;
      cr.new_sub_path();
      cr.arc(x, y, atom.radius.max(1.0) + 2.0, 0.0, 2.0 * PI);
      cr.set_source_rgb(1.0, 0.85, 0.0);
      cr.set_line_width(2.5);
      cr.stroke()?;
    }
  }
  Ok(())
}
