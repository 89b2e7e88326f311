// src/rendering/export.rs
//
// File export of the linked plot and of the structure view. Both panels are
// drawn with the same functions the widgets use.

use super::graph_view::{draw_graph, GraphFrame};
use super::heatmap::draw_heatmap;
use super::linked::LinkedSelection;
use super::painter::draw_structure_scene;
use super::scene::{StructureScene, ViewState};
use crate::config::{ExportFormat, ViewerStyle};
use crate::graph::GraphLayout;
use crate::model::Structure;
use crate::physics::neighbours::NeighbourhoodMap;
use gtk4::cairo;
use plotters::prelude::*;
use plotters_cairo::CairoBackend;
use std::path::Path;

/// Size of each panel of an exported linked plot (pixels or points)
pub const PANEL_SIZE: (u32, u32) = (500, 500);

// Runs `draw` on a fresh surface of the requested format and writes it out.
fn render_to_file<F>(path: &Path, format: ExportFormat, width: u32, height: u32, draw: F) -> Result<(), String>
where
  F: FnOnce(&cairo::Context) -> Result<(), String>,
{
  match format {
    ExportFormat::Pdf => {
      let surface = cairo::PdfSurface::new(width as f64, height as f64, path).map_err(|e| e.to_string())?;
      let cr = cairo::Context::new(&surface).map_err(|e| e.to_string())?;
      draw(&cr)?;
      drop(cr);
      surface.finish();
    }
    ExportFormat::Png => {
      let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, width as i32, height as i32)
        .map_err(|e| e.to_string())?;
      {
        let cr = cairo::Context::new(&surface).map_err(|e| e.to_string())?;
        draw(&cr)?;
      }
      let mut file = std::fs::File::create(path).map_err(|e| e.to_string())?;
      surface.write_to_png(&mut file).map_err(|e| e.to_string())?;
    }
  }
  log::info!("Exported {:?}", path);
  Ok(())
}

/// Draws both panels of the linked plot side by side onto `cr`.
pub fn draw_linked_plot(
  cr: &cairo::Context,
  map: &NeighbourhoodMap,
  layout: &GraphLayout,
  selection: &LinkedSelection,
  panel: (u32, u32),
) -> Result<(), String> {
  let (w, h) = panel;
  cr.set_source_rgb(1.0, 1.0, 1.0);
  cr.paint().map_err(|e| e.to_string())?;

  let frame = GraphFrame::new(w as f64, h as f64);
  draw_graph(cr, &frame, &map.graph, layout, selection).map_err(|e| e.to_string())?;

  let backend = CairoBackend::new(cr, (2 * w, h)).map_err(|e| e.to_string())?;
  let root = backend.into_drawing_area();
  let (_, right) = root.split_horizontally(w as i32);
  draw_heatmap(&right, map, selection).map_err(|e| e.to_string())?;
  root.present().map_err(|e| e.to_string())?;
  Ok(())
}

pub fn export_linked_plot(
  map: &NeighbourhoodMap,
  layout: &GraphLayout,
  selection: &LinkedSelection,
  path: &Path,
  format: ExportFormat,
) -> Result<(), String> {
  let (w, h) = PANEL_SIZE;
  render_to_file(path, format, 2 * w, h, |cr| draw_linked_plot(cr, map, layout, selection, PANEL_SIZE))
}

pub fn export_structure(
  structure: &Structure,
  view: &ViewState,
  style: &ViewerStyle,
  highlight: Option<usize>,
  path: &Path,
  format: ExportFormat,
  size: (u32, u32),
) -> Result<(), String> {
  let scene = StructureScene::compute(structure, view, style, size.0 as f64, size.1 as f64);
  render_to_file(path, format, size.0, size.1, |cr| {
    let (r, g, b) = style.background_color;
    cr.set_source_rgb(r, g, b);
    cr.paint().map_err(|e| e.to_string())?;
    draw_structure_scene(cr, &scene, style, highlight).map_err(|e| e.to_string())
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::Atom;

  fn tmp(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("nbmap-{}-{}", std::process::id(), name))
  }

  #[test]
  fn test_export_structure_png_and_pdf() {
    let s = Structure::periodic(
      [[3.0, 0.0, 0.0], [0.0, 3.0, 0.0], [0.0, 0.0, 3.0]],
      vec![Atom::new("Cu", [0.0, 0.0, 0.0])],
    );
    for format in [ExportFormat::Png, ExportFormat::Pdf] {
      let path = tmp(&format!("structure.{}", format.extension()));
      export_structure(&s, &ViewState::default(), &ViewerStyle::default(), None, &path, format, (120, 90)).unwrap();
      let len = std::fs::metadata(&path).unwrap().len();
      assert!(len > 0);
      let _ = std::fs::remove_file(&path);
    }
  }

  #[test]
  fn test_export_linked_plot_with_selection() {
    use crate::graph::{spring_layout, LayoutSettings};
    use crate::physics::neighbours::{build_neighbourhood_map, MapParams, PeriodicImageSearch};

    let s = Structure::molecule(
      [[20.0, 0.0, 0.0], [0.0, 20.0, 0.0], [0.0, 0.0, 20.0]],
      vec![
        Atom::new("O", [0.0, 0.0, 0.0]),
        Atom::new("H", [0.96, 0.0, 0.0]),
        Atom::new("H", [-0.24, 0.93, 0.0]),
      ],
    );
    let params = MapParams {
      target_size: 4,
      ..MapParams::default()
    };
    let map = build_neighbourhood_map(&s, &PeriodicImageSearch::new(), &params).unwrap();
    let layout = spring_layout(&map.graph, &LayoutSettings::default());
    let mut selection = LinkedSelection::default();
    selection.tap_node(Some(1));

    for format in [ExportFormat::Png, ExportFormat::Pdf] {
      let path = tmp(&format!("linked.{}", format.extension()));
      export_linked_plot(&map, &layout, &selection, &path, format).unwrap();
      assert!(std::fs::metadata(&path).unwrap().len() > 0);
      let _ = std::fs::remove_file(&path);
    }
  }
}
