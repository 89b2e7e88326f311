// src/rendering/heatmap.rs
//
// Right panel of the linked plot: the padded weight matrix as an image with
// a colour bar, drawn through plotters so the same code serves the GTK
// widget (CairoBackend) and file export.

use super::linked::LinkedSelection;
use super::palette::{map_linear, to_rgb8, FIREBRICK};
use crate::physics::neighbours::NeighbourhoodMap;
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::drawing::DrawingArea;
use plotters::prelude::*;

const COLOUR_BAR_WIDTH: i32 = 90;
const COLOUR_BAR_STEPS: usize = 64;
const DIMMED_ALPHA: f64 = 0.3;

/// Pixel placement of the matrix cells, in the coordinates of the root area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeatmapFrame {
  pub origin: (i32, i32),
  pub cell: f64,
  pub size: usize,
}

impl HeatmapFrame {
  /// Largest square grid of `size × size` cells that fits the given area.
  pub fn fit(origin: (i32, i32), dim: (u32, u32), size: usize) -> Self {
    let side = dim.0.min(dim.1) as f64;
    Self {
      origin,
      cell: if size == 0 { 0.0 } else { side / size as f64 },
      size,
    }
  }

  /// `(row, col)` under the pixel, row 0 at the top.
  pub fn cell_at(&self, x: f64, y: f64) -> Option<(usize, usize)> {
    if self.cell <= 0.0 {
      return None;
    }
    let fx = (x - self.origin.0 as f64) / self.cell;
    let fy = (y - self.origin.1 as f64) / self.cell;
    if fx < 0.0 || fy < 0.0 {
      return None;
    }
    let (col, row) = (fx as usize, fy as usize);
    (row < self.size && col < self.size).then_some((row, col))
  }

  /// Corners of a cell relative to `origin`.
  pub fn cell_rect(&self, row: usize, col: usize) -> [(i32, i32); 2] {
    let edge = |i: usize| (i as f64 * self.cell).round() as i32;
    [(edge(col), edge(row)), (edge(col + 1), edge(row + 1))]
  }

  fn row_rect(&self, row: usize) -> [(i32, i32); 2] {
    let [a, _] = self.cell_rect(row, 0);
    let [_, b] = self.cell_rect(row, self.size.saturating_sub(1));
    [a, b]
  }
}

fn rgb(c: (f64, f64, f64)) -> RGBColor {
  let (r, g, b) = to_rgb8(c);
  RGBColor(r, g, b)
}

/// Colour range of the image; a flat matrix gets a unit range.
pub fn colour_range(map: &NeighbourhoodMap) -> (f64, f64) {
  let (lo, hi) = map.weight_range();
  if !lo.is_finite() || !hi.is_finite() {
    return (0.0, 1.0);
  }
  if hi - lo < f64::EPSILON {
    (lo, lo + 1.0)
  } else {
    (lo, hi)
  }
}

pub fn draw_heatmap<DB: DrawingBackend>(
  root: &DrawingArea<DB, Shift>,
  map: &NeighbourhoodMap,
  selection: &LinkedSelection,
) -> Result<HeatmapFrame, Box<dyn std::error::Error>>
where
  DB::ErrorType: 'static,
{
  let (width, _) = root.dim_in_pixel();
  let (image_area, bar_area) = root.split_horizontally((width as i32 - COLOUR_BAR_WIDTH).max(1));

  let image_area = image_area
    .titled(
      &format!("Attention map, atom {}", map.target_atom),
      ("sans-serif", 16),
    )?
    .margin(10, 10, 10, 10);

  let frame = HeatmapFrame::fit(image_area.get_base_pixel(), image_area.dim_in_pixel(), map.size());
  let (lo, hi) = colour_range(map);
  let has_selection = selection.selected_atom.is_some();

  for row in 0..map.size() {
    let dimmed = has_selection && !selection.is_row_selected(map, row);
    for col in 0..map.size() {
      let colour = rgb(map_linear(map.weights[(row, col)], lo, hi));
      let style = if dimmed {
        colour.mix(DIMMED_ALPHA).filled()
      } else {
        colour.filled()
      };
      image_area.draw(&Rectangle::new(frame.cell_rect(row, col), style))?;
    }
  }

  for row in selection.selected_rows(map) {
    image_area.draw(&Rectangle::new(frame.row_rect(row), BLACK.stroke_width(2)))?;
  }

  if let Some((row, col)) = selection.hovered_cell {
    if row < map.size() && col < map.size() {
      let style = rgb(FIREBRICK).stroke_width(3);
      image_area.draw(&Rectangle::new(frame.cell_rect(row, col), style))?;
    }
  }

  draw_colour_bar(&bar_area, lo, hi)?;
  Ok(frame)
}

fn draw_colour_bar<DB: DrawingBackend>(
  area: &DrawingArea<DB, Shift>,
  lo: f64,
  hi: f64,
) -> Result<(), Box<dyn std::error::Error>>
where
  DB::ErrorType: 'static,
{
  let mut chart = ChartBuilder::on(area)
    .margin_top(36)
    .margin_bottom(10)
    .margin_right(8)
    .y_label_area_size(50)
    .build_cartesian_2d(0.0..1.0, lo..hi)?;

  chart
    .configure_mesh()
    .disable_x_mesh()
    .disable_y_mesh()
    .disable_x_axis()
    .y_labels(6)
    .y_label_formatter(&|v| format!("{:.2}", v))
    .draw()?;

  let step = (hi - lo) / COLOUR_BAR_STEPS as f64;
  chart.draw_series((0..COLOUR_BAR_STEPS).map(|i| {
    let y0 = lo + step * i as f64;
    let colour = rgb(map_linear(y0 + step / 2.0, lo, hi));
    Rectangle::new([(0.0, y0), (1.0, y0 + step)], colour.filled())
  }))?;

  Ok(())
}
