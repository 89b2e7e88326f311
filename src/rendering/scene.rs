// src/rendering/scene.rs
//
// Orthographic projection of a structure into window pixels. Used by
// painter.rs for drawing and by the structure page for hit-testing.

use crate::config::ViewerStyle;
use crate::model::{covalent_radius, Structure};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewState {
  /// Degrees
  pub rot_x: f64,
  pub rot_y: f64,
  pub zoom: f64,
}

impl Default for ViewState {
  fn default() -> Self {
    Self {
      rot_x: 0.0,
      rot_y: 0.0,
      zoom: 1.0,
    }
  }
}

impl ViewState {
  pub fn rotate(&mut self, dx_deg: f64, dy_deg: f64) {
    self.rot_y = (self.rot_y + dx_deg) % 360.0;
    self.rot_x = (self.rot_x + dy_deg) % 360.0;
  }

  pub fn zoom_by(&mut self, factor: f64) {
    self.zoom = (self.zoom * factor).clamp(0.1, 20.0);
  }
}

#[derive(Clone, Debug)]
pub struct RenderAtom {
  pub screen_pos: [f64; 3], // x, y, depth
  pub radius: f64,          // pixels
  pub element: String,
  pub index: usize,
}

#[derive(Clone, Debug, Default)]
pub struct StructureScene {
  /// Back to front
  pub atoms: Vec<RenderAtom>,
  /// Unit cell corners, empty for non-periodic structures
  pub corners: Vec<[f64; 2]>,
  pub scale: f64,
  pub width: f64,
  pub height: f64,
}

impl StructureScene {
  pub fn compute(
    structure: &Structure,
    view: &ViewState,
    style: &ViewerStyle,
    width: f64,
    height: f64,
  ) -> Self {
    let (sin_x, cos_x) = view.rot_x.to_radians().sin_cos();
    let (sin_y, cos_y) = view.rot_y.to_radians().sin_cos();
    let lattice = structure.lattice;
    let periodic = structure.is_periodic();

    let center = if periodic {
      [0, 1, 2].map(|k| (lattice[0][k] + lattice[1][k] + lattice[2][k]) * 0.5)
    } else {
      structure.centroid()
    };

    // X then Y
    let rotate = |p: [f64; 3]| -> [f64; 3] {
      let (x, y, z) = (p[0] - center[0], p[1] - center[1], p[2] - center[2]);
      let y1 = y * cos_x - z * sin_x;
      let z1 = y * sin_x + z * cos_x;
      let x2 = x * cos_y + z1 * sin_y;
      let z2 = -x * sin_y + z1 * cos_y;
      [x2, y1, z2]
    };

    let raw_corners: Vec<[f64; 3]> = if periodic {
      (0..8)
        .map(|c| {
          let f = [(c & 1) as f64, ((c >> 1) & 1) as f64, ((c >> 2) & 1) as f64];
          [0, 1, 2].map(|k| f[0] * lattice[0][k] + f[1] * lattice[1][k] + f[2] * lattice[2][k])
        })
        .map(rotate)
        .collect()
    } else {
      Vec::new()
    };

    let rotated: Vec<([f64; 3], f64)> = structure
      .atoms
      .iter()
      .map(|a| (rotate(a.position), covalent_radius(&a.element) * style.radius_scale))
      .collect();

    // Bounding box in model units, atoms padded by their radius
    let mut lo = [f64::INFINITY; 2];
    let mut hi = [f64::NEG_INFINITY; 2];
    let mut grow = |p: [f64; 3], r: f64| {
      for k in 0..2 {
        lo[k] = lo[k].min(p[k] - r);
        hi[k] = hi[k].max(p[k] + r);
      }
    };
    for &(p, r) in &rotated {
      grow(p, r);
    }
    for &p in &raw_corners {
      grow(p, 0.0);
    }
    if !lo[0].is_finite() {
      return Self {
        scale: 1.0,
        width,
        height,
        ..Self::default()
      };
    }

    let model_w = (hi[0] - lo[0]).max(1.0);
    let model_h = (hi[1] - lo[1]).max(1.0);
    let margin = 0.8;
    let scale = ((width * margin) / model_w).min((height * margin) / model_h) * view.zoom;
    let box_c = [(lo[0] + hi[0]) / 2.0, (lo[1] + hi[1]) / 2.0];

    // Screen y grows downwards
    let to_screen = |p: [f64; 3]| {
      [
        (p[0] - box_c[0]) * scale + width / 2.0,
        (box_c[1] - p[1]) * scale + height / 2.0,
      ]
    };

    let mut atoms: Vec<RenderAtom> = rotated
      .into_iter()
      .zip(&structure.atoms)
      .enumerate()
      .map(|(index, ((p, r), atom))| {
        let [x, y] = to_screen(p);
        RenderAtom {
          screen_pos: [x, y, p[2]],
          radius: r * scale,
          element: atom.element.clone(),
          index,
        }
      })
      .collect();
    atoms.sort_by(|a, b| a.screen_pos[2].total_cmp(&b.screen_pos[2]));

    Self {
      atoms,
      corners: raw_corners.into_iter().map(to_screen).collect(),
      scale,
      width,
      height,
    }
  }

  /// Front-most atom whose disc contains `(x, y)`.
  pub fn pick(&self, x: f64, y: f64) -> Option<usize> {
    self
      .atoms
      .iter()
      .rev()
      .find(|a| {
        let dx = a.screen_pos[0] - x;
        let dy = a.screen_pos[1] - y;
        dx * dx + dy * dy <= a.radius * a.radius
      })
      .map(|a| a.index)
  }
}
