// src/utils/linalg.rs

use nalgebra::{Matrix3, Vector3};

/// Determinants below this are treated as a degenerate cell.
pub const SINGULAR_EPS: f64 = 1e-8;

/// Lattice vectors as a row matrix `[[ax, ay, az], [bx, by, bz], [cx, cy, cz]]`.
pub fn lattice_matrix(lattice: [[f64; 3]; 3]) -> Matrix3<f64> {
  Matrix3::from_row_slice(&[
    lattice[0][0],
    lattice[0][1],
    lattice[0][2],
    lattice[1][0],
    lattice[1][1],
    lattice[1][2],
    lattice[2][0],
    lattice[2][1],
    lattice[2][2],
  ])
}

/// Convert fractional coordinates to Cartesian using lattice matrix
///
/// # Formula
/// ```text
/// Cartesian = Lattice^T × Fractional
/// ```
pub fn frac_to_cart(frac: [f64; 3], lattice: [[f64; 3]; 3]) -> [f64; 3] {
  let cart = lattice_matrix(lattice).transpose() * Vector3::from(frac);
  [cart.x, cart.y, cart.z]
}

/// Convert Cartesian coordinates to fractional, or `None` for a singular lattice
///
/// # Formula
/// ```text
/// Fractional = (Lattice^T)^-1 × Cartesian
/// ```
pub fn cart_to_frac(cart: [f64; 3], lattice: [[f64; 3]; 3]) -> Option<[f64; 3]> {
  let lat = lattice_matrix(lattice);
  if lat.determinant().abs() < SINGULAR_EPS {
    return None;
  }
  let inv_t = lat.transpose().try_inverse()?;
  let frac = inv_t * Vector3::from(cart);
  Some([frac.x, frac.y, frac.z])
}

/// Distance between opposite faces of the cell along each lattice direction.
///
/// `d_a = V / |b × c|` and cyclic. Returns `None` for a degenerate cell.
pub fn interplanar_spacings(lattice: [[f64; 3]; 3]) -> Option<[f64; 3]> {
  let a = Vector3::from(lattice[0]);
  let b = Vector3::from(lattice[1]);
  let c = Vector3::from(lattice[2]);
  let volume = a.dot(&b.cross(&c)).abs();
  if volume < SINGULAR_EPS {
    return None;
  }
  let areas = [b.cross(&c).norm(), c.cross(&a).norm(), a.cross(&b).norm()];
  Some([volume / areas[0], volume / areas[1], volume / areas[2]])
}

/// Shortest periodic image of a Cartesian difference vector.
///
/// Only axes flagged in `pbc` are folded. The fractional difference is first
/// wrapped into [-0.5, 0.5) and the 27 neighbouring images are then scanned,
/// which keeps the result exact for skewed cells. A singular lattice leaves
/// the vector untouched.
pub fn minimum_image(delta: [f64; 3], lattice: [[f64; 3]; 3], pbc: [bool; 3]) -> [f64; 3] {
  if !pbc.iter().any(|&p| p) {
    return delta;
  }
  let Some(mut frac) = cart_to_frac(delta, lattice) else {
    return delta;
  };
  for k in 0..3 {
    if pbc[k] {
      frac[k] -= frac[k].round();
    }
  }

  let range = |k: usize| if pbc[k] { -1..=1 } else { 0..=0 };
  let mut best = frac_to_cart(frac, lattice);
  let mut best_len = norm(best);
  for sx in range(0) {
    for sy in range(1) {
      for sz in range(2) {
        let shifted = [frac[0] + sx as f64, frac[1] + sy as f64, frac[2] + sz as f64];
        let cart = frac_to_cart(shifted, lattice);
        let len = norm(cart);
        if len < best_len {
          best = cart;
          best_len = len;
        }
      }
    }
  }
  best
}

pub fn norm(v: [f64; 3]) -> f64 {
  (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

pub fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
  [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_cubic_lattice() {
    let lattice = [[5.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, 5.0]];
    let cart = frac_to_cart([0.5, 0.5, 0.5], lattice);

    assert!((cart[0] - 2.5).abs() < 1e-10);
    assert!((cart[1] - 2.5).abs() < 1e-10);
    assert!((cart[2] - 2.5).abs() < 1e-10);
  }

  #[test]
  fn test_skewed_lattice_back_to_fractional() {
    let lattice = [[4.0, 0.0, 0.0], [2.0, 3.46, 0.0], [0.0, 0.0, 5.0]];

    let frac_orig = [0.333, 0.667, 0.25];
    let cart = frac_to_cart(frac_orig, lattice);
    let frac_back = cart_to_frac(cart, lattice).unwrap();

    for k in 0..3 {
      assert!((frac_back[k] - frac_orig[k]).abs() < 1e-10);
    }
  }

  #[test]
  fn test_singular_lattice_has_no_fractional() {
    let flat = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]];
    assert!(cart_to_frac([0.1, 0.2, 0.3], flat).is_none());
    assert!(interplanar_spacings(flat).is_none());
  }

  #[test]
  fn test_interplanar_spacings_hexagonal() {
    // a = b = 3, gamma = 120 deg, c = 5
    let lattice = [[3.0, 0.0, 0.0], [-1.5, 3.0 * 3f64.sqrt() / 2.0, 0.0], [0.0, 0.0, 5.0]];
    let d = interplanar_spacings(lattice).unwrap();

    let expected = 3.0 * 3f64.sqrt() / 2.0;
    assert!((d[0] - expected).abs() < 1e-10);
    assert!((d[1] - expected).abs() < 1e-10);
    assert!((d[2] - 5.0).abs() < 1e-10);
  }

  #[test]
  fn test_minimum_image_folds_periodic_axes_only() {
    let lattice = [[4.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 4.0]];

    let folded = minimum_image([3.5, 0.0, 3.0], lattice, [true, true, true]);
    assert!((folded[0] + 0.5).abs() < 1e-10);
    assert!((folded[2] + 1.0).abs() < 1e-10);

    let slab = minimum_image([3.5, 0.0, 3.0], lattice, [true, true, false]);
    assert!((slab[0] + 0.5).abs() < 1e-10);
    assert!((slab[2] - 3.0).abs() < 1e-10);

    let open = minimum_image([3.5, 0.0, 3.0], lattice, [false; 3]);
    assert_eq!(open, [3.5, 0.0, 3.0]);
  }

  #[test]
  fn test_minimum_image_in_skewed_cell() {
    // Strongly sheared cell where naive rounding picks the wrong image
    let lattice = [[1.0, 0.0, 0.0], [0.9, 0.3, 0.0], [0.0, 0.0, 10.0]];
    let delta = frac_to_cart([0.4, 0.4, 0.0], lattice);

    let mic = minimum_image(delta, lattice, [true, true, true]);
    assert!(norm(mic) <= norm(delta) + 1e-12);
    assert!(norm(mic) < 0.5);
  }
}
