// src/physics/neighbours/search.rs

use super::{check_positive, NeighbourError};
use crate::model::Structure;
use crate::utils::linalg;
use rayon::prelude::*;

/// One ordered pair of atoms within the cutoff.
///
/// `shift` is the lattice translation (in cell units) applied to atom `j`,
/// relative to the positions stored in the structure:
/// `r_j + shift · L - r_i` has length `distance`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NeighbourPair {
    pub i: usize,
    pub j: usize,
    pub distance: f64,
    pub shift: [i32; 3],
}

/// All-pairs-within-cutoff query over a structure.
///
/// Implementations must return every ordered pair `(i, j)` (and every periodic
/// image of it) whose separation is at most `cutoff`, except an atom paired
/// with itself in the home cell. Output order must be deterministic.
pub trait NeighbourSearch {
    fn search(&self, structure: &Structure, cutoff: f64) -> Result<Vec<NeighbourPair>, NeighbourError>;
}

impl<F> NeighbourSearch for F
where
    F: Fn(&Structure, f64) -> Result<Vec<NeighbourPair>, NeighbourError>,
{
    fn search(&self, structure: &Structure, cutoff: f64) -> Result<Vec<NeighbourPair>, NeighbourError> {
        self(structure, cutoff)
    }
}

/// Direct search over all periodic images that can fall inside the cutoff.
///
/// Cost is O(N² · images); plenty for tutorial-sized cells. Source atoms are
/// split across the rayon pool once the structure reaches `parallel_threshold`.
#[derive(Clone, Copy, Debug)]
pub struct PeriodicImageSearch {
    pub parallel_threshold: usize,
}

impl Default for PeriodicImageSearch {
    fn default() -> Self {
        Self { parallel_threshold: 256 }
    }
}

impl PeriodicImageSearch {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NeighbourSearch for PeriodicImageSearch {
    fn search(&self, structure: &Structure, cutoff: f64) -> Result<Vec<NeighbourPair>, NeighbourError> {
        check_positive("cutoff", cutoff)?;
        let n = structure.len();
        if n == 0 {
            return Ok(Vec::new());
        }

        let (wrapped, offsets) = wrap_into_cell(structure)?;
        let images = image_translations(structure, cutoff)?;

        let pairs_for = |i: usize| -> Vec<NeighbourPair> {
            let pi = wrapped[i];
            let mut out = Vec::new();
            for (j, pj) in wrapped.iter().enumerate() {
                for (shift, t) in &images {
                    if i == j && *shift == [0, 0, 0] {
                        continue;
                    }
                    let d = linalg::norm([
                        pj[0] + t[0] - pi[0],
                        pj[1] + t[1] - pi[1],
                        pj[2] + t[2] - pi[2],
                    ]);
                    if d <= cutoff {
                        out.push(NeighbourPair {
                            i,
                            j,
                            distance: d,
                            shift: [
                                shift[0] - offsets[j][0] + offsets[i][0],
                                shift[1] - offsets[j][1] + offsets[i][1],
                                shift[2] - offsets[j][2] + offsets[i][2],
                            ],
                        });
                    }
                }
            }
            out
        };

        let pairs: Vec<NeighbourPair> = if n >= self.parallel_threshold {
            (0..n).into_par_iter().flat_map_iter(&pairs_for).collect()
        } else {
            (0..n).flat_map(&pairs_for).collect()
        };

        log::debug!(
            "Neighbour search: {} atoms, cutoff {:.3} Å, {} images, {} pairs",
            n,
            cutoff,
            images.len(),
            pairs.len()
        );
        Ok(pairs)
    }
}

/// Positions folded into the home cell along periodic axes, with the integer
/// cell offset removed from each atom.
fn wrap_into_cell(structure: &Structure) -> Result<(Vec<[f64; 3]>, Vec<[i32; 3]>), NeighbourError> {
    let n = structure.len();
    if !structure.is_periodic() {
        let positions = structure.atoms.iter().map(|a| a.position).collect();
        return Ok((positions, vec![[0; 3]; n]));
    }

    let mut positions = Vec::with_capacity(n);
    let mut offsets = Vec::with_capacity(n);
    for atom in &structure.atoms {
        let mut frac = linalg::cart_to_frac(atom.position, structure.lattice)
            .ok_or(NeighbourError::SingularLattice)?;
        let mut off = [0i32; 3];
        for k in 0..3 {
            if structure.pbc[k] {
                let f = frac[k].floor();
                off[k] = f as i32;
                frac[k] -= f;
            }
        }
        positions.push(linalg::frac_to_cart(frac, structure.lattice));
        offsets.push(off);
    }
    Ok((positions, offsets))
}

/// Every lattice translation that can bring a wrapped atom within `cutoff`.
fn image_translations(structure: &Structure, cutoff: f64) -> Result<Vec<([i32; 3], [f64; 3])>, NeighbourError> {
    if !structure.is_periodic() {
        return Ok(vec![([0; 3], [0.0; 3])]);
    }
    let spacings = linalg::interplanar_spacings(structure.lattice).ok_or(NeighbourError::SingularLattice)?;

    let mut reach = [0i32; 3];
    for k in 0..3 {
        if structure.pbc[k] {
            // Wrapped fractional differences lie in (-1, 1): one extra cell.
            reach[k] = (cutoff / spacings[k]).ceil() as i32 + 1;
        }
    }

    let mut images = Vec::new();
    for sx in -reach[0]..=reach[0] {
        for sy in -reach[1]..=reach[1] {
            for sz in -reach[2]..=reach[2] {
                let shift = [sx, sy, sz];
                let t = linalg::frac_to_cart([sx as f64, sy as f64, sz as f64], structure.lattice);
                images.push((shift, t));
            }
        }
    }
    Ok(images)
}
