// src/physics/neighbours/cutoff.rs

use super::{check_atom_index, check_positive, NeighbourError, NeighbourSearch};
use crate::model::Structure;

/// Search radius used when the caller has no better estimate (Å)
pub const DEFAULT_SEARCH_CUTOFF: f64 = 10.0;

/// Distance to the `n`-th nearest neighbour (0-indexed) of atom 0.
///
/// `cutoff` must be wide enough to contain at least `n + 1` neighbours,
/// otherwise `InsufficientNeighbours` is returned.
pub fn estimate_cutoff<S: NeighbourSearch + ?Sized>(
    structure: &Structure,
    search: &S,
    n: usize,
    cutoff: f64,
) -> Result<f64, NeighbourError> {
    estimate_cutoff_for(structure, search, 0, n, cutoff)
}

/// Distance to the `n`-th nearest neighbour of `centre`.
pub fn estimate_cutoff_for<S: NeighbourSearch + ?Sized>(
    structure: &Structure,
    search: &S,
    centre: usize,
    n: usize,
    cutoff: f64,
) -> Result<f64, NeighbourError> {
    let distances = sorted_distances_from(structure, search, centre, cutoff)?;
    distances
        .get(n)
        .copied()
        .ok_or(NeighbourError::InsufficientNeighbours {
            requested: n + 1,
            found: distances.len(),
        })
}

/// Ascending neighbour distances of `centre` within `cutoff`.
pub(crate) fn sorted_distances_from<S: NeighbourSearch + ?Sized>(
    structure: &Structure,
    search: &S,
    centre: usize,
    cutoff: f64,
) -> Result<Vec<f64>, NeighbourError> {
    check_atom_index(structure, centre)?;
    check_positive("cutoff", cutoff)?;

    let mut distances: Vec<f64> = search
        .search(structure, cutoff)?
        .into_iter()
        .filter(|p| p.i == centre)
        .map(|p| p.distance)
        .collect();
    distances.sort_by(f64::total_cmp);
    Ok(distances)
}
