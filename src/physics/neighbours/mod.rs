// src/physics/neighbours/mod.rs
//
// Neighbour lists over (periodic) structures and the neighbourhood matrix
// built around a single atom.

pub mod cutoff;
pub mod matrix;
pub mod search;

use std::fmt;

pub use cutoff::{estimate_cutoff, estimate_cutoff_for, DEFAULT_SEARCH_CUTOFF};
pub use matrix::{build_neighbourhood_map, GraphEdge, MapParams, NeighbourGraph, NeighbourhoodMap};
pub use search::{NeighbourPair, NeighbourSearch, PeriodicImageSearch};

// --- ERROR HANDLING ---

#[derive(Debug, Clone, PartialEq)]
pub enum NeighbourError {
    /// Fewer neighbours inside the search radius than the requested rank needs.
    InsufficientNeighbours { requested: usize, found: usize },
    InvalidIndex { index: usize, atoms: usize },
    InvalidParameter(String),
    EmptyStructure,
    SingularLattice,
}

impl fmt::Display for NeighbourError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NeighbourError::InsufficientNeighbours { requested, found } => write!(
                f,
                "Not enough neighbours: {} requested, {} found within the cutoff (increase the cutoff or lower the size)",
                requested, found
            ),
            NeighbourError::InvalidIndex { index, atoms } => {
                write!(f, "Atom index {} out of range for a structure with {} atoms", index, atoms)
            }
            NeighbourError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            NeighbourError::EmptyStructure => write!(f, "Structure contains no atoms"),
            NeighbourError::SingularLattice => {
                write!(f, "Lattice matrix is singular but the structure is periodic")
            }
        }
    }
}

impl std::error::Error for NeighbourError {}

pub(crate) fn check_atom_index(
    structure: &crate::model::Structure,
    index: usize,
) -> Result<(), NeighbourError> {
    if structure.is_empty() {
        return Err(NeighbourError::EmptyStructure);
    }
    if index >= structure.len() {
        return Err(NeighbourError::InvalidIndex {
            index,
            atoms: structure.len(),
        });
    }
    Ok(())
}

pub(crate) fn check_positive(name: &str, value: f64) -> Result<(), NeighbourError> {
    if !(value.is_finite() && value > 0.0) {
        return Err(NeighbourError::InvalidParameter(format!(
            "{} must be positive, got {}",
            name, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let e = NeighbourError::InsufficientNeighbours { requested: 4, found: 3 };
        assert!(e.to_string().contains("4 requested, 3 found"));

        let e = NeighbourError::InvalidIndex { index: 9, atoms: 5 };
        assert_eq!(e.to_string(), "Atom index 9 out of range for a structure with 5 atoms");
    }

    #[test]
    fn test_check_positive_rejects_nan_and_zero() {
        assert!(check_positive("cutoff", 1.0).is_ok());
        assert!(check_positive("cutoff", 0.0).is_err());
        assert!(check_positive("cutoff", -2.0).is_err());
        assert!(check_positive("cutoff", f64::NAN).is_err());
        assert!(check_positive("cutoff", f64::INFINITY).is_err());
    }
}
