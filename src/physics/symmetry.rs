// src/physics/symmetry.rs

use crate::model::{atomic_number, Structure};
use crate::utils::linalg;
use moyo::base::{AngleTolerance, Cell, Lattice};
use moyo::data::Setting;
use moyo::MoyoDataset;
use nalgebra::Vector3;

/// Default symmetry tolerance (Å)
pub const SYMPREC: f64 = 1e-4;

pub struct SymmetryInfo {
    pub number: i32,
    pub system: &'static str,
}

/// Crystal system of an International Tables space group number.
pub fn crystal_system(number: i32) -> &'static str {
    match number {
        1..=2 => "Triclinic",
        3..=15 => "Monoclinic",
        16..=74 => "Orthorhombic",
        75..=142 => "Tetragonal",
        143..=167 => "Trigonal",
        168..=194 => "Hexagonal",
        195..=230 => "Cubic",
        _ => "Unknown",
    }
}

/// Space group of a fully periodic structure.
pub fn analyze(structure: &Structure) -> Result<SymmetryInfo, String> {
    if structure.pbc != [true; 3] {
        return Err("Space group needs a structure periodic along a, b and c".to_string());
    }
    if structure.is_empty() {
        return Err("Structure contains no atoms".to_string());
    }

    let lattice_mat = linalg::lattice_matrix(structure.lattice);
    let inv_t = lattice_mat
        .transpose()
        .try_inverse()
        .ok_or("Invalid lattice (determinant is zero)")?;

    let mut positions = Vec::with_capacity(structure.len());
    let mut numbers = Vec::with_capacity(structure.len());
    for atom in &structure.atoms {
        positions.push(inv_t * Vector3::from(atom.position));
        // Unknown labels still need a distinct, valid species number
        let z = atomic_number(&atom.element);
        numbers.push(if z == 0 { 1 } else { z as i32 });
    }

    // moyo stores basis vectors as columns
    let cell = Cell::new(Lattice::new(lattice_mat.transpose()), positions, numbers);
    let dataset = MoyoDataset::new(&cell, SYMPREC, AngleTolerance::Default, Setting::Spglib, true)
        .map_err(|_| "Symmetry search failed".to_string())?;

    Ok(SymmetryInfo {
        number: dataset.number,
        system: crystal_system(dataset.number),
    })
}
