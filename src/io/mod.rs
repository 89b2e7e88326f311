// src/io/mod.rs
pub mod poscar;
pub mod xyz;

use crate::model::Structure;
use std::io;
use std::path::Path;

fn is_xyz(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("xyz"))
}

/// Reads `.xyz` as extended XYZ and anything else as POSCAR. Structures
/// without a name take the file stem.
pub fn load_structure(path: &Path) -> io::Result<Structure> {
    let mut structure = if is_xyz(path) {
        xyz::parse(path)?
    } else {
        poscar::parse(path)?
    };
    if structure.name.is_empty() {
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            structure.name = stem.to_string();
        }
    }
    log::info!("Loaded {} atoms from {:?}", structure.len(), path);
    Ok(structure)
}

pub fn save_structure(path: &Path, structure: &Structure) -> io::Result<()> {
    if is_xyz(path) {
        xyz::write(path, structure)
    } else {
        poscar::write(path, structure)
    }
}

pub(crate) fn invalid(msg: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg.into())
}

pub(crate) fn parse_f64(token: Option<&str>, what: &str) -> io::Result<f64> {
    token
        .and_then(|t| t.parse::<f64>().ok())
        .ok_or_else(|| invalid(format!("Invalid {}", what)))
}
