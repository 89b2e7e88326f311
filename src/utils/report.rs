// src/utils/report.rs

use crate::model::Structure;
use crate::physics::neighbours::NeighbourhoodMap;
use crate::physics::symmetry;

const LISTED_ATOMS: usize = 20;

/// Text for the console when a file is loaded
pub fn structure_summary(structure: &Structure, filename: &str) -> String {
    let pbc: Vec<&str> = structure
        .pbc
        .iter()
        .map(|&p| if p { "T" } else { "F" })
        .collect();

    let mut out = String::new();
    out.push_str(&format!("File: {}\n", filename));
    if !structure.name.is_empty() {
        out.push_str(&format!("Name: {}\n", structure.name));
    }
    out.push_str(&format!("Formula: {}\n", structure.formula()));
    out.push_str(&format!("Periodic: {}\n", pbc.join(" ")));

    if structure.pbc == [true; 3] {
        match symmetry::analyze(structure) {
            Ok(info) => out.push_str(&format!("Space group: #{} ({})\n", info.number, info.system)),
            Err(e) => out.push_str(&format!("Space group: n/a ({})\n", e)),
        }
    }

    out.push_str("--------------------------------------------------\n");
    out.push_str(&format!(
        "{:<8} {:<8} {:<10} {:<10} {:<10}\n",
        "Index", "Element", "X", "Y", "Z"
    ));
    out.push_str("--------------------------------------------------\n");

    for (i, atom) in structure.atoms.iter().take(LISTED_ATOMS).enumerate() {
        out.push_str(&format!(
            "{:<8} {:<8} {:<10.4} {:<10.4} {:<10.4}\n",
            i, atom.element, atom.position[0], atom.position[1], atom.position[2]
        ));
    }

    if structure.atoms.len() > LISTED_ATOMS {
        out.push_str(&format!(
            "... and {} more atoms.\n",
            structure.atoms.len() - LISTED_ATOMS
        ));
    }

    out
}

pub fn map_summary(map: &NeighbourhoodMap) -> String {
    let (lo, hi) = map.weight_range();
    format!(
        "Neighbour map of atom {}: K = {}, size = {}, radius = {:.4} Å\n\
         Graph: {} nodes, {} edges\n\
         Weights: {:.4} .. {:.4}\n",
        map.target_atom,
        map.order(),
        map.size(),
        map.radius,
        map.graph.nodes.len(),
        map.graph.edges.len(),
        lo,
        hi
    )
}

/// Hover text of an image cell; padding cells report target -1.
pub fn cell_tooltip(map: &NeighbourhoodMap, row: usize, col: usize) -> Option<String> {
    if row >= map.size() || col >= map.size() {
        return None;
    }
    let anchor = map.row_anchors[row];
    Some(format!(
        "index: {}\ntarget: {}\nweight: {:.4}\ndistance: {:.4}",
        anchor,
        map.targets[(row, col)],
        map.weights[(row, col)],
        map.distances[(row, col)]
    ))
}

pub fn node_tooltip(atom: usize) -> String {
    format!("index: {}", atom)
}

pub fn atom_tooltip(structure: &Structure, index: usize) -> Option<String> {
    let atom = structure.atoms.get(index)?;
    if structure.name.is_empty() {
        Some(format!("{} atom index {}", atom.element, index))
    } else {
        Some(format!("{} atom index {}: {}", atom.element, index, structure.name))
    }
}
