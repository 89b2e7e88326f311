// src/model/elements.rs

/// Static per-element data used by the viewer and the symmetry report.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementData {
    pub symbol: &'static str,
    pub number: u8,
    /// Covalent radius in Angstroms
    pub covalent_radius: f64,
    /// CPK colour
    pub color: (f64, f64, f64),
}

const fn el(symbol: &'static str, number: u8, covalent_radius: f64, color: (f64, f64, f64)) -> ElementData {
    ElementData { symbol, number, covalent_radius, color }
}

// Covalent radii (Cordero 2008, single bond), CPK/Jmol colours.
static ELEMENTS: &[ElementData] = &[
    el("H", 1, 0.31, (1.00, 1.00, 1.00)),
    el("He", 2, 0.28, (0.85, 1.00, 1.00)),
    el("Li", 3, 1.28, (0.80, 0.50, 1.00)),
    el("Be", 4, 0.96, (0.76, 1.00, 0.00)),
    el("B", 5, 0.84, (1.00, 0.71, 0.71)),
    el("C", 6, 0.76, (0.56, 0.56, 0.56)),
    el("N", 7, 0.71, (0.19, 0.31, 0.97)),
    el("O", 8, 0.66, (1.00, 0.05, 0.05)),
    el("F", 9, 0.57, (0.56, 0.88, 0.31)),
    el("Ne", 10, 0.58, (0.70, 0.89, 0.96)),
    el("Na", 11, 1.66, (0.67, 0.36, 0.95)),
    el("Mg", 12, 1.41, (0.54, 1.00, 0.00)),
    el("Al", 13, 1.21, (0.75, 0.65, 0.65)),
    el("Si", 14, 1.11, (0.94, 0.78, 0.63)),
    el("P", 15, 1.07, (1.00, 0.50, 0.00)),
    el("S", 16, 1.05, (1.00, 1.00, 0.19)),
    el("Cl", 17, 1.02, (0.12, 0.94, 0.12)),
    el("Ar", 18, 1.06, (0.50, 0.82, 0.89)),
    el("K", 19, 2.03, (0.56, 0.25, 0.83)),
    el("Ca", 20, 1.76, (0.24, 1.00, 0.00)),
    el("Sc", 21, 1.70, (0.90, 0.90, 0.90)),
    el("Ti", 22, 1.60, (0.75, 0.76, 0.78)),
    el("V", 23, 1.53, (0.65, 0.65, 0.67)),
    el("Cr", 24, 1.39, (0.54, 0.60, 0.78)),
    el("Mn", 25, 1.39, (0.61, 0.48, 0.78)),
    el("Fe", 26, 1.32, (0.88, 0.40, 0.20)),
    el("Co", 27, 1.26, (0.94, 0.56, 0.63)),
    el("Ni", 28, 1.24, (0.31, 0.82, 0.31)),
    el("Cu", 29, 1.32, (0.78, 0.50, 0.20)),
    el("Zn", 30, 1.22, (0.49, 0.50, 0.69)),
    el("Ga", 31, 1.22, (0.76, 0.56, 0.56)),
    el("Ge", 32, 1.20, (0.40, 0.56, 0.56)),
    el("As", 33, 1.19, (0.74, 0.50, 0.89)),
    el("Se", 34, 1.20, (1.00, 0.63, 0.00)),
    el("Br", 35, 1.20, (0.65, 0.16, 0.16)),
    el("Kr", 36, 1.16, (0.36, 0.72, 0.82)),
    el("Sr", 38, 1.95, (0.00, 1.00, 0.00)),
    el("Zr", 40, 1.75, (0.58, 0.88, 0.88)),
    el("Mo", 42, 1.54, (0.33, 0.71, 0.71)),
    el("Ag", 47, 1.45, (0.75, 0.75, 0.75)),
    el("Sn", 50, 1.39, (0.40, 0.50, 0.50)),
    el("I", 53, 1.39, (0.58, 0.00, 0.58)),
    el("Ba", 56, 2.15, (0.00, 0.79, 0.00)),
    el("Pt", 78, 1.36, (0.82, 0.82, 0.88)),
    el("Au", 79, 1.36, (1.00, 0.82, 0.14)),
    el("Pb", 82, 1.46, (0.34, 0.35, 0.38)),
];

// Hot pink for anything not in the table
const UNKNOWN: ElementData = el("X", 0, 1.00, (1.00, 0.08, 0.58));

/// Looks up an element by symbol; labels like "Fe1" or "fe" are normalised.
pub fn lookup(symbol: &str) -> ElementData {
    let letters: String = symbol.chars().take_while(|c| c.is_ascii_alphabetic()).collect();
    let mut chars = letters.chars();
    let normalised = match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase(),
        None => return UNKNOWN,
    };
    ELEMENTS
        .iter()
        .find(|e| e.symbol == normalised)
        .copied()
        .unwrap_or(UNKNOWN)
}

pub fn covalent_radius(symbol: &str) -> f64 {
    lookup(symbol).covalent_radius
}

pub fn atomic_number(symbol: &str) -> u8 {
    lookup(symbol).number
}

pub fn cpk_color(symbol: &str) -> (f64, f64, f64) {
    lookup(symbol).color
}
