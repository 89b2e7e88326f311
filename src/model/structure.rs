use crate::utils::linalg;
use serde::{Deserialize, Serialize};

fn default_pbc() -> [bool; 3] {
    [true; 3]
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Atom {
    pub element: String,
    pub position: [f64; 3],
}

impl Atom {
    pub fn new(element: impl Into<String>, position: [f64; 3]) -> Self {
        Self {
            element: element.into(),
            position,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Structure {
    // Lattice vectors: [a_vec, b_vec, c_vec]
    pub lattice: [[f64; 3]; 3],
    pub atoms: Vec<Atom>,
    // Periodicity along a, b, c
    #[serde(default = "default_pbc")]
    pub pbc: [bool; 3],
    // Display name shown in tooltips (may be empty)
    #[serde(default)]
    pub name: String,
}

impl Structure {
    /// Fully periodic structure.
    pub fn periodic(lattice: [[f64; 3]; 3], atoms: Vec<Atom>) -> Self {
        Self {
            lattice,
            atoms,
            pbc: [true; 3],
            name: String::new(),
        }
    }

    /// Isolated cluster; the lattice only frames the display.
    pub fn molecule(lattice: [[f64; 3]; 3], atoms: Vec<Atom>) -> Self {
        Self {
            lattice,
            atoms,
            pbc: [false; 3],
            name: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn is_periodic(&self) -> bool {
        self.pbc.iter().any(|&p| p)
    }

    /// Distance between atoms `i` and `j`.
    ///
    /// With `mic` the minimum-image convention is applied along the periodic
    /// axes. Panics if either index is out of range.
    pub fn distance(&self, i: usize, j: usize, mic: bool) -> f64 {
        let delta = linalg::sub(self.atoms[j].position, self.atoms[i].position);
        if mic && self.is_periodic() {
            linalg::norm(linalg::minimum_image(delta, self.lattice, self.pbc))
        } else {
            linalg::norm(delta)
        }
    }

    /// Distances from atom `i` to every atom listed in `others`, in order.
    pub fn distances(&self, i: usize, others: &[usize], mic: bool) -> Vec<f64> {
        others.iter().map(|&j| self.distance(i, j, mic)).collect()
    }

    /// Reduced formula string, elements sorted alphabetically (e.g. "O2 Si1").
    pub fn formula(&self) -> String {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for atom in &self.atoms {
            match counts.iter_mut().find(|(el, _)| *el == atom.element) {
                Some((_, n)) => *n += 1,
                None => counts.push((atom.element.clone(), 1)),
            }
        }
        counts.sort_by(|a, b| a.0.cmp(&b.0));
        counts
            .iter()
            .map(|(el, n)| format!("{}{}", el, n))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Geometric centre of the atoms, or the origin for an empty structure.
    pub fn centroid(&self) -> [f64; 3] {
        let mut sum = [0.0; 3];
        for a in &self.atoms {
            sum[0] += a.position[0];
            sum[1] += a.position[1];
            sum[2] += a.position[2];
        }
        let n = self.atoms.len() as f64;
        if n > 0.0 {
            [sum[0] / n, sum[1] / n, sum[2] / n]
        } else {
            [0.0; 3]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cubic(a: f64) -> [[f64; 3]; 3] {
        [[a, 0.0, 0.0], [0.0, a, 0.0], [0.0, 0.0, a]]
    }

    #[test]
    fn test_distance_with_and_without_mic() {
        let s = Structure::periodic(
            cubic(4.0),
            vec![Atom::new("Na", [0.1, 0.0, 0.0]), Atom::new("Cl", [3.9, 0.0, 0.0])],
        );
        assert!((s.distance(0, 1, false) - 3.8).abs() < 1e-10);
        assert!((s.distance(0, 1, true) - 0.2).abs() < 1e-10);
        assert!(s.distance(1, 1, true).abs() < 1e-12);
    }

    #[test]
    fn test_molecule_ignores_mic() {
        let s = Structure::molecule(
            cubic(4.0),
            vec![Atom::new("H", [0.1, 0.0, 0.0]), Atom::new("H", [3.9, 0.0, 0.0])],
        );
        assert!((s.distance(0, 1, true) - 3.8).abs() < 1e-10);
    }

    #[test]
    fn test_formula_and_centroid() {
        let s = Structure::molecule(
            cubic(10.0),
            vec![
                Atom::new("O", [0.0, 0.0, 0.0]),
                Atom::new("H", [1.0, 0.0, 0.0]),
                Atom::new("H", [0.0, 1.0, 0.0]),
            ],
        );
        assert_eq!(s.formula(), "H2 O1");
        let c = s.centroid();
        assert!((c[0] - 1.0 / 3.0).abs() < 1e-12);
        assert!((c[1] - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(c[2], 0.0);
    }
}
