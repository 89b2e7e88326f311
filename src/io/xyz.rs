// src/io/xyz.rs
//
// Extended XYZ: atom count, a comment line that may carry
// Lattice="ax ay az bx by bz cx cy cz" and pbc="T T T", then one atom per line.

use super::{invalid, parse_f64};
use crate::model::{Atom, Structure};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Box used for display when the file carries no lattice (Å)
pub const DEFAULT_BOX: f64 = 20.0;

pub fn parse(path: &Path) -> io::Result<Structure> {
    from_reader(BufReader::new(File::open(path)?))
}

// Value of key="..." in the comment line
fn quoted_value<'a>(comment: &'a str, key: &str) -> Option<&'a str> {
    let lower = comment.to_ascii_lowercase();
    let start = lower.find(&format!("{}=\"", key.to_ascii_lowercase()))? + key.len() + 2;
    let len = comment[start..].find('"')?;
    Some(&comment[start..start + len])
}

fn parse_pbc(value: &str) -> io::Result<[bool; 3]> {
    let flags: Vec<bool> = value
        .split_whitespace()
        .map(|t| match t {
            "T" | "t" | "True" | "true" | "1" => Ok(true),
            "F" | "f" | "False" | "false" | "0" => Ok(false),
            _ => Err(invalid(format!("Invalid pbc flag '{}'", t))),
        })
        .collect::<io::Result<_>>()?;
    match flags.as_slice() {
        [a, b, c] => Ok([*a, *b, *c]),
        _ => Err(invalid("pbc needs three flags")),
    }
}

pub fn from_reader<R: BufRead>(reader: R) -> io::Result<Structure> {
    let mut lines = reader.lines();

    let count_line = lines.next().ok_or_else(|| invalid("Empty XYZ file"))??;
    let n_atoms: usize = count_line
        .trim()
        .parse()
        .map_err(|_| invalid("Invalid atom count"))?;

    let comment = lines.next().transpose()?.unwrap_or_default();

    let lattice = match quoted_value(&comment, "Lattice") {
        Some(text) => {
            let parts: Vec<f64> = text
                .split_whitespace()
                .map(|t| t.parse::<f64>().map_err(|_| invalid("Invalid Lattice entry")))
                .collect::<io::Result<_>>()?;
            if parts.len() != 9 {
                return Err(invalid("Lattice needs nine numbers"));
            }
            Some([
                [parts[0], parts[1], parts[2]],
                [parts[3], parts[4], parts[5]],
                [parts[6], parts[7], parts[8]],
            ])
        }
        None => None,
    };
    let pbc = match quoted_value(&comment, "pbc") {
        Some(text) => Some(parse_pbc(text)?),
        None => None,
    };

    let mut atoms = Vec::with_capacity(n_atoms);
    for line in lines {
        if atoms.len() == n_atoms {
            break;
        }
        let line = line?;
        let mut parts = line.split_whitespace();
        let Some(element) = parts.next() else {
            continue;
        };
        let x = parse_f64(parts.next(), "X")?;
        let y = parse_f64(parts.next(), "Y")?;
        let z = parse_f64(parts.next(), "Z")?;
        atoms.push(Atom::new(element, [x, y, z]));
    }
    if atoms.len() != n_atoms {
        return Err(invalid(format!(
            "Expected {} atoms, found {}",
            n_atoms,
            atoms.len()
        )));
    }

    let structure = match lattice {
        Some(lattice) => Structure {
            pbc: pbc.unwrap_or([true; 3]),
            ..Structure::periodic(lattice, atoms)
        },
        None => {
            let b = DEFAULT_BOX;
            Structure::molecule([[b, 0.0, 0.0], [0.0, b, 0.0], [0.0, 0.0, b]], atoms)
        }
    };
    Ok(structure)
}

pub fn write(path: &Path, structure: &Structure) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    to_writer(&mut out, structure)?;
    out.flush()
}

pub fn to_writer<W: Write>(out: &mut W, structure: &Structure) -> io::Result<()> {
    writeln!(out, "{}", structure.len())?;
    let l = structure.lattice;
    let flag = |p: bool| if p { "T" } else { "F" };
    if structure.pbc.iter().any(|&p| p) {
        writeln!(
            out,
            "Lattice=\"{} {} {} {} {} {} {} {} {}\" pbc=\"{} {} {}\"",
            l[0][0], l[0][1], l[0][2], l[1][0], l[1][1], l[1][2], l[2][0], l[2][1], l[2][2],
            flag(structure.pbc[0]),
            flag(structure.pbc[1]),
            flag(structure.pbc[2])
        )?;
    } else {
        writeln!(out, "{}", structure.name)?;
    }
    for atom in &structure.atoms {
        let p = atom.position;
        writeln!(out, "{:<3} {:14.8} {:14.8} {:14.8}", atom.element, p[0], p[1], p[2])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_xyz_is_a_molecule() {
        let text = "3\nwater\nO 0.0 0.0 0.0\nH 0.96 0.0 0.0\nH -0.24 0.93 0.0\n";
        let s = from_reader(text.as_bytes()).unwrap();
        assert_eq!(s.len(), 3);
        assert_eq!(s.pbc, [false; 3]);
        assert_eq!(s.lattice[0][0], DEFAULT_BOX);
        assert_eq!(s.atoms[2].element, "H");
    }

    #[test]
    fn test_extended_header() {
        let text = "2\nLattice=\"4 0 0 0 4 0 0 0 10\" pbc=\"T T F\" Properties=species:S:1:pos:R:3\n\
                    Na 0 0 0\nCl 2 2 2\n";
        let s = from_reader(text.as_bytes()).unwrap();
        assert_eq!(s.lattice[2][2], 10.0);
        assert_eq!(s.pbc, [true, true, false]);

        let only_lattice = "1\nLattice=\"3 0 0 0 3 0 0 0 3\"\nCu 0 0 0\n";
        assert_eq!(from_reader(only_lattice.as_bytes()).unwrap().pbc, [true; 3]);
    }

    #[test]
    fn test_malformed_input() {
        let bad = |text: &str| from_reader(text.as_bytes()).unwrap_err().kind();
        assert_eq!(bad(""), io::ErrorKind::InvalidData);
        assert_eq!(bad("two\n\n"), io::ErrorKind::InvalidData);
        assert_eq!(bad("2\n\nH 0 0 0\n"), io::ErrorKind::InvalidData);
        assert_eq!(bad("1\n\nH 0 zero 0\n"), io::ErrorKind::InvalidData);
        assert_eq!(bad("1\nLattice=\"1 2 3\"\nH 0 0 0\n"), io::ErrorKind::InvalidData);
        assert_eq!(bad("1\nLattice=\"1 0 0 0 1 0 0 0 1\" pbc=\"T X T\"\nH 0 0 0\n"), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_writer_keeps_periodicity() {
        let text = "1\nLattice=\"3 0 0 0 3 0 0 0 3\" pbc=\"T F T\"\nCu 0.5 0 0\n";
        let s = from_reader(text.as_bytes()).unwrap();
        let mut buf = Vec::new();
        to_writer(&mut buf, &s).unwrap();
        let back = from_reader(buf.as_slice()).unwrap();
        assert_eq!(back.pbc, [true, false, true]);
        assert_eq!(back.atoms[0].position, [0.5, 0.0, 0.0]);
    }
}
