// src/io/poscar.rs

use super::{invalid, parse_f64};
use crate::model::{Atom, Structure};
use crate::utils::linalg::{self, cart_to_frac, frac_to_cart};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

pub fn parse(path: &Path) -> io::Result<Structure> {
    from_reader(BufReader::new(File::open(path)?))
}

pub fn from_reader<R: BufRead>(reader: R) -> io::Result<Structure> {
    let mut lines = reader.lines();
    let mut next_line = |what: &str| -> io::Result<String> {
        lines
            .next()
            .ok_or_else(|| invalid(format!("Missing {}", what)))?
    };

    let comment = next_line("comment")?;

    let scale_line = next_line("scale")?;
    let scale = parse_f64(scale_line.split_whitespace().next(), "scale")?;
    if scale == 0.0 {
        return Err(invalid("Scale must be non-zero"));
    }

    let mut lattice = [[0.0; 3]; 3];
    for row in lattice.iter_mut() {
        let line = next_line("lattice")?;
        let mut parts = line.split_whitespace();
        for v in row.iter_mut() {
            *v = parse_f64(parts.next(), "lattice")?;
        }
    }
    // Negative scale is the target cell volume
    let factor = if scale < 0.0 {
        let volume = linalg::lattice_matrix(lattice).determinant().abs();
        if volume < linalg::SINGULAR_EPS {
            return Err(invalid("Degenerate lattice"));
        }
        (-scale / volume).cbrt()
    } else {
        scale
    };
    for row in lattice.iter_mut() {
        for v in row.iter_mut() {
            *v *= factor;
        }
    }

    let line6 = next_line("counts")?;
    let has_symbols = line6
        .split_whitespace()
        .next()
        .and_then(|t| t.chars().next())
        .is_some_and(|c| c.is_alphabetic());
    let (symbols, counts_line) = if has_symbols {
        let symbols: Vec<String> = line6.split_whitespace().map(str::to_string).collect();
        (symbols, next_line("counts")?)
    } else {
        (Vec::new(), line6)
    };
    let counts: Vec<usize> = counts_line
        .split_whitespace()
        .map(|t| t.parse().map_err(|_| invalid("Invalid atom count")))
        .collect::<io::Result<_>>()?;

    let mut mode_line = next_line("coordinate mode")?;
    if mode_line.trim_start().starts_with(['s', 'S']) {
        mode_line = next_line("coordinate mode")?;
    }
    let is_direct = mode_line.trim_start().starts_with(['d', 'D']);

    let mut atoms = Vec::with_capacity(counts.iter().sum());
    for (species, &count) in counts.iter().enumerate() {
        let element = symbols.get(species).map(String::as_str).unwrap_or("X");
        for _ in 0..count {
            let line = next_line("atom position")?;
            let mut parts = line.split_whitespace();
            let mut p = [0.0; 3];
            for v in p.iter_mut() {
                *v = parse_f64(parts.next(), "atom position")?;
            }
            let position = if is_direct {
                frac_to_cart(p, lattice)
            } else {
                p.map(|v| v * factor)
            };
            atoms.push(Atom::new(element, position));
        }
    }

    Ok(Structure::periodic(lattice, atoms).with_name(comment.trim()))
}

pub fn write(path: &Path, structure: &Structure) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    to_writer(&mut out, structure)?;
    out.flush()
}

/// Writes Direct coordinates. Consecutive runs of one element form a species
/// block, so atom order (and thus atom indices) survives a round trip.
pub fn to_writer<W: Write>(out: &mut W, structure: &Structure) -> io::Result<()> {
    let title = if structure.name.is_empty() {
        "Exported by nbmap"
    } else {
        structure.name.as_str()
    };
    writeln!(out, "{}", title)?;
    writeln!(out, "1.0")?;
    for v in &structure.lattice {
        writeln!(out, " {:14.8} {:14.8} {:14.8}", v[0], v[1], v[2])?;
    }

    let mut blocks: Vec<(&str, usize)> = Vec::new();
    for atom in &structure.atoms {
        match blocks.last_mut() {
            Some((el, n)) if *el == atom.element => *n += 1,
            _ => blocks.push((atom.element.as_str(), 1)),
        }
    }
    let labels: Vec<String> = blocks.iter().map(|(el, _)| format!("{:<4}", el)).collect();
    let counts: Vec<String> = blocks.iter().map(|(_, n)| format!("{:<4}", n)).collect();
    writeln!(out, " {}", labels.join(" "))?;
    writeln!(out, " {}", counts.join(" "))?;

    writeln!(out, "Direct")?;
    for atom in &structure.atoms {
        let f = cart_to_frac(atom.position, structure.lattice)
            .ok_or_else(|| invalid("Cannot write Direct coordinates for a degenerate lattice"))?;
        writeln!(out, " {:14.10} {:14.10} {:14.10}", f[0], f[1], f[2])?;
    }
    Ok(())
}
