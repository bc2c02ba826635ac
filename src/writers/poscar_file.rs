//! POSCAR text generation

// internal modules
use crate::error::Result;
use crate::structure::Structure;
use crate::utils::{f, fixed_or_zero};

// external crates
use itertools::Itertools;
use log::debug;

/// Render a structure as POSCAR text
///
/// The scale factor is folded into the lattice vectors so the scale line is
/// always `1.0`. Exact zero components off the diagonal are written as `0.0`,
/// so a cell read from CIF comes out as `a 0.0 0.0` / `0.0 b 0.0` / `0.0 0.0 c`.
/// Diagonal components are always fixed point, even when zero.
///
/// Coordinates are written in the order they are stored, one per line, always
/// as `Direct`. An empty structure still produces the symbol, count and
/// coordinate system lines, just with nothing on the first two.
///
/// ```rust
/// # use cellconv::structure::{Lattice, Structure};
/// # use cellconv::writers::poscar_text;
/// let mut structure = Structure::new("Na", Lattice::orthogonal(4.0, 4.0, 4.0));
/// structure.push_site("Na", [0.5, 0.5, 0.5]);
///
/// let poscar = poscar_text(&structure).unwrap();
/// assert!(poscar.starts_with("Na\n1.0\n4.000000 0.0 0.0\n"));
/// ```
pub fn poscar_text(structure: &Structure) -> Result<String> {
    structure.check_counts()?;

    let mut s = f!("{}\n1.0\n", structure.title);
    for (i, vector) in structure.scaled_lattice().vectors().iter().enumerate() {
        s += &vector
            .iter()
            .enumerate()
            .map(|(j, x)| match i == j {
                true => f!("{x:.6}"),
                false => fixed_or_zero(*x, 6),
            })
            .join(" ");
        s.push('\n');
    }

    s += &structure.species.iter().map(|sp| &sp.symbol).join(" ");
    s.push('\n');
    s += &structure.species.iter().map(|sp| sp.count).join(" ");
    s.push('\n');
    s += "Direct\n";

    for [x, y, z] in &structure.sites {
        s += &f!("{x:.6} {y:.6} {z:.6}\n");
    }

    debug!("Wrote {} coordinate lines", structure.number_of_sites());
    Ok(s)
}
