//! CIF text generation
//!
//! Output is a single P 1 data block. The title goes on the first line as-is
//! with spaces replaced by underscores, there is deliberately no `data_`
//! prefix. Sites are written in the species order of the structure and
//! labelled `<symbol><n>` with `n` restarting at 1 for every species.

// internal modules
use crate::error::Result;
use crate::structure::Structure;
use crate::utils::{f, underscored};

// external crates
use log::debug;

/// Fixed header lines for a structure without symmetry
const SPACE_GROUP: [&str; 2] = [
    "_symmetry_space_group_name_H-M   'P 1'",
    "_symmetry_Int_Tables_number      1",
];

/// Loop header for the atom site rows
const SITE_LOOP: [&str; 5] = [
    "loop_",
    "  _atom_site_label",
    "  _atom_site_fract_x",
    "  _atom_site_fract_y",
    "  _atom_site_fract_z",
];

/// Render a structure as CIF text
///
/// Cell lengths are derived from the scaled lattice and written to 6 decimal
/// places, angles to 2. Fractional coordinates are written unchanged, the
/// scale factor only applies to the lattice. Lines are joined with `\n` and
/// there is no trailing newline.
///
/// ```rust
/// # use cellconv::structure::{Lattice, Structure};
/// # use cellconv::writers::cif_text;
/// let mut structure = Structure::new("Silicon", Lattice::orthogonal(5.0, 5.0, 5.0));
/// structure.push_site("Si", [0.0, 0.0, 0.0]);
///
/// let cif = cif_text(&structure).unwrap();
/// assert!(cif.contains("_cell_length_a    5.000000"));
/// assert!(cif.ends_with("  Si1 0.000000 0.000000 0.000000"));
/// ```
pub fn cif_text(structure: &Structure) -> Result<String> {
    structure.check_counts()?;
    let cell = structure.cell_parameters()?;
    debug!("Cell parameters {cell:?}");

    let mut lines = Vec::with_capacity(12 + structure.number_of_sites());
    lines.push(underscored(&structure.title));
    lines.extend(SPACE_GROUP.iter().map(|s| s.to_string()));

    lines.push(f!("_cell_length_a    {:.6}", cell.a));
    lines.push(f!("_cell_length_b    {:.6}", cell.b));
    lines.push(f!("_cell_length_c    {:.6}", cell.c));
    lines.push(f!("_cell_angle_alpha {:.2}", cell.alpha));
    lines.push(f!("_cell_angle_beta  {:.2}", cell.beta));
    lines.push(f!("_cell_angle_gamma {:.2}", cell.gamma));

    lines.extend(SITE_LOOP.iter().map(|s| s.to_string()));
    for (label, [x, y, z]) in structure.site_labels().iter().zip(&structure.sites) {
        lines.push(f!("  {label} {x:.6} {y:.6} {z:.6}"));
    }

    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::structure::{Lattice, Species};
    use rstest::rstest;

    #[test]
    fn full_layout() {
        let mut structure = Structure::new("Rock salt", Lattice::orthogonal(2.82, 2.82, 2.82));
        structure.scale = 2.0;
        structure.push_site("Na", [0.0, 0.0, 0.0]);
        structure.push_site("Cl", [0.5, 0.5, 0.5]);

        let expected = "Rock_salt
_symmetry_space_group_name_H-M   'P 1'
_symmetry_Int_Tables_number      1
_cell_length_a    5.640000
_cell_length_b    5.640000
_cell_length_c    5.640000
_cell_angle_alpha 90.00
_cell_angle_beta  90.00
_cell_angle_gamma 90.00
loop_
  _atom_site_label
  _atom_site_fract_x
  _atom_site_fract_y
  _atom_site_fract_z
  Na1 0.000000 0.000000 0.000000
  Cl1 0.500000 0.500000 0.500000";

        assert_eq!(cif_text(&structure).unwrap(), expected);
    }

    #[test]
    fn labels_follow_species_groups() {
        let mut structure = Structure::new("t", Lattice::orthogonal(1.0, 1.0, 1.0));
        structure.species = vec![Species::new("O", 2), Species::new("Ti", 1)];
        structure.sites = vec![[0.3, 0.3, 0.0], [0.7, 0.7, 0.0], [0.0, 0.0, 0.0]];

        let cif = cif_text(&structure).unwrap();
        let rows: Vec<&str> = cif.lines().skip(14).collect();
        assert_eq!(
            rows,
            vec![
                "  O1 0.300000 0.300000 0.000000",
                "  O2 0.700000 0.700000 0.000000",
                "  Ti1 0.000000 0.000000 0.000000",
            ]
        );
    }

    #[rstest]
    #[case(Lattice::new([1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 1.0]))]
    #[case(Lattice::orthogonal(0.0, 0.0, 0.0))]
    fn degenerate_lattice(#[case] lattice: Lattice) {
        let structure = Structure::new("flat", lattice);
        assert!(matches!(
            cif_text(&structure),
            Err(Error::DegenerateGeometry { .. })
        ));
    }

    #[test]
    fn counts_must_match_sites() {
        let mut structure = Structure::new("t", Lattice::orthogonal(1.0, 1.0, 1.0));
        structure.species = vec![Species::new("O", 2)];
        structure.sites = vec![[0.0; 3]];
        assert!(matches!(
            cif_text(&structure),
            Err(Error::MalformedInput { .. })
        ));
    }
}
