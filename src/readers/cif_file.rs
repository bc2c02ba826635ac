//! Reader for the subset of CIF needed to rebuild a simple cell
//!
//! Unlike the POSCAR reader this is a line scan rather than a positional
//! parse. Only three things are picked up:
//!     - the title on the first line, minus any `data_` prefix
//!     - the `_cell_length_a/b/c` values
//!     - the rows of the loop closed by `_atom_site_fract_z`
//!
//! Cell angles are never used. The rebuilt lattice is always orthogonal, so a
//! non-orthogonal cell does not survive a trip through CIF and back.

// internal modules
use crate::error::{Error, Result};
use crate::readers::parsers;
use crate::structure::{Lattice, Structure};
use crate::utils::f;
use crate::vector::Vector3;

// standard library
use std::path::Path;

// external crates
use anyhow::Context;
use itertools::Itertools;
use log::{debug, trace, warn};

/// A line-scanning reader for CIF text
///
/// Missing cell lengths default to 1.0. A file with cell data but no site rows
/// is accepted and gives an empty structure unless
/// [require_sites()](CifReader::require_sites) is set.
///
/// Example:
/// ```rust
/// # use cellconv::readers::CifReader;
/// let text = "data_Na\n_cell_length_a 4.0\nloop_\n_atom_site_label\n_atom_site_fract_x\n_atom_site_fract_y\n_atom_site_fract_z\nNa1 0.5 0.5 0.5\n";
/// let structure = CifReader::new().parse_str(text).unwrap();
/// assert_eq!(structure.title, "Na");
/// assert_eq!(structure.lattice.lengths(), [4.0, 1.0, 1.0]);
/// ```
#[derive(Debug, Default)]
pub struct CifReader {
    /// Fail with [Error::EmptyStructure] rather than accept zero sites
    require_sites: bool,
}

impl CifReader {
    /// Just calls Default::default(), nothing special to be initialised
    pub fn new() -> Self {
        Default::default()
    }

    /// Treat a file without any site rows as an error
    pub fn require_sites(&mut self) {
        debug!("Empty site lists will be rejected");
        self.require_sites = true;
    }

    /// Read and parse a CIF file at `path`
    pub fn parse(&self, path: &Path) -> anyhow::Result<Structure> {
        let text = std::fs::read_to_string(path)
            .with_context(|| f!("Could not open {}", path.display()))?;
        Ok(self.parse_str(&text)?)
    }

    /// Parse the full text of a single CIF data block
    pub fn parse_str(&self, text: &str) -> Result<Structure> {
        let text = text.trim();
        let title = match text.lines().next() {
            Some(line) => parsers::strip_data_prefix(line.trim_end()).to_string(),
            None => return Err(Error::malformed(1, "empty input")),
        };

        let mut scanner = Scanner::default();
        for (index, line) in text.lines().enumerate() {
            scanner.feed(index + 1, line)?;
        }

        if !scanner.found_lengths() && scanner.rows.is_empty() {
            return Err(Error::malformed(
                1,
                "no cell lengths or atom site rows found",
            ));
        }
        if !scanner.found_lengths() {
            warn!("No _cell_length tags found, defaulting to a unit cell");
        }
        scanner.warn_discarded_angles();

        let [a, b, c] = scanner.lengths;
        let mut structure = Structure::new(title, Lattice::orthogonal(a, b, c));
        for (line, row) in &scanner.rows {
            let (symbol, position) = Self::read_site_row(*line, row)?;
            structure.push_site(&symbol, position);
        }

        if structure.is_empty() {
            if self.require_sites {
                return Err(Error::EmptyStructure);
            }
            warn!("No atom sites found, species and coordinates will be empty");
        } else {
            Self::warn_interleaved_species(&scanner.rows);
        }

        debug!(
            "Read {} sites of {} species",
            structure.number_of_sites(),
            structure.species.len()
        );
        Ok(structure)
    }

    /// Label, then fractional x, y, z. Anything after z is ignored.
    fn read_site_row(line: usize, row: &str) -> Result<(String, Vector3)> {
        let tokens: Vec<&str> = row.split_whitespace().collect();
        if tokens.len() < 4 {
            return Err(Error::malformed(
                line,
                f!("site row needs a label and 3 coordinates: \"{row}\""),
            ));
        }

        let symbol = parsers::element_symbol(tokens[0]);
        if symbol.is_empty() {
            return Err(Error::malformed(
                line,
                f!("no chemical symbol in site label \"{}\"", tokens[0]),
            ));
        }

        let position = [
            parsers::parse_cif_number(tokens[1], line)?,
            parsers::parse_cif_number(tokens[2], line)?,
            parsers::parse_cif_number(tokens[3], line)?,
        ];
        Ok((symbol, position))
    }

    /// Species are counted by first appearance but coordinates stay in row
    /// order, so rows like Na, Cl, Na will not line up with the grouped counts
    fn warn_interleaved_species(rows: &[(usize, &str)]) {
        let symbols: Vec<String> = rows
            .iter()
            .filter_map(|(_, row)| row.split_whitespace().next())
            .map(parsers::element_symbol)
            .collect();

        let runs = symbols.iter().dedup().count();
        let unique = symbols.iter().unique().count();
        if runs != unique {
            warn!("Site rows interleave species, coordinates are kept in row order");
        }
    }
}

/// Where the scanner is relative to the atom site loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Outside the site loop, rows are ignored
    Idle,
    /// After `_atom_site_fract_z`, untagged non-empty lines are site rows
    CollectingSites,
}

/// Line-by-line state machine over the CIF text
///
/// `_atom_site_fract_z` moves to [ScanState::CollectingSites] and throws away
/// any rows collected so far, so only the last such loop in the file is kept.
/// A line starting with `loop_` moves back to [ScanState::Idle] without
/// touching the rows. Cell length tags are checked first on every line.
#[derive(Debug)]
struct Scanner<'a> {
    state: ScanState,
    lengths: [f64; 3],
    found: [bool; 3],
    angles: [Option<f64>; 3],
    rows: Vec<(usize, &'a str)>,
}

impl Default for Scanner<'_> {
    fn default() -> Self {
        Self {
            state: ScanState::Idle,
            lengths: [1.0; 3],
            found: [false; 3],
            angles: [None; 3],
            rows: Vec::new(),
        }
    }
}

impl<'a> Scanner<'a> {
    fn feed(&mut self, line_number: usize, line: &'a str) -> Result<()> {
        if let Some(axis) = parsers::cell_length_axis(line) {
            self.read_length(axis, line_number, line)?;
        } else if parsers::is_loop_start(line) {
            self.transition(ScanState::Idle, line_number);
        } else if parsers::is_fract_z(line) {
            self.transition(ScanState::CollectingSites, line_number);
            self.rows.clear();
        } else if self.state == ScanState::CollectingSites && Self::is_site_row(line) {
            trace!("[ Site  ] {}", line.trim());
            self.rows.push((line_number, line.trim()));
        } else if let Some(axis) = parsers::cell_angle_axis(line) {
            // only kept to warn about what gets thrown away
            self.angles[axis] = parsers::last_token(line)
                .and_then(|token| parsers::parse_cif_number(token, line_number).ok());
        }
        Ok(())
    }

    fn transition(&mut self, next: ScanState, line_number: usize) {
        if self.state != next {
            trace!("[ State ] {:?} -> {:?} at line {line_number}", self.state, next);
        }
        self.state = next;
    }

    fn read_length(&mut self, axis: usize, line_number: usize, line: &str) -> Result<()> {
        let token = parsers::last_token(line)
            .ok_or_else(|| Error::malformed(line_number, "cell length tag without a value"))?;
        self.lengths[axis] = parsers::parse_cif_number(token, line_number)?;
        self.found[axis] = true;
        trace!("[Length ] {}", line.trim());
        Ok(())
    }

    fn found_lengths(&self) -> bool {
        self.found.iter().any(|f| *f)
    }

    fn is_site_row(line: &str) -> bool {
        let line = line.trim();
        !line.is_empty() && !parsers::is_tag(line)
    }

    fn warn_discarded_angles(&self) {
        let discarded = self
            .angles
            .iter()
            .flatten()
            .any(|angle| (angle - 90.0).abs() > 1e-6);
        if discarded {
            warn!("Cell angles other than 90 degrees are discarded, the output cell is orthogonal");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::Species;
    use rstest::{fixture, rstest};

    const HEADER: &str = "loop_
  _atom_site_label
  _atom_site_fract_x
  _atom_site_fract_y
  _atom_site_fract_z
";

    #[fixture]
    fn rock_salt() -> String {
        f!(
            "data_NaCl
_symmetry_space_group_name_H-M   'P 1'
_cell_length_a    5.640000
_cell_length_b    5.640000
_cell_length_c    5.640000(3)
_cell_angle_alpha 90.00
_cell_angle_beta  90.00
_cell_angle_gamma 90.00
{HEADER}  Na1 0.000000 0.000000 0.000000
  Na2 0.500000 0.500000 0.000000
  Cl1 0.500000 0.000000 0.000000
  Cl2 0.000000 0.500000 0.000000
"
        )
    }

    #[rstest]
    fn reads_lengths_and_sites(rock_salt: String) {
        let structure = CifReader::new().parse_str(&rock_salt).unwrap();

        assert_eq!(structure.title, "NaCl");
        assert_eq!(structure.scale, 1.0);
        assert_eq!(structure.lattice, Lattice::orthogonal(5.64, 5.64, 5.64));
        assert_eq!(
            structure.species,
            vec![Species::new("Na", 2), Species::new("Cl", 2)]
        );
        assert_eq!(structure.sites[2], [0.5, 0.0, 0.0]);
    }

    #[test]
    fn angles_are_never_used() {
        let text = f!(
            "hexagonal\n_cell_length_a 2.46\n_cell_length_b 2.46\n_cell_length_c 6.7\n_cell_angle_gamma 120.0\n{HEADER}C1 0 0 0\n"
        );
        let structure = CifReader::new().parse_str(&text).unwrap();
        assert_eq!(structure.lattice, Lattice::orthogonal(2.46, 2.46, 6.7));
    }

    #[test]
    fn missing_lengths_default_to_one() {
        let text = f!("title\n{HEADER}Si1 0.1 0.2 0.3\n");
        let structure = CifReader::new().parse_str(&text).unwrap();
        assert_eq!(structure.lattice, Lattice::orthogonal(1.0, 1.0, 1.0));
        assert_eq!(structure.sites, vec![[0.1, 0.2, 0.3]]);
    }

    #[test]
    fn empty_site_loop_is_permissive() {
        let text = f!("data_empty\n_cell_length_a 4.0\n{HEADER}");
        let structure = CifReader::new().parse_str(&text).unwrap();
        assert!(structure.is_empty());
        assert!(structure.species.is_empty());
    }

    #[test]
    fn empty_site_loop_in_strict_mode() {
        let text = f!("data_empty\n_cell_length_a 4.0\n{HEADER}");
        let mut reader = CifReader::new();
        reader.require_sites();
        assert_eq!(reader.parse_str(&text), Err(Error::EmptyStructure));
    }

    #[rstest]
    #[case("")]
    #[case("   \n  ")]
    #[case("just a title\nand some text\n")]
    fn nothing_recognisable(#[case] text: &str) {
        assert!(matches!(
            CifReader::new().parse_str(text),
            Err(Error::MalformedInput { .. })
        ));
    }

    #[test]
    fn later_loop_stops_collection() {
        let text = f!(
            "x\n_cell_length_a 3\n{HEADER}Fe1 0 0 0\nloop_\n_atom_site_aniso_label\nFe1 0.01 0.01 0.01\n"
        );
        let structure = CifReader::new().parse_str(&text).unwrap();
        assert_eq!(structure.number_of_sites(), 1);
    }

    #[test]
    fn second_site_loop_replaces_the_first() {
        let text = f!("x\n_cell_length_a 3\n{HEADER}Fe1 0 0 0\n{HEADER}O1 0.5 0.5 0.5\n");
        let structure = CifReader::new().parse_str(&text).unwrap();
        assert_eq!(structure.species, vec![Species::new("O", 1)]);
        assert_eq!(structure.sites, vec![[0.5, 0.5, 0.5]]);
    }

    #[test]
    fn extra_columns_after_z_are_ignored() {
        let text = f!(
            "x\n_cell_length_a 3\n{HEADER}  _atom_site_occupancy\nZn1 0.1 0.2 0.3 1.0\n"
        );
        let structure = CifReader::new().parse_str(&text).unwrap();
        assert_eq!(structure.sites, vec![[0.1, 0.2, 0.3]]);
    }

    #[test]
    fn interleaved_rows_keep_row_order() {
        let text = f!("x\n_cell_length_a 3\n{HEADER}Na1 0 0 0\nCl1 0.5 0 0\nNa2 0.5 0.5 0\n");
        let structure = CifReader::new().parse_str(&text).unwrap();
        assert_eq!(
            structure.species,
            vec![Species::new("Na", 2), Species::new("Cl", 1)]
        );
        assert_eq!(
            structure.sites,
            vec![[0.0, 0.0, 0.0], [0.5, 0.0, 0.0], [0.5, 0.5, 0.0]]
        );
    }

    #[rstest]
    #[case("Na1 0.5 x 0.5", Error::numeric(10, "x"))]
    #[case("_cell_length_b four", Error::numeric(10, "four"))]
    fn bad_numbers(#[case] row: &str, #[case] expected: Error) {
        let text = f!("x\n_cell_length_a 3\n{HEADER}Na2 0 0 0\n\n{row}\n");
        assert_eq!(CifReader::new().parse_str(&text), Err(expected));
    }

    #[rstest]
    #[case("Na1 0.5 0.5")]
    #[case("12 0.5 0.5 0.5")]
    fn bad_rows(#[case] row: &str) {
        let text = f!("x\n_cell_length_a 3\n{HEADER}{row}\n");
        assert!(matches!(
            CifReader::new().parse_str(&text),
            Err(Error::MalformedInput { line: 8, .. })
        ));
    }

    #[test]
    fn scanner_transitions() {
        let mut scanner = Scanner::default();
        scanner.feed(1, "loop_").unwrap();
        assert_eq!(scanner.state, ScanState::Idle);
        scanner.feed(2, "Na1 0 0 0").unwrap();
        assert!(scanner.rows.is_empty());

        scanner.feed(3, "_atom_site_fract_z").unwrap();
        assert_eq!(scanner.state, ScanState::CollectingSites);
        scanner.feed(4, "").unwrap();
        scanner.feed(5, "_atom_site_occupancy").unwrap();
        scanner.feed(6, "  Na1 0 0 0  ").unwrap();
        assert_eq!(scanner.rows, vec![(6, "Na1 0 0 0")]);

        scanner.feed(7, "  loop_").unwrap();
        assert_eq!(scanner.state, ScanState::Idle);
        assert_eq!(scanner.rows.len(), 1);
    }
}
