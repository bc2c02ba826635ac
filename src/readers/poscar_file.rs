//! Reader for VASP POSCAR style structure files
//!
//! The layout is fixed by line position, after trimming the text as a whole:
//!
//! ```text
//! 0    title
//! 1    scale factor
//! 2-4  lattice vectors a, b, c
//! 5    species symbols
//! 6    atoms per species
//! 7    coordinate system (Direct)
//! 8..  one fractional coordinate per site
//! ```

// internal modules
use crate::error::{Error, Result};
use crate::readers::parsers;
use crate::structure::{Lattice, Species, Structure};
use crate::utils::f;
use crate::vector::Vector3;

// standard library
use std::path::Path;

// external crates
use anyhow::Context;
use log::{debug, trace, warn};

/// Line index of the first coordinate row
const COORDINATE_START: usize = 8;

/// A simple reader for POSCAR text
#[derive(Debug, Default)]
pub struct PoscarReader;

impl PoscarReader {
    /// Just calls Default::default(), nothing special to be initialised
    pub fn new() -> Self {
        Default::default()
    }

    /// Read and parse a POSCAR file at `path`
    pub fn parse(&self, path: &Path) -> anyhow::Result<Structure> {
        let text = std::fs::read_to_string(path)
            .with_context(|| f!("Could not open {}", path.display()))?;
        Ok(self.parse_str(&text)?)
    }

    /// Parse the full text of a single POSCAR structure
    ///
    /// Coordinates are always taken as fractional, whatever the coordinate
    /// system line says. Only the first three tokens of each coordinate line
    /// are used, so selective dynamics flags or trailing labels are ignored.
    pub fn parse_str(&self, text: &str) -> Result<Structure> {
        let lines = Lines::new(text);

        let title = lines.get(0, "title")?.trim().to_string();
        let scale = parsers::parse_float(lines.get(1, "scale factor")?.trim(), 2)?;
        trace!("[ Title ] {title}");
        trace!("[ Scale ] {scale}");

        let lattice = Lattice::new(
            Self::read_lattice_vector(&lines, 2)?,
            Self::read_lattice_vector(&lines, 3)?,
            Self::read_lattice_vector(&lines, 4)?,
        );

        let species = Self::read_species(&lines)?;
        let total = species
            .iter()
            .try_fold(0usize, |total, s| total.checked_add(s.count))
            .ok_or_else(|| Error::malformed(7, "species counts overflow"))?;

        let marker = lines.get(7, "coordinate system")?.trim();
        if !marker.to_lowercase().starts_with('d') {
            warn!("Coordinate system \"{marker}\" is read as fractional (Direct)");
        }

        let end = COORDINATE_START
            .checked_add(total)
            .ok_or_else(|| Error::malformed(7, "species counts overflow"))?;
        if lines.len() < end {
            return Err(Error::malformed(
                lines.len() + 1,
                f!(
                    "expected {total} coordinate lines but found {}",
                    lines.len().saturating_sub(COORDINATE_START)
                ),
            ));
        }

        let sites = (COORDINATE_START..end)
            .map(|n| Self::read_coordinate(&lines, n))
            .collect::<Result<Vec<Vector3>>>()?;

        debug!("Read {} sites of {} species", sites.len(), species.len());

        Ok(Structure {
            title,
            scale,
            lattice,
            species,
            sites,
        })
    }

    fn read_lattice_vector(lines: &Lines, index: usize) -> Result<Vector3> {
        let line = lines.get(index, "lattice vector")?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != 3 {
            return Err(Error::malformed(
                index + 1,
                f!("lattice vector needs 3 components, found {}", tokens.len()),
            ));
        }
        let vector = Self::read_triple(&tokens, index + 1)?;
        trace!("[Lattice] {vector:?}");
        Ok(vector)
    }

    /// Pairs up the symbols line with the counts line
    fn read_species(lines: &Lines) -> Result<Vec<Species>> {
        let symbols: Vec<&str> = lines.get(5, "species symbols")?.split_whitespace().collect();
        let counts = lines
            .get(6, "species counts")?
            .split_whitespace()
            .map(|token| parsers::parse_count(token, 7))
            .collect::<Result<Vec<usize>>>()?;

        if symbols.len() != counts.len() {
            return Err(Error::malformed(
                7,
                f!(
                    "{} species symbols but {} counts",
                    symbols.len(),
                    counts.len()
                ),
            ));
        }

        let species: Vec<Species> = symbols
            .into_iter()
            .zip(counts)
            .map(|(symbol, count)| Species::new(symbol, count))
            .collect();
        trace!("[Species] {species:?}");
        Ok(species)
    }

    fn read_coordinate(lines: &Lines, index: usize) -> Result<Vector3> {
        let line = lines.get(index, "coordinates")?;
        let tokens: Vec<&str> = line.split_whitespace().take(3).collect();
        if tokens.len() < 3 {
            return Err(Error::malformed(
                index + 1,
                f!("coordinate line needs 3 values, found {}", tokens.len()),
            ));
        }
        Self::read_triple(&tokens, index + 1)
    }

    fn read_triple(tokens: &[&str], line: usize) -> Result<Vector3> {
        Ok([
            parsers::parse_float(tokens[0], line)?,
            parsers::parse_float(tokens[1], line)?,
            parsers::parse_float(tokens[2], line)?,
        ])
    }
}

/// Positional access to the lines of the trimmed input
struct Lines<'a>(Vec<&'a str>);

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        Self(text.trim().lines().collect())
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    /// The line at `index`, or a malformed input error naming what was missing
    fn get(&self, index: usize, what: &str) -> Result<&'a str> {
        self.0
            .get(index)
            .copied()
            .ok_or_else(|| Error::malformed(index + 1, f!("missing {what} line")))
    }
}
