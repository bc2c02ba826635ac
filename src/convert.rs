//! The two conversion pipelines and format detection
//!
//! Each conversion is a pure function of its input text: parse into a fresh
//! [Structure], derive what the other format needs, render. Nothing is shared
//! between calls, so any number of conversions can run at once.
//!
//! ```rust
//! # use cellconv::{cif_to_poscar, poscar_to_cif};
//! let poscar = "Silicon\n1.0\n5 0 0\n0 5 0\n0 0 5\nSi\n1\nDirect\n0.0 0.0 0.0\n";
//! let cif = poscar_to_cif(poscar).unwrap();
//! assert!(cif.contains("_cell_angle_gamma 90.00"));
//!
//! let back = cif_to_poscar(&cif).unwrap();
//! assert!(back.ends_with("Si\n1\nDirect\n0.000000 0.000000 0.000000\n"));
//! ```
//!
//! The trip back from CIF is not lossless. Cell angles are not read, so the
//! lattice that comes back is always orthogonal.

// internal modules
use crate::error::Result;
use crate::readers::{parsers, CifReader, PoscarReader};
use crate::structure::Structure;
use crate::utils::underscored;
use crate::writers::{cif_text, poscar_text};

// standard library
use std::path::Path;

// external crates
use log::debug;

/// Name used for output when nothing better can be found
pub const FALLBACK_NAME: &str = "structure";

/// Convert POSCAR text to CIF text
///
/// Fails with [MalformedInput](crate::Error::MalformedInput) or
/// [NumericParse](crate::Error::NumericParse) on bad input, and with
/// [DegenerateGeometry](crate::Error::DegenerateGeometry) if a lattice vector
/// has zero length.
pub fn poscar_to_cif(text: &str) -> Result<String> {
    let structure = read_structure(text, Format::Poscar, false)?;
    write_structure(&structure, Format::Cif)
}

/// Convert CIF text to POSCAR text
///
/// A CIF with cell lengths but no site rows is not an error here. The output
/// simply has empty species, count, and coordinate sections.
pub fn cif_to_poscar(text: &str) -> Result<String> {
    let structure = read_structure(text, Format::Cif, false)?;
    write_structure(&structure, Format::Poscar)
}

/// Parse text in the given format
///
/// `strict` only affects CIF input, where it turns an empty site list into
/// [EmptyStructure](crate::Error::EmptyStructure).
pub fn read_structure(text: &str, format: Format, strict: bool) -> Result<Structure> {
    debug!("Reading {format} text");
    match format {
        Format::Poscar => PoscarReader::new().parse_str(text),
        Format::Cif => {
            let mut reader = CifReader::new();
            if strict {
                reader.require_sites();
            }
            reader.parse_str(text)
        }
    }
}

/// Render a structure in the given format
pub fn write_structure(structure: &Structure, format: Format) -> Result<String> {
    debug!("Writing {format} text");
    match format {
        Format::Poscar => poscar_text(structure),
        Format::Cif => cif_text(structure),
    }
}

/// Supported text formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// VASP POSCAR/CONTCAR structure-matrix text
    Poscar,
    /// Crystallographic Information File record text
    Cif,
}

impl Format {
    /// Guess the format from a file name
    ///
    /// `.cif` is CIF. `.poscar`, `.vasp`, and files named like `POSCAR` or
    /// `CONTCAR` are POSCAR.
    ///
    /// ```rust
    /// # use cellconv::Format;
    /// # use std::path::Path;
    /// assert_eq!(Format::from_path(Path::new("NaCl.cif")), Some(Format::Cif));
    /// assert_eq!(Format::from_path(Path::new("run/CONTCAR")), Some(Format::Poscar));
    /// assert_eq!(Format::from_path(Path::new("notes.txt")), None);
    /// ```
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match extension.as_deref() {
            Some("cif") => Some(Self::Cif),
            Some("poscar") | Some("vasp") => Some(Self::Poscar),
            _ => {
                let name = path.file_name()?.to_str()?.to_uppercase();
                (name.starts_with("POSCAR") || name.starts_with("CONTCAR")).then_some(Self::Poscar)
            }
        }
    }

    /// The format a file of this format is converted into
    pub fn target(&self) -> Self {
        match self {
            Self::Poscar => Self::Cif,
            Self::Cif => Self::Poscar,
        }
    }

    /// File extension used for output in this format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Poscar => "vasp",
            Self::Cif => "cif",
        }
    }

    /// Convert text of this format into the [target](Format::target) format
    pub fn convert(&self, text: &str) -> Result<String> {
        match self {
            Self::Poscar => poscar_to_cif(text),
            Self::Cif => cif_to_poscar(text),
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Poscar => write!(f, "POSCAR"),
            Self::Cif => write!(f, "CIF"),
        }
    }
}

/// Pick a file stem for converted output
///
/// In order of preference:
///     - the stem of the input file name
///     - POSCAR input: the title line, spaces replaced with underscores
///     - CIF input: the name from the first `data_<name>` tag
///     - [FALLBACK_NAME]
///
/// ```rust
/// # use cellconv::{output_stem, Format};
/// # use std::path::Path;
/// let text = "data_quartz\n_cell_length_a 4.9\n";
/// assert_eq!(output_stem(Some(Path::new("in/SiO2.cif")), text, Format::Cif), "SiO2");
/// assert_eq!(output_stem(None, text, Format::Cif), "quartz");
/// assert_eq!(output_stem(None, "", Format::Poscar), "structure");
/// ```
pub fn output_stem(path: Option<&Path>, text: &str, source: Format) -> String {
    if let Some(stem) = path
        .and_then(|p| p.file_stem())
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
    {
        return stem.to_string();
    }

    let from_text = match source {
        Format::Poscar => text
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .map(underscored),
        Format::Cif => text
            .lines()
            .find_map(parsers::data_block_name)
            .map(str::to_string),
    };

    from_text.unwrap_or_else(|| FALLBACK_NAME.to_string())
}
