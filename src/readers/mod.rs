//! Readers for the supported structure formats
//!
//! Every reader produces the same [Structure], regardless of the format it
//! came from. The `parse_str` methods work on text already in memory and
//! return the typed [crate::Error], while the path based helpers here wrap
//! file access with `anyhow` context for command line use.

// internal modules
use crate::structure::Structure;

// standard library
use std::path::Path;

// external crates
use anyhow::Result;

// files under the readers module
mod cif_file;
pub mod parsers;
mod poscar_file;

// inline important the readers for a nice API
#[doc(inline)]
pub use crate::readers::cif_file::CifReader;

#[doc(inline)]
pub use crate::readers::poscar_file::PoscarReader;

/// Read a POSCAR file
///
/// Returns a result containing the [Structure] extracted from the file at
/// `path`.
///
/// - `path` - Path to the POSCAR file, can be [&str], [String], [Path], etc...
///
/// Example
/// ```rust
/// let structure = cellconv::read_poscar("./data/silicon.vasp").unwrap();
/// assert_eq!(structure.title, "Silicon diamond");
/// ```
pub fn read_poscar<P: AsRef<Path>>(path: P) -> Result<Structure> {
    let path: &Path = Path::new(path.as_ref());
    PoscarReader::new().parse(path)
}

/// Read a CIF file
///
/// Returns a result containing the [Structure] extracted from the file at
/// `path`. Cell angles in the file are ignored and the lattice is always
/// orthogonal.
///
/// - `path` - Path to the CIF file, can be [&str], [String], [Path], etc...
///
/// Example
/// ```rust
/// let structure = cellconv::read_cif("./data/rock_salt.cif").unwrap();
/// assert_eq!(structure.number_of_sites(), 8);
/// ```
pub fn read_cif<P: AsRef<Path>>(path: P) -> Result<Structure> {
    let path: &Path = Path::new(path.as_ref());
    CifReader::new().parse(path)
}
