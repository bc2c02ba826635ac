//! Writers for the supported structure formats
//!
//! The `*_text` functions render a [Structure] into a `String` and are all the
//! conversion pipelines need. The `write_*` helpers put that text in a file.
//!
//! ```rust
//! # use cellconv::structure::{Lattice, Structure};
//! # use cellconv::writers::{cif_text, poscar_text};
//! let mut structure = Structure::new("Po", Lattice::orthogonal(3.35, 3.35, 3.35));
//! structure.push_site("Po", [0.0, 0.0, 0.0]);
//!
//! let cif = cif_text(&structure).unwrap();
//! let poscar = poscar_text(&structure).unwrap();
//! // write_cif(&structure, "polonium.cif").unwrap();
//! ```

// internal modules
use crate::structure::Structure;
use crate::utils::f;

// standard library
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

// external crates
use anyhow::{Context, Result};
use log::trace;

// files under the writers module
mod cif_file;
mod poscar_file;

#[doc(inline)]
pub use crate::writers::cif_file::cif_text;

#[doc(inline)]
pub use crate::writers::poscar_file::poscar_text;

/// Write a structure to `path` as CIF text
pub fn write_cif<P: AsRef<Path>>(structure: &Structure, path: P) -> Result<()> {
    let text = cif_text(structure)?;
    write_text(&text, path.as_ref())
}

/// Write a structure to `path` as POSCAR text
pub fn write_poscar<P: AsRef<Path>>(structure: &Structure, path: P) -> Result<()> {
    let text = poscar_text(structure)?;
    write_text(&text, path.as_ref())
}

/// Helper function for cleaning up file IO boilerplate
pub fn write_text(text: &str, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| f!("Could not create {}", path.display()))?;
    trace!("New bufwriter for {}", path.display());
    let mut writer = BufWriter::new(file);
    writer.write_all(text.as_bytes())?;
    writer.flush()?;
    Ok(())
}
