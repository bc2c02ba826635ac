//! # The Cellconv crate
//!
//! Convert crystal structures between VASP POSCAR and CIF text
//!
//! ## Installation
//!
//! Install the command line tool from a local checkout:
//!
//! ```shell
//! cargo install --path .
//! ```
//!
//! ## Overview
//!
//! The crate is a small library with a single command line tool on top.
//!
//! | Command line | Description                                          |
//! | ------------ | ---------------------------------------------------- |
//! | `cellconv`   | Convert any number of POSCAR/CIF files to the other  |
//!
//! The tool is fully documented with a detailed `--help` message, including
//! examples for common use cases.
//!
//! ### Supported formats
//!
//! | Format                               | Extensions                          |
//! | ------------------------------------ | ----------------------------------- |
//! | [Format::Poscar](crate::Format)      | `.vasp`, `.poscar`, POSCAR, CONTCAR |
//! | [Format::Cif](crate::Format)         | `.cif`                              |
//!
//! Only the simple P 1 subset of CIF is handled: cell lengths and a single
//! loop of labelled fractional coordinates. No symmetry operations are
//! applied or generated.
//!
//! ### Known asymmetry
//!
//! CIF cell angles are not read. Going POSCAR -> CIF -> POSCAR keeps the cell
//! lengths, species, and coordinates, but the lattice that comes back is always
//! orthogonal. For cells that were orthogonal to begin with nothing is lost.
//!
//! ## Advanced use
//!
//! The two conversions are plain functions on text:
//!
//! ```rust
//! use cellconv::{cif_to_poscar, poscar_to_cif};
//!
//! let poscar = std::fs::read_to_string("./data/silicon.vasp").unwrap();
//! let cif = poscar_to_cif(&poscar).unwrap();
//! let poscar_again = cif_to_poscar(&cif).unwrap();
//! ```
//!
//! For anything more involved, read into a [Structure](crate::structure::Structure)
//! and work with that directly:
//!
//! ```rust
//! let structure = cellconv::read_poscar("./data/silicon.vasp").unwrap();
//! let cell = structure.cell_parameters().unwrap();
//! println!("a = {:.4}, alpha = {:.2}", cell.a, cell.alpha);
//! ```
//!
//! As an overview:
//! - The [structure] module holds the common data model and cell geometry.
//! - The [readers] module parses POSCAR and CIF text into a structure.
//! - The [writers] module renders a structure as POSCAR or CIF text.
//! - The [vector] module has the few vector operations needed for geometry.
//!
//! In the background, the `nom` parser combinator library handles the numeric
//! tokens, `clap` is used for the command line interface, and `serde` provides
//! the optional JSON dump of a parsed structure.

// Public facing modules
pub mod convert;
pub mod error;
pub mod readers;
pub mod structure;
pub mod utils;
pub mod vector;
pub mod writers;

// Re-exports of the main entry points
#[doc(inline)]
pub use crate::convert::{cif_to_poscar, output_stem, poscar_to_cif, Format};

#[doc(inline)]
pub use crate::error::{Error, Result};

#[doc(inline)]
pub use crate::readers::{read_cif, read_poscar};
