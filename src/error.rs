//! Error types for the conversion pipelines
//!
//! Every failure in the core is reported synchronously as one of the variants
//! below so that a caller can tell a truncated file apart from a bad number or
//! a collapsed unit cell. Line numbers are 1-based and refer to the trimmed
//! input text.

use thiserror::Error;

/// Convenience alias used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// Missing lines, missing fields, or fields that disagree with each other
    #[error("malformed input: {details} (at line {line})")]
    MalformedInput { line: usize, details: String },

    /// A token that should have been a number was not
    #[error("expected a number, found \"{token}\" (at line {line})")]
    NumericParse { line: usize, token: String },

    /// A lattice vector of zero length makes the cell angles undefined
    #[error("lattice vector {axis} has zero length, cell angles are undefined")]
    DegenerateGeometry { axis: char },

    /// Record input without a single site row, only raised in strict mode
    #[error("no atom sites found after the _atom_site_fract_z tag")]
    EmptyStructure,
}

impl Error {
    pub fn malformed(line: usize, details: impl Into<String>) -> Self {
        Self::MalformedInput {
            line,
            details: details.into(),
        }
    }

    pub fn numeric(line: usize, token: impl Into<String>) -> Self {
        Self::NumericParse {
            line,
            token: token.into(),
        }
    }
}
