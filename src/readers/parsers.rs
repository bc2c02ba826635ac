//! Token and line level parsers shared by the file readers
//!
//! Everything here works on a single token or a single line. Numeric
//! conversions report failures with the 1-based line number they came from so
//! the readers can pass them straight up to the caller.

// internal modules
use crate::error::{Error, Result};

// external crates
use nom::bytes::complete::{tag, take_till1};
use nom::character::complete::{char, digit1, u64 as unsigned};
use nom::combinator::{all_consuming, opt};
use nom::number::complete::double;
use nom::sequence::{delimited, preceded, terminated};
use nom::IResult;

/// Tags for the cell lengths in the order a, b, c
pub const CELL_LENGTH_TAGS: [&str; 3] = ["_cell_length_a", "_cell_length_b", "_cell_length_c"];

/// Tags for the cell angles in the order alpha, beta, gamma
pub const CELL_ANGLE_TAGS: [&str; 3] = [
    "_cell_angle_alpha",
    "_cell_angle_beta",
    "_cell_angle_gamma",
];

/// The site tag that closes the loop header, rows follow after it
pub const FRACT_Z_TAG: &str = "_atom_site_fract_z";

/// Start of a repeating block
pub const LOOP_TAG: &str = "loop_";

/// Prefix of a data block header
pub const DATA_TAG: &str = "data_";

/// A whole token as a float, e.g. "-1.5e-3"
fn float_token(i: &str) -> IResult<&str, f64> {
    all_consuming(double)(i)
}

/// A whole token as a float with an optional standard uncertainty, e.g. "5.4307(2)"
fn cif_number_token(i: &str) -> IResult<&str, f64> {
    all_consuming(terminated(double, opt(standard_uncertainty)))(i)
}

/// The bracketed uncertainty on the last digits of a CIF number
fn standard_uncertainty(i: &str) -> IResult<&str, &str> {
    delimited(char('('), digit1, char(')'))(i)
}

/// A whole token as a non-negative integer
fn count_token(i: &str) -> IResult<&str, u64> {
    all_consuming(unsigned)(i)
}

/// Name following a `data_` tag, up to the first whitespace
fn data_block(i: &str) -> IResult<&str, &str> {
    preceded(tag(DATA_TAG), take_till1(|c: char| c.is_whitespace()))(i)
}

/// Parse a token that must be a plain float
///
/// ```rust
/// # use cellconv::readers::parsers::parse_float;
/// assert_eq!(parse_float("-2.5e1", 1), Ok(-25.0));
/// assert!(parse_float("2.5.1", 1).is_err());
/// ```
pub fn parse_float(token: &str, line: usize) -> Result<f64> {
    float_token(token)
        .map(|(_, value)| value)
        .map_err(|_| Error::numeric(line, token))
}

/// Parse a CIF numeric value, ignoring any standard uncertainty suffix
///
/// ```rust
/// # use cellconv::readers::parsers::parse_cif_number;
/// assert_eq!(parse_cif_number("5.4307(2)", 1), Ok(5.4307));
/// assert_eq!(parse_cif_number("0.25", 1), Ok(0.25));
/// ```
pub fn parse_cif_number(token: &str, line: usize) -> Result<f64> {
    cif_number_token(token)
        .map(|(_, value)| value)
        .map_err(|_| Error::numeric(line, token))
}

/// Parse an atom count
pub fn parse_count(token: &str, line: usize) -> Result<usize> {
    count_token(token)
        .map(|(_, value)| value as usize)
        .map_err(|_| Error::numeric(line, token))
}

/// Lines starting with an underscore are tags, not data
pub fn is_tag(line: &str) -> bool {
    line.trim_start().starts_with('_')
}

/// Lines starting with `loop_` open a new repeating block
pub fn is_loop_start(line: &str) -> bool {
    line.trim_start().starts_with(LOOP_TAG)
}

/// The `_atom_site_fract_z` tag may appear anywhere on the line
pub fn is_fract_z(line: &str) -> bool {
    line.contains(FRACT_Z_TAG)
}

/// Index (0 = a, 1 = b, 2 = c) of a cell length tag found on the line
pub fn cell_length_axis(line: &str) -> Option<usize> {
    CELL_LENGTH_TAGS.iter().position(|t| line.contains(t))
}

/// Index (0 = alpha, 1 = beta, 2 = gamma) of a cell angle tag found on the line
pub fn cell_angle_axis(line: &str) -> Option<usize> {
    CELL_ANGLE_TAGS.iter().position(|t| line.contains(t))
}

/// The last whitespace separated token on a line
pub fn last_token(line: &str) -> Option<&str> {
    line.split_whitespace().last()
}

/// Block name from a `data_<name>` header line
///
/// ```rust
/// # use cellconv::readers::parsers::data_block_name;
/// assert_eq!(data_block_name("data_NaCl"), Some("NaCl"));
/// assert_eq!(data_block_name("  data_Si  # comment"), Some("Si"));
/// assert_eq!(data_block_name("NaCl"), None);
/// ```
pub fn data_block_name(line: &str) -> Option<&str> {
    data_block(line.trim_start()).ok().map(|(_, name)| name)
}

/// Drop a leading `data_` from a title line if there is one
pub fn strip_data_prefix(title: &str) -> &str {
    title.strip_prefix(DATA_TAG).unwrap_or(title)
}

/// Chemical symbol of a site label, keeping only the alphabetic characters
///
/// ```rust
/// # use cellconv::readers::parsers::element_symbol;
/// assert_eq!(element_symbol("Fe12"), "Fe");
/// assert_eq!(element_symbol("O"), "O");
/// ```
pub fn element_symbol(label: &str) -> String {
    label.chars().filter(|c| c.is_alphabetic()).collect()
}
