//! Common small functions used throughout the crate
//!
//! These are left public for the convenience of the user.

// Alias for the format! macro out of laziness
pub use std::format as f;

/// Fixed precision formatting that writes exact zeros as `0.0`
///
/// Keeps the zero padding of an orthogonal lattice short and readable, e.g.
/// `4.000000 0.0 0.0` rather than `4.000000 0.000000 0.000000`.
///
/// ```rust
/// # use cellconv::utils::fixed_or_zero;
/// assert_eq!(fixed_or_zero(4.0, 6), "4.000000");
/// assert_eq!(fixed_or_zero(0.0, 6), "0.0");
/// assert_eq!(fixed_or_zero(-0.0, 6), "0.0");
/// assert_eq!(fixed_or_zero(1e-9, 6), "0.000000");
/// ```
pub fn fixed_or_zero(value: f64, precision: usize) -> String {
    if value == 0.0 {
        "0.0".to_string()
    } else {
        f!("{:.precision$}", value, precision = precision)
    }
}

/// Replace every space with an underscore
///
/// ```rust
/// # use cellconv::utils::underscored;
/// assert_eq!(underscored("Rock salt NaCl"), "Rock_salt_NaCl");
/// ```
pub fn underscored(s: &str) -> String {
    s.replace(' ', "_")
}
