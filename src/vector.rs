//! Small vector maths used for cell geometry
//!
//! Only the handful of operations needed to go from lattice vectors to cell
//! lengths and angles. Everything works on plain slices so that both
//! `[f64; 3]` lattice rows and `Vec<f64>` values can be passed in.
//!
//! ```rust
//! # use cellconv::vector::{angle_between, norm};
//! assert_eq!(norm(&[3.0, 4.0, 0.0]), 5.0);
//! let gamma = angle_between(&[1.0, 0.0, 0.0], &[0.0, 2.0, 0.0]).unwrap();
//! assert!((gamma - 90.0).abs() < 1e-9);
//! ```

/// Three real components, used for lattice vectors and fractional coordinates
pub type Vector3 = [f64; 3];

/// Euclidean norm, `sqrt(sum(x_i^2))`
pub fn norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Sum of the component-wise products
///
/// Inputs are expected to be the same length, any extra components on the
/// longer vector are ignored.
pub fn dot(v1: &[f64], v2: &[f64]) -> f64 {
    debug_assert_eq!(v1.len(), v2.len());
    v1.iter().zip(v2).map(|(a, b)| a * b).sum()
}

/// Angle between two vectors in degrees
///
/// The cosine is clamped to [-1, 1] before `acos` so that floating point
/// overshoot on (anti-)parallel vectors does not produce NaN.
///
/// Returns `None` if either vector has zero length, in which case the angle is
/// undefined.
///
/// ```rust
/// # use cellconv::vector::angle_between;
/// let a = [1.0, 0.0, 0.0];
/// let angle = angle_between(&a, &[-3.0, 0.0, 0.0]).unwrap();
/// assert!((angle - 180.0).abs() < 1e-9);
/// assert_eq!(angle_between(&a, &[0.0, 0.0, 0.0]), None);
/// ```
pub fn angle_between(v1: &[f64], v2: &[f64]) -> Option<f64> {
    let denominator = norm(v1) * norm(v2);
    if denominator == 0.0 || !denominator.is_finite() {
        return None;
    }

    let cos_angle = (dot(v1, v2) / denominator).clamp(-1.0, 1.0);
    let angle = cos_angle.acos().to_degrees();
    angle.is_finite().then_some(angle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&[0.0, 0.0, 0.0], 0.0)]
    #[case(&[5.0, 0.0, 0.0], 5.0)]
    #[case(&[1.0, 2.0, 2.0], 3.0)]
    #[case(&[-2.0, -3.0, 6.0], 7.0)]
    fn euclidean_norm(#[case] v: &[f64], #[case] expected: f64) {
        assert_eq!(norm(v), expected);
    }

    #[test]
    fn dot_product() {
        assert_eq!(dot(&[1.0, 2.0, 3.0], &[4.0, -5.0, 6.0]), 12.0);
        assert_eq!(dot(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]), 0.0);
    }

    #[rstest]
    #[case([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], 90.0)]
    #[case([1.0, 0.0, 0.0], [1.0, 1.0, 0.0], 45.0)]
    #[case([1.0, 0.0, 0.0], [-0.5, 0.866025403784, 0.0], 120.0)]
    #[case([2.0, 2.0, 2.0], [1.0, 1.0, 1.0], 0.0)]
    fn angles_in_degrees(#[case] v1: Vector3, #[case] v2: Vector3, #[case] expected: f64) {
        let angle = angle_between(&v1, &v2).unwrap();
        assert!((angle - expected).abs() < 1e-5, "{angle} != {expected}");
    }

    #[test]
    fn parallel_vectors_are_clamped() {
        // cosine lands a hair above 1.0 without the clamp
        let v = [0.1, 0.2, 0.3];
        let w = [0.1 * 3.0, 0.2 * 3.0, 0.3 * 3.0];
        let angle = angle_between(&v, &w).unwrap();
        assert!(angle.is_finite());
        assert!(angle.abs() < 1e-5);
    }

    #[test]
    fn zero_length_is_undefined() {
        assert_eq!(angle_between(&[0.0; 3], &[1.0, 0.0, 0.0]), None);
        assert_eq!(angle_between(&[1.0, 0.0, 0.0], &[0.0; 3]), None);
    }
}
