//! Core crystal structure representation
//!
//! Both file formats are read into the same [Structure] and written back out
//! from it. A structure is built fresh for every conversion and never shared,
//! so nothing here needs interior mutability or synchronisation.
//!
//! The species list and the site list are kept side by side as they are in a
//! POSCAR file: the first `species[0].count` sites belong to the first species,
//! the next `species[1].count` to the second, and so on.
//!
//! ```rust
//! # use cellconv::structure::{Lattice, Structure};
//! let mut structure = Structure::new("NaCl", Lattice::orthogonal(5.64, 5.64, 5.64));
//! structure.push_site("Na", [0.0, 0.0, 0.0]);
//! structure.push_site("Cl", [0.5, 0.5, 0.5]);
//!
//! let cell = structure.cell_parameters().unwrap();
//! assert_eq!(cell.a, 5.64);
//! assert_eq!(structure.site_labels(), vec!["Na1", "Cl1"]);
//! ```

// internal modules
use crate::error::{Error, Result};
use crate::utils::f;
use crate::vector::{angle_between, norm, Vector3};

// external crates
use serde::Serialize;

/// Labels used for the three lattice vectors in messages
const AXES: [char; 3] = ['a', 'b', 'c'];

/// A periodic crystal structure with fractional site coordinates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Structure {
    /// Free text label, first line of either format
    pub title: String,
    /// Multiplier applied to every lattice vector
    pub scale: f64,
    /// Unscaled lattice vectors a, b, c
    pub lattice: Lattice,
    /// Unique chemical symbols in first-seen order
    pub species: Vec<Species>,
    /// Fractional coordinates, grouped to match `species`
    pub sites: Vec<Vector3>,
}

impl Structure {
    /// An empty structure with a unit scale factor
    pub fn new(title: impl Into<String>, lattice: Lattice) -> Self {
        Self {
            title: title.into(),
            scale: 1.0,
            lattice,
            species: Vec::new(),
            sites: Vec::new(),
        }
    }

    /// Add a site and bump the running count for its chemical symbol
    ///
    /// New symbols are appended to the species list, so the species order is
    /// always the order in which symbols were first seen.
    pub fn push_site(&mut self, symbol: &str, position: Vector3) {
        match self.species.iter_mut().find(|s| s.symbol == symbol) {
            Some(species) => species.count += 1,
            None => self.species.push(Species::new(symbol, 1)),
        }
        self.sites.push(position);
    }

    /// Lattice vectors with the scale factor applied
    pub fn scaled_lattice(&self) -> Lattice {
        self.lattice.scaled(self.scale)
    }

    /// Cell lengths and angles of the scaled lattice
    pub fn cell_parameters(&self) -> Result<CellParameters> {
        CellParameters::from_lattice(&self.scaled_lattice())
    }

    /// Number of atom sites
    pub fn number_of_sites(&self) -> usize {
        self.sites.len()
    }

    /// True if there are no atom sites at all
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Total of the per-species counts, saturating at `usize::MAX`
    pub fn total_count(&self) -> usize {
        self.species
            .iter()
            .fold(0, |total, s| total.saturating_add(s.count))
    }

    /// Site labels as chemical symbol plus a 1-based per-species index
    ///
    /// e.g. `["Ga1", "Ga2", "As1", "As2"]`
    pub fn site_labels(&self) -> Vec<String> {
        self.species
            .iter()
            .flat_map(|s| (1..=s.count).map(move |i| f!("{}{i}", s.symbol)))
            .collect()
    }

    /// Check that the per-species counts add up to the number of sites
    pub fn check_counts(&self) -> Result<()> {
        if self.total_count() != self.number_of_sites() {
            return Err(Error::malformed(
                0,
                f!(
                    "species counts sum to {} but {} sites were given",
                    self.total_count(),
                    self.number_of_sites()
                ),
            ));
        }
        Ok(())
    }
}

impl std::fmt::Display for Structure {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = f!("Structure \"{}\" {{\n", self.title);
        s += &f!("    scale: {}\n", self.scale);
        for (axis, v) in AXES.iter().zip(self.lattice.vectors()) {
            s += &f!("    {axis}: [{:.6}, {:.6}, {:.6}]\n", v[0], v[1], v[2]);
        }
        for species in &self.species {
            s += &f!("    {}: {}\n", species.symbol, species.count);
        }
        s += &f!("    sites: {}\n}}", self.number_of_sites());
        write!(f, "{}", s)
    }
}

/// Chemical symbol and the number of sites it occupies
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Species {
    pub symbol: String,
    pub count: usize,
}

impl Species {
    pub fn new(symbol: impl Into<String>, count: usize) -> Self {
        Self {
            symbol: symbol.into(),
            count,
        }
    }
}

/// The three lattice vectors, stored as rows
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Lattice(pub [Vector3; 3]);

impl Lattice {
    pub fn new(a: Vector3, b: Vector3, c: Vector3) -> Self {
        Self([a, b, c])
    }

    /// Diagonal lattice `(a,0,0) (0,b,0) (0,0,c)`
    pub fn orthogonal(a: f64, b: f64, c: f64) -> Self {
        Self([[a, 0.0, 0.0], [0.0, b, 0.0], [0.0, 0.0, c]])
    }

    pub fn vectors(&self) -> &[Vector3; 3] {
        &self.0
    }

    /// Every component multiplied by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        Self(self.0.map(|v| v.map(|x| x * factor)))
    }

    /// Norms of a, b, and c
    pub fn lengths(&self) -> [f64; 3] {
        self.0.map(|v| norm(&v))
    }

    /// Inter-axis angles in degrees as [alpha, beta, gamma]
    ///
    /// alpha = angle(b, c), beta = angle(a, c), gamma = angle(a, b). Fails with
    /// [Error::DegenerateGeometry] if any vector has zero length.
    pub fn angles(&self) -> Result<[f64; 3]> {
        for (axis, length) in AXES.iter().zip(self.lengths()) {
            if length == 0.0 || !length.is_finite() {
                return Err(Error::DegenerateGeometry { axis: *axis });
            }
        }

        let [a, b, c] = &self.0;
        let angle = |v1: &Vector3, v2: &Vector3, axis: char| {
            angle_between(v1, v2).ok_or(Error::DegenerateGeometry { axis })
        };

        Ok([angle(b, c, 'b')?, angle(a, c, 'a')?, angle(a, b, 'a')?])
    }
}

/// Cell lengths and angles derived from a lattice
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellParameters {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl CellParameters {
    /// Derive lengths and angles from already scaled lattice vectors
    pub fn from_lattice(lattice: &Lattice) -> Result<Self> {
        let [a, b, c] = lattice.lengths();
        let [alpha, beta, gamma] = lattice.angles()?;
        Ok(Self {
            a,
            b,
            c,
            alpha,
            beta,
            gamma,
        })
    }

    /// True when all three angles are within `tolerance` degrees of 90
    pub fn is_orthogonal(&self, tolerance: f64) -> bool {
        [self.alpha, self.beta, self.gamma]
            .iter()
            .all(|angle| (angle - 90.0).abs() <= tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn gaas() -> Structure {
        let mut structure = Structure::new("GaAs", Lattice::orthogonal(5.65, 5.65, 5.65));
        structure.push_site("Ga", [0.0, 0.0, 0.0]);
        structure.push_site("Ga", [0.5, 0.5, 0.0]);
        structure.push_site("As", [0.25, 0.25, 0.25]);
        structure.push_site("As", [0.75, 0.75, 0.25]);
        structure
    }

    #[rstest]
    fn species_in_first_seen_order(gaas: Structure) {
        assert_eq!(
            gaas.species,
            vec![Species::new("Ga", 2), Species::new("As", 2)]
        );
        assert_eq!(gaas.total_count(), gaas.number_of_sites());
        assert!(gaas.check_counts().is_ok());
    }

    #[rstest]
    fn labels_restart_per_species(gaas: Structure) {
        assert_eq!(gaas.site_labels(), vec!["Ga1", "Ga2", "As1", "As2"]);
    }

    #[rstest]
    fn mismatched_counts_are_rejected(mut gaas: Structure) {
        gaas.species[0].count = 3;
        assert!(matches!(
            gaas.check_counts(),
            Err(Error::MalformedInput { .. })
        ));
    }

    #[test]
    fn scale_applies_to_every_component() {
        let lattice = Lattice::new([1.0, 2.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 3.0]);
        assert_eq!(
            lattice.scaled(2.0),
            Lattice::new([2.0, 4.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 6.0])
        );
    }

    #[test]
    fn hexagonal_cell_parameters() {
        let lattice = Lattice::new(
            [2.46, 0.0, 0.0],
            [-1.23, 2.130422493, 0.0],
            [0.0, 0.0, 6.7],
        );
        let cell = CellParameters::from_lattice(&lattice).unwrap();

        assert!((cell.a - 2.46).abs() < 1e-6);
        assert!((cell.b - 2.46).abs() < 1e-6);
        assert!((cell.c - 6.7).abs() < 1e-6);
        assert!((cell.alpha - 90.0).abs() < 1e-2);
        assert!((cell.beta - 90.0).abs() < 1e-2);
        assert!((cell.gamma - 120.0).abs() < 1e-2);
        assert!(!cell.is_orthogonal(1e-3));
    }

    #[rstest]
    #[case(Lattice::new([0.0; 3], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]), 'a')]
    #[case(Lattice::new([1.0, 0.0, 0.0], [0.0; 3], [0.0, 0.0, 1.0]), 'b')]
    #[case(Lattice::new([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0; 3]), 'c')]
    fn zero_length_vector_is_degenerate(#[case] lattice: Lattice, #[case] axis: char) {
        assert_eq!(lattice.angles(), Err(Error::DegenerateGeometry { axis }));
    }

    #[test]
    fn zero_scale_collapses_the_cell() {
        let mut structure = Structure::new("flat", Lattice::orthogonal(1.0, 1.0, 1.0));
        structure.scale = 0.0;
        assert!(matches!(
            structure.cell_parameters(),
            Err(Error::DegenerateGeometry { axis: 'a' })
        ));
    }

    #[rstest]
    fn display_summary(gaas: Structure) {
        let summary = gaas.to_string();
        assert!(summary.starts_with("Structure \"GaAs\" {"));
        assert!(summary.contains("    Ga: 2\n"));
        assert!(summary.contains("    sites: 4\n}"));
    }
}
