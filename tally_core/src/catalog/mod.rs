//! # Casing Specification Catalog
//!
//! Size-keyed table of casing properties. The tally processor resolves each
//! running joint's nominal size here to get its weight per foot and internal
//! diameter.
//!
//! Sizes are floats (13.375, 9.625, ...) so keys match within
//! [`SIZE_TOLERANCE_IN`] rather than exactly. Inserting a size that already
//! matches replaces the existing entry in place, so catalog order is the
//! order sizes were first added.
//!
//! ## Example
//!
//! ```rust
//! use tally_core::catalog::{CasingSpecification, SpecificationCatalog};
//!
//! let mut catalog = SpecificationCatalog::new();
//! catalog.upsert(CasingSpecification::new(13.375, 61.0, 12.515).with_grade("K-55"));
//!
//! let spec = catalog.lookup(13.3755).expect("within tolerance");
//! assert_eq!(spec.weight_ppf, 61.0);
//! assert!(catalog.lookup(20.0).is_none());
//! ```

pub mod api_casing;

pub use api_casing::API_STANDARD_CASING;

use serde::{Deserialize, Serialize};

/// Match tolerance for catalog size keys (inches)
pub const SIZE_TOLERANCE_IN: f64 = 0.001;

/// Properties of one casing size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CasingSpecification {
    /// Nominal size, the catalog key (in)
    pub size_in: f64,

    /// Internal diameter (in)
    pub internal_diameter_in: f64,

    /// Nominal weight per foot (lb/ft)
    pub weight_ppf: f64,

    /// Drift diameter (in)
    #[serde(default)]
    pub drift_diameter_in: f64,

    /// Optimum make-up torque (ft-lb)
    #[serde(default)]
    pub makeup_torque_ftlb: f64,

    /// Internal yield (burst) pressure (psi)
    #[serde(default)]
    pub burst_psi: f64,

    /// Collapse resistance (psi)
    #[serde(default)]
    pub collapse_psi: f64,

    /// Pipe body tensile yield (klb)
    #[serde(default)]
    pub tensile_klb: f64,

    /// Coupling outer diameter (in)
    #[serde(default)]
    pub coupling_od_in: f64,

    /// Nominal outer diameter (in)
    #[serde(default)]
    pub nominal_od_in: f64,

    /// Steel grade (e.g. "K-55", "N-80")
    #[serde(default)]
    pub grade: String,

    /// Connection type (e.g. "BTC", "LTC")
    #[serde(default)]
    pub connection: String,
}

impl CasingSpecification {
    /// Create a specification with the fields the tally calculation needs.
    ///
    /// Nominal OD defaults to the size; all other attributes are zero/empty
    /// until set with the `with_*` builders.
    pub fn new(size_in: f64, weight_ppf: f64, internal_diameter_in: f64) -> Self {
        CasingSpecification {
            size_in,
            internal_diameter_in,
            weight_ppf,
            drift_diameter_in: 0.0,
            makeup_torque_ftlb: 0.0,
            burst_psi: 0.0,
            collapse_psi: 0.0,
            tensile_klb: 0.0,
            coupling_od_in: 0.0,
            nominal_od_in: size_in,
            grade: String::new(),
            connection: String::new(),
        }
    }

    /// Set the steel grade
    pub fn with_grade(mut self, grade: impl Into<String>) -> Self {
        self.grade = grade.into();
        self
    }

    /// Set the connection type
    pub fn with_connection(mut self, connection: impl Into<String>) -> Self {
        self.connection = connection.into();
        self
    }

    /// Set the drift diameter (in)
    pub fn with_drift(mut self, drift_diameter_in: f64) -> Self {
        self.drift_diameter_in = drift_diameter_in;
        self
    }

    /// Set burst and collapse ratings (psi)
    pub fn with_pressure_ratings(mut self, burst_psi: f64, collapse_psi: f64) -> Self {
        self.burst_psi = burst_psi;
        self.collapse_psi = collapse_psi;
        self
    }

    /// Set body tensile yield (klb)
    pub fn with_tensile(mut self, tensile_klb: f64) -> Self {
        self.tensile_klb = tensile_klb;
        self
    }

    /// Set coupling OD (in) and make-up torque (ft-lb)
    pub fn with_coupling(mut self, coupling_od_in: f64, makeup_torque_ftlb: f64) -> Self {
        self.coupling_od_in = coupling_od_in;
        self.makeup_torque_ftlb = makeup_torque_ftlb;
        self
    }

    /// Does this entry's key match `size_in` within tolerance?
    pub fn matches_size(&self, size_in: f64) -> bool {
        (self.size_in - size_in).abs() < SIZE_TOLERANCE_IN
    }

    /// Display label, e.g. `13.375" 61.0# K-55`
    pub fn display_name(&self) -> String {
        let grade = if self.grade.is_empty() { "Not Selected" } else { &self.grade };
        format!("{:.3}\" {:.1}# {}", self.size_in, self.weight_ppf, grade)
    }
}

impl std::fmt::Display for CasingSpecification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Ordered, size-keyed casing catalog.
///
/// Backed by a `Vec` because keys compare with a tolerance and catalogs hold
/// a few dozen sizes at most.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpecificationCatalog {
    entries: Vec<CasingSpecification>,
}

impl SpecificationCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog seeded with the built-in API casing sizes
    pub fn api_standard() -> Self {
        Self::from_specs(API_STANDARD_CASING.iter().cloned())
    }

    /// Build a catalog by upserting each spec in order
    pub fn from_specs(specs: impl IntoIterator<Item = CasingSpecification>) -> Self {
        let mut catalog = Self::new();
        for spec in specs {
            catalog.upsert(spec);
        }
        catalog
    }

    /// Insert a specification, or replace the entry whose size matches.
    ///
    /// Returns the replaced entry, if any.
    pub fn upsert(&mut self, spec: CasingSpecification) -> Option<CasingSpecification> {
        match self.entries.iter_mut().find(|e| e.matches_size(spec.size_in)) {
            Some(existing) => Some(std::mem::replace(existing, spec)),
            None => {
                self.entries.push(spec);
                None
            }
        }
    }

    /// Look up the specification for a nominal size.
    pub fn lookup(&self, size_in: f64) -> Option<&CasingSpecification> {
        self.entries.iter().find(|e| e.matches_size(size_in))
    }

    /// Remove the specification for a size, if present
    pub fn remove(&mut self, size_in: f64) -> Option<CasingSpecification> {
        let pos = self.entries.iter().position(|e| e.matches_size(size_in))?;
        Some(self.entries.remove(pos))
    }

    /// Iterate entries in catalog order
    pub fn iter(&self) -> std::slice::Iter<'_, CasingSpecification> {
        self.entries.iter()
    }

    /// Entries as a slice
    pub fn as_slice(&self) -> &[CasingSpecification] {
        &self.entries
    }

    /// Number of sizes in the catalog
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a SpecificationCatalog {
    type Item = &'a CasingSpecification;
    type IntoIter = std::slice::Iter<'a, CasingSpecification>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_within_tolerance() {
        let catalog = SpecificationCatalog::from_specs([CasingSpecification::new(9.625, 47.0, 8.681)]);

        assert!(catalog.lookup(9.625).is_some());
        assert!(catalog.lookup(9.6254).is_some());
        assert!(catalog.lookup(9.627).is_none());
        assert!(catalog.lookup(7.0).is_none());
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut catalog = SpecificationCatalog::new();
        assert!(catalog.upsert(CasingSpecification::new(7.0, 26.0, 6.276)).is_none());
        assert!(catalog.upsert(CasingSpecification::new(9.625, 47.0, 8.681)).is_none());

        let replaced = catalog.upsert(CasingSpecification::new(7.0005, 29.0, 6.184));
        assert_eq!(replaced.map(|s| s.weight_ppf), Some(26.0));

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.as_slice()[0].weight_ppf, 29.0);
        assert_eq!(catalog.as_slice()[1].size_in, 9.625);
    }

    #[test]
    fn test_remove() {
        let mut catalog = SpecificationCatalog::from_specs([
            CasingSpecification::new(7.0, 26.0, 6.276),
            CasingSpecification::new(9.625, 47.0, 8.681),
        ]);
        assert!(catalog.remove(7.0).is_some());
        assert!(catalog.remove(7.0).is_none());
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_display_name() {
        let spec = CasingSpecification::new(13.375, 61.0, 12.515).with_grade("K-55");
        assert_eq!(spec.display_name(), "13.375\" 61.0# K-55");

        let bare = CasingSpecification::new(20.0, 94.0, 19.124);
        assert_eq!(bare.to_string(), "20.000\" 94.0# Not Selected");
    }

    #[test]
    fn test_catalog_serializes_as_list() {
        let catalog = SpecificationCatalog::from_specs([CasingSpecification::new(7.0, 26.0, 6.276)]);
        let json = serde_json::to_string(&catalog).unwrap();
        assert!(json.starts_with('['));

        let roundtrip: SpecificationCatalog = serde_json::from_str(&json).unwrap();
        assert_eq!(catalog, roundtrip);
    }

    #[test]
    fn test_missing_optional_attributes_deserialize() {
        let json = r#"[{"size_in": 5.5, "internal_diameter_in": 4.892, "weight_ppf": 17.0}]"#;
        let catalog: SpecificationCatalog = serde_json::from_str(json).unwrap();
        let spec = catalog.lookup(5.5).unwrap();
        assert_eq!(spec.grade, "");
        assert_eq!(spec.burst_psi, 0.0);
    }
}
