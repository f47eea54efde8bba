//! # Buoyancy
//!
//! Buoyancy factor from mud weight and steel density, plus the
//! [`TallyParameters`] block that keeps the factor in step with its inputs.
//!
//! Mud weight and steel density only need to share a unit (ppg/ppg,
//! pcf/pcf, sg/sg). The factor is not clamped: mud heavier than steel gives
//! a negative factor, which callers surface as-is.
//!
//! ## Example
//!
//! ```rust
//! use tally_core::buoyancy::buoyancy_factor;
//!
//! let bf = buoyancy_factor(65.0, 490.0);
//! assert!((bf - 0.8673).abs() < 1e-4);
//!
//! // Non-positive steel density zeroes the factor instead of failing
//! assert_eq!(buoyancy_factor(65.0, 0.0), 0.0);
//! ```

use serde::{Deserialize, Serialize};

/// Steel density in lb/ft³, the usual default for casing steel
pub const STEEL_DENSITY_PCF: f64 = 490.0;

/// Dimensionless buoyancy factor `1 - mud_weight / steel_density`.
///
/// Returns 0 when `steel_density` is zero or negative.
pub fn buoyancy_factor(mud_weight: f64, steel_density: f64) -> f64 {
    if steel_density > 0.0 {
        1.0 - mud_weight / steel_density
    } else {
        0.0
    }
}

/// Inputs to a tally pass that are not per-joint.
///
/// Fields are private so the buoyancy factor cannot drift from mud weight
/// and steel density; every setter recomputes it. The factor is written out
/// when serialized but recomputed when read back.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "ParametersRecord")]
pub struct TallyParameters {
    /// Depth reference the string is measured against (m)
    reference_depth_m: f64,
    /// Mud weight, same unit as steel density
    mud_weight: f64,
    /// Steel density, same unit as mud weight
    steel_density: f64,
    /// Derived buoyancy factor
    buoyancy_factor: f64,
}

impl TallyParameters {
    /// Create parameters and derive the buoyancy factor.
    pub fn new(reference_depth_m: f64, mud_weight: f64, steel_density: f64) -> Self {
        TallyParameters {
            reference_depth_m,
            mud_weight,
            steel_density,
            buoyancy_factor: buoyancy_factor(mud_weight, steel_density),
        }
    }

    pub fn reference_depth_m(&self) -> f64 {
        self.reference_depth_m
    }

    pub fn mud_weight(&self) -> f64 {
        self.mud_weight
    }

    pub fn steel_density(&self) -> f64 {
        self.steel_density
    }

    pub fn buoyancy_factor(&self) -> f64 {
        self.buoyancy_factor
    }

    /// Set the reference depth (m)
    pub fn set_reference_depth(&mut self, reference_depth_m: f64) {
        self.reference_depth_m = reference_depth_m;
    }

    /// Set mud weight and recompute the buoyancy factor
    pub fn set_mud_weight(&mut self, mud_weight: f64) {
        self.mud_weight = mud_weight;
        self.refresh();
    }

    /// Set steel density and recompute the buoyancy factor
    pub fn set_steel_density(&mut self, steel_density: f64) {
        self.steel_density = steel_density;
        self.refresh();
    }

    fn refresh(&mut self) {
        self.buoyancy_factor = buoyancy_factor(self.mud_weight, self.steel_density);
    }
}

impl Default for TallyParameters {
    fn default() -> Self {
        TallyParameters::new(0.0, 0.0, STEEL_DENSITY_PCF)
    }
}

/// Wire shape of [`TallyParameters`]; any stored factor is ignored.
#[derive(Deserialize)]
struct ParametersRecord {
    #[serde(default)]
    reference_depth_m: f64,
    #[serde(default)]
    mud_weight: f64,
    #[serde(default = "default_steel_density")]
    steel_density: f64,
}

fn default_steel_density() -> f64 {
    STEEL_DENSITY_PCF
}

impl From<ParametersRecord> for TallyParameters {
    fn from(record: ParametersRecord) -> Self {
        TallyParameters::new(record.reference_depth_m, record.mud_weight, record.steel_density)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factor_in_unit_range() {
        for mud in [0.0, 8.33, 65.0, 120.0, 490.0] {
            let bf = buoyancy_factor(mud, 490.0);
            assert!((0.0..=1.0).contains(&bf), "mud {} gave {}", mud, bf);
        }
        assert_eq!(buoyancy_factor(0.0, 490.0), 1.0);
        assert_eq!(buoyancy_factor(490.0, 490.0), 0.0);
    }

    #[test]
    fn test_heavier_than_steel_is_negative() {
        assert!(buoyancy_factor(500.0, 490.0) < 0.0);
    }

    #[test]
    fn test_invalid_steel_density() {
        assert_eq!(buoyancy_factor(65.0, 0.0), 0.0);
        assert_eq!(buoyancy_factor(65.0, -490.0), 0.0);
    }

    #[test]
    fn test_setters_refresh_factor() {
        let mut params = TallyParameters::new(3000.0, 65.0, 490.0);
        assert!((params.buoyancy_factor() - 0.867347).abs() < 1e-6);

        params.set_mud_weight(98.0);
        assert!((params.buoyancy_factor() - 0.8).abs() < 1e-12);

        params.set_steel_density(0.0);
        assert_eq!(params.buoyancy_factor(), 0.0);

        params.set_reference_depth(1500.0);
        assert_eq!(params.reference_depth_m(), 1500.0);
    }

    #[test]
    fn test_stale_factor_ignored_on_load() {
        let json = r#"{"reference_depth_m": 3000.0, "mud_weight": 98.0, "steel_density": 490.0, "buoyancy_factor": 0.1}"#;
        let params: TallyParameters = serde_json::from_str(json).unwrap();
        assert!((params.buoyancy_factor() - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_serialized_includes_factor() {
        let params = TallyParameters::new(3000.0, 98.0, 490.0);
        let json = serde_json::to_string(&params).unwrap();
        assert!(json.contains("\"buoyancy_factor\""));
        let roundtrip: TallyParameters = serde_json::from_str(&json).unwrap();
        assert_eq!(params, roundtrip);
    }
}
