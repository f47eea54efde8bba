//! # Tally Processor
//!
//! Single forward pass over a [`JointLedger`] that writes running totals onto
//! every joint.
//!
//! The pass keeps an accumulator of length, buoyed weight and capacity.
//! For each joint in sequence order:
//!
//! - **OUT** joints copy the accumulator as it stands. They record where the
//!   string was when the joint was logged and add nothing.
//! - **IN** joints resolve their size against the catalog, add their length,
//!   buoyed weight and internal volume, then record the new totals.
//!
//! ## Units
//!
//! - Joint length and reference depth: meters
//! - Catalog weight: lb/ft, internal diameter: inches
//! - Output weight: klb (buoyed), capacity: bbl
//!
//! ## Catalog misses
//!
//! A size the catalog does not carry is not an error. The pipe is
//! synthesized with [`FallbackPolicy`] (default: `size × 4.5` lb/ft and
//! `size − 0.5` in ID) and the size is listed in [`ProcessOutcome`].
//!
//! ## Example
//!
//! ```rust
//! use tally_core::buoyancy::TallyParameters;
//! use tally_core::calculations::TallyProcessor;
//! use tally_core::catalog::{CasingSpecification, SpecificationCatalog};
//! use tally_core::ledger::{JointEntry, JointLedger};
//!
//! let catalog = SpecificationCatalog::from_specs([CasingSpecification::new(13.375, 61.0, 12.415)]);
//! let params = TallyParameters::new(3000.0, 65.0, 490.0);
//!
//! let mut ledger = JointLedger::new();
//! for _ in 0..3 {
//!     ledger.append(JointEntry::new(13.375, 12.0));
//! }
//!
//! let outcome = TallyProcessor::new(&catalog, &params).process(&mut ledger);
//! assert!(outcome.is_clean());
//!
//! let last = ledger.last().unwrap().derived();
//! assert!((last.cumulative_length_m - 36.0).abs() < 1e-9);
//! assert!((last.distance_to_reference_m - 2964.0).abs() < 1e-9);
//! assert!((last.cumulative_weight_klb - 6.249).abs() < 1e-3);
//! ```

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::buoyancy::TallyParameters;
use crate::catalog::{SpecificationCatalog, SIZE_TOLERANCE_IN};
use crate::ledger::{JointDerived, JointLedger, JointStatus};
use crate::units::{Barrels, CubicFeet, Feet, Inches, Kips, Meters, Pounds};

/// How to synthesize pipe data for a size the catalog lacks.
///
/// `weight_ppf = size × weight_factor`, `internal_diameter = size − id_offset_in`.
/// This is a rule of thumb for keeping a tally moving while catalog data is
/// missing, not a physical relation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackPolicy {
    /// lb/ft per inch of nominal size
    pub weight_factor: f64,
    /// Inches subtracted from nominal size to estimate the ID
    pub id_offset_in: f64,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        FallbackPolicy {
            weight_factor: 4.5,
            id_offset_in: 0.5,
        }
    }
}

impl FallbackPolicy {
    /// Synthesize pipe data for `size_in`
    pub fn synthesize(&self, size_in: f64) -> ResolvedPipe {
        ResolvedPipe {
            weight_ppf: size_in * self.weight_factor,
            internal_diameter_in: size_in - self.id_offset_in,
            from_catalog: false,
        }
    }
}

/// Pipe data the calculation uses for one joint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPipe {
    pub weight_ppf: f64,
    pub internal_diameter_in: f64,
    /// False when the fallback policy supplied the numbers
    pub from_catalog: bool,
}

/// What a single IN joint adds to the string.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointContribution {
    pub length_m: f64,
    pub buoyed_weight_klb: f64,
    pub capacity_bbl: f64,
}

/// Compute one joint's contribution from its pipe data and length.
pub fn joint_contribution(pipe: &ResolvedPipe, length_m: f64, buoyancy_factor: f64) -> JointContribution {
    let length_ft: Feet = Meters(length_m).into();

    let air_weight = Pounds(pipe.weight_ppf * length_ft.value());
    let buoyed_weight = Kips::from(air_weight) * buoyancy_factor;

    let radius_ft = Feet::from(Inches(pipe.internal_diameter_in)) / 2.0;
    let volume = CubicFeet(PI * radius_ft.value().powi(2) * length_ft.value());
    let capacity: Barrels = volume.into();

    JointContribution {
        length_m,
        buoyed_weight_klb: buoyed_weight.value(),
        capacity_bbl: capacity.value(),
    }
}

/// Non-fatal findings from a tally pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessOutcome {
    /// Distinct sizes resolved through the fallback policy
    pub fallback_sizes: Vec<f64>,
    /// Sequence numbers of IN joints with a negative length
    pub negative_length_joints: Vec<u32>,
}

impl ProcessOutcome {
    /// True when every size was in the catalog and no length was negative
    pub fn is_clean(&self) -> bool {
        self.fallback_sizes.is_empty() && self.negative_length_joints.is_empty()
    }

    fn note_fallback(&mut self, size_in: f64) {
        if !self
            .fallback_sizes
            .iter()
            .any(|s| (s - size_in).abs() < SIZE_TOLERANCE_IN)
        {
            self.fallback_sizes.push(size_in);
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    length_m: f64,
    weight_klb: f64,
    capacity_bbl: f64,
}

impl Accumulator {
    fn seeded_from(derived: &JointDerived) -> Self {
        Accumulator {
            length_m: derived.cumulative_length_m,
            weight_klb: derived.cumulative_weight_klb,
            capacity_bbl: derived.cumulative_capacity_bbl,
        }
    }

    fn add(&mut self, contribution: &JointContribution) {
        self.length_m += contribution.length_m;
        self.weight_klb += contribution.buoyed_weight_klb;
        self.capacity_bbl += contribution.capacity_bbl;
    }

    fn snapshot(&self, reference_depth_m: f64) -> JointDerived {
        JointDerived {
            cumulative_length_m: self.length_m,
            distance_to_reference_m: reference_depth_m - self.length_m,
            cumulative_weight_klb: self.weight_klb,
            cumulative_capacity_bbl: self.capacity_bbl,
        }
    }
}

/// Runs the cumulative pass against a catalog and parameter set.
///
/// Borrows the catalog, so one catalog can serve any number of ledgers.
#[derive(Debug, Clone, Copy)]
pub struct TallyProcessor<'a> {
    catalog: &'a SpecificationCatalog,
    parameters: &'a TallyParameters,
    fallback: FallbackPolicy,
}

impl<'a> TallyProcessor<'a> {
    pub fn new(catalog: &'a SpecificationCatalog, parameters: &'a TallyParameters) -> Self {
        TallyProcessor {
            catalog,
            parameters,
            fallback: FallbackPolicy::default(),
        }
    }

    /// Use a non-default fallback policy for catalog misses
    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    /// Resolve pipe data for a size, falling back on a catalog miss.
    pub fn resolve(&self, size_in: f64) -> ResolvedPipe {
        match self.catalog.lookup(size_in) {
            Some(spec) => ResolvedPipe {
                weight_ppf: spec.weight_ppf,
                internal_diameter_in: spec.internal_diameter_in,
                from_catalog: true,
            },
            None => self.fallback.synthesize(size_in),
        }
    }

    /// Recompute every joint's derived fields.
    pub fn process(&self, ledger: &mut JointLedger) -> ProcessOutcome {
        self.process_from(ledger, 0)
    }

    /// Recompute derived fields from `start` (0-based) to the end.
    ///
    /// The accumulator is seeded from the joint before `start`, so joints
    /// `0..start` must already hold valid derived fields for the same
    /// catalog and parameters. `start` past the end is a no-op.
    pub fn process_from(&self, ledger: &mut JointLedger, start: usize) -> ProcessOutcome {
        let mut outcome = ProcessOutcome::default();
        let reference_depth_m = self.parameters.reference_depth_m();
        let buoyancy_factor = self.parameters.buoyancy_factor();

        let entries = ledger.entries_mut();
        if start >= entries.len() {
            return outcome;
        }

        let mut acc = match start.checked_sub(1) {
            Some(prev) => Accumulator::seeded_from(entries[prev].derived()),
            None => Accumulator::default(),
        };

        for entry in entries[start..].iter_mut() {
            if entry.status == JointStatus::In {
                let pipe = self.resolve(entry.size_in);
                if !pipe.from_catalog {
                    debug!(sequence = entry.sequence(), size_in = entry.size_in, "Size not in catalog, using fallback");
                    outcome.note_fallback(entry.size_in);
                }
                if entry.length_m < 0.0 {
                    outcome.negative_length_joints.push(entry.sequence());
                }
                acc.add(&joint_contribution(&pipe, entry.length_m, buoyancy_factor));
            }
            entry.set_derived(acc.snapshot(reference_depth_m));
        }

        if !outcome.fallback_sizes.is_empty() {
            warn!(sizes = ?outcome.fallback_sizes, "Casing sizes missing from catalog; fallback weights used");
        }
        if !outcome.negative_length_joints.is_empty() {
            warn!(joints = ?outcome.negative_length_joints, "Negative joint lengths included in tally");
        }
        debug!(
            start,
            joints = entries.len(),
            buoyancy_factor,
            total_length_m = acc.length_m,
            "Tally pass complete"
        );

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CasingSpecification;
    use crate::ledger::{JointEntry, JointUpdate};

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {} ± {}, got {}",
            expected,
            tol,
            actual
        );
    }

    fn surface_catalog() -> SpecificationCatalog {
        SpecificationCatalog::from_specs([CasingSpecification::new(13.375, 61.0, 12.415)])
    }

    fn surface_params() -> TallyParameters {
        TallyParameters::new(3000.0, 65.0, 490.0)
    }

    fn ledger_of(lengths: &[f64]) -> JointLedger {
        let mut ledger = JointLedger::new();
        for &len in lengths {
            ledger.append(JointEntry::new(13.375, len));
        }
        ledger
    }

    fn derived(ledger: &JointLedger) -> Vec<JointDerived> {
        ledger.iter().map(|j| *j.derived()).collect()
    }

    #[test]
    fn test_joint_contribution_surface_casing() {
        let pipe = ResolvedPipe {
            weight_ppf: 61.0,
            internal_diameter_in: 12.415,
            from_catalog: true,
        };
        let c = joint_contribution(&pipe, 12.0, 1.0 - 65.0 / 490.0);

        // 61 lb/ft × 39.37 ft = 2401.6 lb in air
        assert_close(c.buoyed_weight_klb, 2.083, 1e-3);
        // π × (12.415/24)² × 39.37 / 5.615
        assert_close(c.capacity_bbl, 5.894, 1e-3);
    }

    #[test]
    fn test_zero_buoyancy_factor_zeroes_weight() {
        let catalog = surface_catalog();
        let params = TallyParameters::new(3000.0, 65.0, 0.0);
        let mut ledger = ledger_of(&[12.0, 12.0]);

        TallyProcessor::new(&catalog, &params).process(&mut ledger);
        let last = ledger.last().unwrap().derived();
        assert_eq!(last.cumulative_weight_klb, 0.0);
        assert!(last.cumulative_capacity_bbl > 0.0);
    }

    #[test]
    fn test_out_joint_at_start_holds_zero_accumulator() {
        let catalog = surface_catalog();
        let params = surface_params();
        let mut ledger = ledger_of(&[12.0, 12.0]);
        ledger.update(0, JointUpdate::status(JointStatus::Out)).unwrap();

        TallyProcessor::new(&catalog, &params).process(&mut ledger);
        let first = ledger.get(0).unwrap().derived();
        assert_eq!(first.cumulative_length_m, 0.0);
        assert_eq!(first.cumulative_weight_klb, 0.0);
        assert_eq!(first.cumulative_capacity_bbl, 0.0);
        assert_eq!(first.distance_to_reference_m, 3000.0);

        assert_close(ledger.get(1).unwrap().derived().cumulative_length_m, 12.0, 1e-12);
    }

    #[test]
    fn test_fallback_policy_is_overridable() {
        let catalog = SpecificationCatalog::new();
        let params = surface_params();
        let policy = FallbackPolicy {
            weight_factor: 5.0,
            id_offset_in: 1.0,
        };
        let processor = TallyProcessor::new(&catalog, &params).with_fallback(policy);

        let pipe = processor.resolve(10.0);
        assert_eq!(pipe.weight_ppf, 50.0);
        assert_eq!(pipe.internal_diameter_in, 9.0);
        assert!(!pipe.from_catalog);
    }

    #[test]
    fn test_outcome_lists_distinct_fallback_sizes() {
        let catalog = surface_catalog();
        let params = surface_params();
        let mut ledger = JointLedger::new();
        ledger.append(JointEntry::new(20.0, 12.0));
        ledger.append(JointEntry::new(13.375, 12.0));
        ledger.append(JointEntry::new(20.0, 12.0));
        ledger.append(JointEntry::new(7.0, 12.0).with_status(JointStatus::Out));

        let outcome = TallyProcessor::new(&catalog, &params).process(&mut ledger);
        assert_eq!(outcome.fallback_sizes, vec![20.0]);
        assert!(outcome.negative_length_joints.is_empty());
    }

    #[test]
    fn test_negative_length_passes_through() {
        let catalog = surface_catalog();
        let params = surface_params();
        let mut ledger = ledger_of(&[12.0, -2.0]);

        let outcome = TallyProcessor::new(&catalog, &params).process(&mut ledger);
        assert_eq!(outcome.negative_length_joints, vec![2]);
        assert_close(ledger.last().unwrap().derived().cumulative_length_m, 10.0, 1e-12);
    }

    #[test]
    fn test_distance_goes_negative_past_reference() {
        let catalog = surface_catalog();
        let params = TallyParameters::new(20.0, 65.0, 490.0);
        let mut ledger = ledger_of(&[12.0, 12.0]);

        TallyProcessor::new(&catalog, &params).process(&mut ledger);
        assert_close(ledger.last().unwrap().derived().distance_to_reference_m, -4.0, 1e-12);
    }

    #[test]
    fn test_process_from_matches_full_pass() {
        let catalog = surface_catalog();
        let params = surface_params();
        let processor = TallyProcessor::new(&catalog, &params);

        let mut incremental = ledger_of(&[12.0, 11.9, 12.2, 11.7, 12.1]);
        processor.process(&mut incremental);
        incremental.update(3, JointUpdate::length(9.0)).unwrap();
        incremental.update(2, JointUpdate::status(JointStatus::Out)).unwrap();
        processor.process_from(&mut incremental, 2);

        let mut full = incremental.clone();
        processor.process(&mut full);

        assert_eq!(derived(&incremental), derived(&full));
    }

    #[test]
    fn test_process_from_past_end_is_noop() {
        let catalog = surface_catalog();
        let params = surface_params();
        let mut ledger = ledger_of(&[12.0]);
        let outcome = TallyProcessor::new(&catalog, &params).process_from(&mut ledger, 5);
        assert!(outcome.is_clean());
        assert_eq!(*ledger.get(0).unwrap().derived(), JointDerived::default());
    }

    #[test]
    fn test_empty_ledger() {
        let catalog = SpecificationCatalog::new();
        let params = TallyParameters::default();
        let mut ledger = JointLedger::new();
        let outcome = TallyProcessor::new(&catalog, &params).process(&mut ledger);
        assert!(outcome.is_clean());
    }
}
