//! # Tally Statistics
//!
//! Summary figures for a processed ledger.
//!
//! Every joint already carries running totals, so string totals are read off
//! the **last joint in sequence order**. Summing the cumulative columns
//! across rows would count early joints once per row below them.

use serde::{Deserialize, Serialize};

use crate::ledger::JointLedger;
use crate::units::{Feet, Meters};

/// Summary of a processed tally.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TallySummary {
    /// All joints in the ledger
    pub total_joints: usize,
    /// Joints with status IN
    pub in_joints: usize,
    /// Joints with status OUT
    pub out_joints: usize,
    /// IN joints fitted with a centralizer
    pub centralizer_count: usize,
    /// String length (m)
    pub total_length_m: f64,
    /// String length (ft)
    pub total_length_ft: f64,
    /// Buoyed string weight (klb)
    pub total_weight_klb: f64,
    /// Internal capacity of the string (bbl)
    pub total_capacity_bbl: f64,
    /// Mean length of IN joints (m), 0 with no IN joints
    pub average_joint_length_m: f64,
    /// Distance from the last joint to the reference depth (m)
    pub shoe_distance_to_reference_m: f64,
}

impl TallySummary {
    /// Aggregate a ledger whose derived fields are current.
    ///
    /// An empty ledger gives an all-zero summary.
    pub fn from_ledger(ledger: &JointLedger) -> Self {
        let Some(last) = ledger.last() else {
            return TallySummary::default();
        };

        let (mut in_joints, mut out_joints, mut centralizer_count) = (0, 0, 0);
        for joint in ledger {
            if joint.status.is_in() {
                in_joints += 1;
                if joint.centralizer {
                    centralizer_count += 1;
                }
            } else {
                out_joints += 1;
            }
        }

        let totals = last.derived();
        let average_joint_length_m = if in_joints > 0 {
            totals.cumulative_length_m / in_joints as f64
        } else {
            0.0
        };

        TallySummary {
            total_joints: ledger.len(),
            in_joints,
            out_joints,
            centralizer_count,
            total_length_m: totals.cumulative_length_m,
            total_length_ft: Feet::from(Meters(totals.cumulative_length_m)).value(),
            total_weight_klb: totals.cumulative_weight_klb,
            total_capacity_bbl: totals.cumulative_capacity_bbl,
            average_joint_length_m,
            shoe_distance_to_reference_m: totals.distance_to_reference_m,
        }
    }
}
