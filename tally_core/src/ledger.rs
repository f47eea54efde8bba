//! # Joint Ledger
//!
//! The tally itself: an ordered list of casing joints as they are run.
//!
//! The ledger owns sequence numbering. Joints are numbered 1..=n in ledger
//! order, and removing a joint renumbers everything after it. Derived
//! columns (cumulative length, distance to reference, weight, capacity) are
//! written only by [`crate::calculations::TallyProcessor`]; after any edit
//! they are stale until the next pass. [`crate::tally::CasingTally`] runs
//! that pass on every edit.
//!
//! ## Example
//!
//! ```rust
//! use tally_core::ledger::{JointEntry, JointLedger, JointStatus, JointUpdate};
//!
//! let mut ledger = JointLedger::new();
//! ledger.append(JointEntry::new(13.375, 12.0));
//! ledger.append(JointEntry::new(13.375, 11.8));
//! ledger.append(JointEntry::new(13.375, 12.1));
//!
//! ledger.update(1, JointUpdate::status(JointStatus::Out)).unwrap();
//! ledger.remove(0).unwrap();
//!
//! let seqs: Vec<u32> = ledger.iter().map(|j| j.sequence()).collect();
//! assert_eq!(seqs, vec![1, 2]);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{TallyError, TallyResult};

/// Whether a joint is in the hole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum JointStatus {
    /// Run into the wellbore; contributes to the string
    #[default]
    #[serde(rename = "IN")]
    In,
    /// Pulled, rejected or not yet run; logged but contributes nothing
    #[serde(rename = "OUT")]
    Out,
}

impl JointStatus {
    pub fn is_in(&self) -> bool {
        matches!(self, JointStatus::In)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JointStatus::In => "IN",
            JointStatus::Out => "OUT",
        }
    }
}

impl std::fmt::Display for JointStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for JointStatus {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "IN" => Ok(JointStatus::In),
            "OUT" => Ok(JointStatus::Out),
            _ => Err(TallyError::invalid_input("status", s, "Status must be IN or OUT")),
        }
    }
}

/// Running totals written onto a joint by the tally pass.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct JointDerived {
    /// Cumulative run-in length (m)
    pub cumulative_length_m: f64,
    /// Reference depth minus cumulative length (m); negative past the reference
    pub distance_to_reference_m: f64,
    /// Cumulative buoyed string weight (klb)
    pub cumulative_weight_klb: f64,
    /// Cumulative internal capacity (bbl)
    pub cumulative_capacity_bbl: f64,
}

/// One casing joint in the tally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointEntry {
    /// 1-based position, assigned by the ledger
    #[serde(default)]
    sequence: u32,

    /// Nominal size (in), resolved against the catalog
    pub size_in: f64,

    /// Steel grade as tallied
    #[serde(default)]
    pub grade: String,

    /// Purchase order / pipe order reference
    #[serde(default)]
    pub order_reference: String,

    /// Measured joint length (m)
    pub length_m: f64,

    /// Centralizer fitted on this joint
    #[serde(default)]
    pub centralizer: bool,

    #[serde(default)]
    pub status: JointStatus,

    #[serde(default)]
    pub remarks: String,

    #[serde(default)]
    derived: JointDerived,
}

impl JointEntry {
    /// A running (IN) joint of the given size and length.
    pub fn new(size_in: f64, length_m: f64) -> Self {
        JointEntry {
            sequence: 0,
            size_in,
            grade: String::new(),
            order_reference: String::new(),
            length_m,
            centralizer: false,
            status: JointStatus::In,
            remarks: String::new(),
            derived: JointDerived::default(),
        }
    }

    pub fn with_grade(mut self, grade: impl Into<String>) -> Self {
        self.grade = grade.into();
        self
    }

    pub fn with_order_reference(mut self, order_reference: impl Into<String>) -> Self {
        self.order_reference = order_reference.into();
        self
    }

    pub fn with_status(mut self, status: JointStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_centralizer(mut self, centralizer: bool) -> Self {
        self.centralizer = centralizer;
        self
    }

    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = remarks.into();
        self
    }

    /// 1-based sequence number
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Derived running totals from the last tally pass
    pub fn derived(&self) -> &JointDerived {
        &self.derived
    }

    pub(crate) fn set_derived(&mut self, derived: JointDerived) {
        self.derived = derived;
    }
}

/// Field edits for [`JointLedger::update`]. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JointUpdate {
    pub size_in: Option<f64>,
    pub grade: Option<String>,
    pub order_reference: Option<String>,
    pub length_m: Option<f64>,
    pub centralizer: Option<bool>,
    pub status: Option<JointStatus>,
    pub remarks: Option<String>,
}

impl JointUpdate {
    /// Update only the status
    pub fn status(status: JointStatus) -> Self {
        JointUpdate {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Update only the length
    pub fn length(length_m: f64) -> Self {
        JointUpdate {
            length_m: Some(length_m),
            ..Default::default()
        }
    }

    /// Update only the size
    pub fn size(size_in: f64) -> Self {
        JointUpdate {
            size_in: Some(size_in),
            ..Default::default()
        }
    }

    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        *self == JointUpdate::default()
    }

    fn apply(self, entry: &mut JointEntry) {
        if let Some(size_in) = self.size_in {
            entry.size_in = size_in;
        }
        if let Some(grade) = self.grade {
            entry.grade = grade;
        }
        if let Some(order_reference) = self.order_reference {
            entry.order_reference = order_reference;
        }
        if let Some(length_m) = self.length_m {
            entry.length_m = length_m;
        }
        if let Some(centralizer) = self.centralizer {
            entry.centralizer = centralizer;
        }
        if let Some(status) = self.status {
            entry.status = status;
        }
        if let Some(remarks) = self.remarks {
            entry.remarks = remarks;
        }
    }
}

/// Ordered joints with contiguous 1-based numbering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<JointEntry>", into = "Vec<JointEntry>")]
pub struct JointLedger {
    entries: Vec<JointEntry>,
}

impl JointLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a joint and return its sequence number.
    pub fn append(&mut self, mut entry: JointEntry) -> u32 {
        let sequence = self.entries.len() as u32 + 1;
        entry.sequence = sequence;
        self.entries.push(entry);
        sequence
    }

    /// Remove the joint at a 0-based index and renumber the rest.
    pub fn remove(&mut self, index: usize) -> TallyResult<JointEntry> {
        self.check_index(index)?;
        let removed = self.entries.remove(index);
        self.renumber_from(index);
        Ok(removed)
    }

    /// Apply field edits to the joint at a 0-based index.
    pub fn update(&mut self, index: usize, update: JointUpdate) -> TallyResult<()> {
        self.check_index(index)?;
        update.apply(&mut self.entries[index]);
        Ok(())
    }

    /// 0-based index of the joint with a given sequence number
    pub fn index_of(&self, sequence: u32) -> Option<usize> {
        let index = (sequence as usize).checked_sub(1)?;
        (index < self.entries.len()).then_some(index)
    }

    pub fn get(&self, index: usize) -> Option<&JointEntry> {
        self.entries.get(index)
    }

    pub fn last(&self) -> Option<&JointEntry> {
        self.entries.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, JointEntry> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[JointEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [JointEntry] {
        &mut self.entries
    }

    fn check_index(&self, index: usize) -> TallyResult<()> {
        if index >= self.entries.len() {
            return Err(TallyError::joint_not_found(index, self.entries.len()));
        }
        Ok(())
    }

    fn renumber_from(&mut self, index: usize) {
        for (i, entry) in self.entries.iter_mut().enumerate().skip(index) {
            entry.sequence = i as u32 + 1;
        }
    }
}

impl From<Vec<JointEntry>> for JointLedger {
    fn from(entries: Vec<JointEntry>) -> Self {
        let mut ledger = JointLedger { entries };
        ledger.renumber_from(0);
        ledger
    }
}

impl From<JointLedger> for Vec<JointEntry> {
    fn from(ledger: JointLedger) -> Self {
        ledger.entries
    }
}

impl<'a> IntoIterator for &'a JointLedger {
    type Item = &'a JointEntry;
    type IntoIter = std::slice::Iter<'a, JointEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_of(n: usize) -> JointLedger {
        let mut ledger = JointLedger::new();
        for i in 0..n {
            ledger.append(JointEntry::new(9.625, 11.5 + i as f64 * 0.1));
        }
        ledger
    }

    fn sequences(ledger: &JointLedger) -> Vec<u32> {
        ledger.iter().map(|j| j.sequence()).collect()
    }

    #[test]
    fn test_append_assigns_next_sequence() {
        let mut ledger = JointLedger::new();
        assert_eq!(ledger.append(JointEntry::new(7.0, 12.0)), 1);
        assert_eq!(ledger.append(JointEntry::new(7.0, 12.0)), 2);
        assert_eq!(sequences(&ledger), vec![1, 2]);
    }

    #[test]
    fn test_remove_renumbers() {
        let mut ledger = ledger_of(5);
        let removed = ledger.remove(1).unwrap();
        assert_eq!(removed.sequence(), 2);
        assert_eq!(sequences(&ledger), vec![1, 2, 3, 4]);
        assert!((ledger.get(1).unwrap().length_m - 11.7).abs() < 1e-12);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut ledger = ledger_of(2);
        let err = ledger.remove(2).unwrap_err();
        assert_eq!(err, TallyError::joint_not_found(2, 2));
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_update_fields() {
        let mut ledger = ledger_of(2);
        let update = JointUpdate {
            grade: Some("L-80".to_string()),
            centralizer: Some(true),
            status: Some(JointStatus::Out),
            ..Default::default()
        };
        ledger.update(0, update).unwrap();

        let joint = ledger.get(0).unwrap();
        assert_eq!(joint.grade, "L-80");
        assert!(joint.centralizer);
        assert_eq!(joint.status, JointStatus::Out);
        assert_eq!(joint.size_in, 9.625);

        assert!(ledger.update(9, JointUpdate::length(1.0)).is_err());
    }

    #[test]
    fn test_index_of() {
        let ledger = ledger_of(3);
        assert_eq!(ledger.index_of(1), Some(0));
        assert_eq!(ledger.index_of(3), Some(2));
        assert_eq!(ledger.index_of(0), None);
        assert_eq!(ledger.index_of(4), None);
    }

    #[test]
    fn test_status_parse_and_serialize() {
        assert_eq!("in".parse::<JointStatus>().unwrap(), JointStatus::In);
        assert_eq!(" OUT ".parse::<JointStatus>().unwrap(), JointStatus::Out);
        assert!("pulled".parse::<JointStatus>().is_err());

        assert_eq!(serde_json::to_string(&JointStatus::Out).unwrap(), "\"OUT\"");
    }

    #[test]
    fn test_deserialize_renumbers() {
        let json = r#"[
            {"sequence": 7, "size_in": 7.0, "length_m": 12.0},
            {"sequence": 7, "size_in": 7.0, "length_m": 11.0, "status": "OUT"}
        ]"#;
        let ledger: JointLedger = serde_json::from_str(json).unwrap();
        assert_eq!(sequences(&ledger), vec![1, 2]);
        assert_eq!(ledger.get(1).unwrap().status, JointStatus::Out);
    }

    #[test]
    fn test_empty_update() {
        assert!(JointUpdate::default().is_empty());
        assert!(!JointUpdate::size(7.0).is_empty());
    }
}
