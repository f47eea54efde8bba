//! # Casing Tally
//!
//! [`CasingTally`] ties the catalog, the joint ledger and the parameters
//! together and keeps the derived fields current. Every edit made through it
//! (joint append/update/remove, parameter change, catalog upsert) runs a full
//! tally pass and re-aggregates the summary before returning, so callers
//! never observe stale running totals.
//!
//! [`TallySnapshot`] is the serializable shape handed to persistence:
//!
//! ```text
//! TallySnapshot
//! ├── meta: TallyMetadata (version, id, label, well, timestamps)
//! ├── specifications: SpecificationCatalog
//! ├── joints: JointLedger (with derived fields as last computed)
//! ├── parameters: TallyParameters
//! └── fallback: FallbackPolicy
//! ```
//!
//! ## Example
//!
//! ```rust
//! use tally_core::catalog::SpecificationCatalog;
//! use tally_core::ledger::{JointEntry, JointStatus, JointUpdate};
//! use tally_core::tally::CasingTally;
//!
//! let mut tally = CasingTally::new("9-5/8 intermediate", "Endeavour-7")
//!     .with_catalog(SpecificationCatalog::api_standard());
//! tally.set_reference_depth(1850.0);
//! tally.set_mud_weight(75.0);
//!
//! tally.append_joint(JointEntry::new(9.625, 12.1));
//! tally.append_joint(JointEntry::new(9.625, 11.9));
//! tally.update_joint(1, JointUpdate::status(JointStatus::Out)).unwrap();
//!
//! assert_eq!(tally.summary().in_joints, 1);
//! assert!((tally.summary().total_length_m - 12.1).abs() < 1e-9);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::buoyancy::TallyParameters;
use crate::calculations::{FallbackPolicy, ProcessOutcome, TallyProcessor, TallySummary};
use crate::catalog::{CasingSpecification, SpecificationCatalog};
use crate::config::{JointDefaults, TallyConfig};
use crate::errors::TallyResult;
use crate::ledger::{JointEntry, JointLedger, JointUpdate};
use crate::report::{SummaryReport, DEFAULT_CATALOG_PREVIEW};

/// Current schema version for tally snapshots
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Identification and timestamps for a tally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TallyMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Stable identifier for this tally
    pub id: Uuid,

    /// Casing string label (e.g. "13-3/8 surface")
    #[serde(default)]
    pub label: String,

    /// Well name
    #[serde(default)]
    pub well: String,

    pub created: DateTime<Utc>,

    pub modified: DateTime<Utc>,
}

impl TallyMetadata {
    pub fn new(label: impl Into<String>, well: impl Into<String>) -> Self {
        let now = Utc::now();
        TallyMetadata {
            version: SCHEMA_VERSION.to_string(),
            id: Uuid::new_v4(),
            label: label.into(),
            well: well.into(),
            created: now,
            modified: now,
        }
    }
}

/// Serializable state of a tally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TallySnapshot {
    pub meta: TallyMetadata,
    #[serde(default)]
    pub specifications: SpecificationCatalog,
    #[serde(default)]
    pub joints: JointLedger,
    #[serde(default)]
    pub parameters: TallyParameters,
    /// Catalog-miss policy the derived fields were computed with
    #[serde(default)]
    pub fallback: FallbackPolicy,
}

/// A live tally: ledger, catalog and parameters with derived fields kept current.
#[derive(Debug, Clone)]
pub struct CasingTally {
    /// Identification and timestamps
    pub meta: TallyMetadata,
    catalog: SpecificationCatalog,
    ledger: JointLedger,
    parameters: TallyParameters,
    fallback: FallbackPolicy,
    joint_defaults: JointDefaults,
    catalog_preview: usize,
    summary: TallySummary,
    outcome: ProcessOutcome,
}

impl CasingTally {
    /// Create an empty tally with an empty catalog and default parameters.
    pub fn new(label: impl Into<String>, well: impl Into<String>) -> Self {
        CasingTally {
            meta: TallyMetadata::new(label, well),
            catalog: SpecificationCatalog::new(),
            ledger: JointLedger::new(),
            parameters: TallyParameters::default(),
            fallback: FallbackPolicy::default(),
            joint_defaults: JointDefaults::default(),
            catalog_preview: DEFAULT_CATALOG_PREVIEW,
            summary: TallySummary::default(),
            outcome: ProcessOutcome::default(),
        }
    }

    /// Create a tally whose parameters, fallback and defaults come from config.
    pub fn from_config(config: &TallyConfig, label: impl Into<String>, well: impl Into<String>) -> Self {
        Self::new(label, well)
            .with_parameters(config.parameters.to_parameters())
            .with_fallback(config.fallback)
            .with_config(config)
    }

    /// Rebuild a live tally from a snapshot and recompute.
    ///
    /// Derived fields stored in the snapshot are not trusted.
    pub fn from_snapshot(snapshot: TallySnapshot) -> Self {
        let mut tally = CasingTally {
            meta: snapshot.meta,
            catalog: snapshot.specifications,
            ledger: snapshot.joints,
            parameters: snapshot.parameters,
            fallback: snapshot.fallback,
            ..Self::new("", "")
        };
        tally.recompute();
        tally
    }

    /// Capture the current state for persistence.
    pub fn to_snapshot(&self) -> TallySnapshot {
        TallySnapshot {
            meta: self.meta.clone(),
            specifications: self.catalog.clone(),
            joints: self.ledger.clone(),
            parameters: self.parameters,
            fallback: self.fallback,
        }
    }

    /// Replace the catalog
    pub fn with_catalog(mut self, catalog: SpecificationCatalog) -> Self {
        self.catalog = catalog;
        self.recompute();
        self
    }

    /// Replace the parameters
    pub fn with_parameters(mut self, parameters: TallyParameters) -> Self {
        self.parameters = parameters;
        self.recompute();
        self
    }

    /// Replace the catalog-miss policy
    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self.recompute();
        self
    }

    /// Apply joint defaults and report options from config.
    ///
    /// Parameters and the fallback policy are tally inputs stored in the
    /// snapshot, so they are left alone; see [`CasingTally::from_config`].
    pub fn with_config(mut self, config: &TallyConfig) -> Self {
        self.joint_defaults = config.joint_defaults.clone();
        self.catalog_preview = config.report.catalog_preview;
        self
    }

    // ------------------------------------------------------------------
    // Joint edits
    // ------------------------------------------------------------------

    /// Append a joint; returns its sequence number.
    pub fn append_joint(&mut self, entry: JointEntry) -> u32 {
        let sequence = self.ledger.append(entry);
        self.edited();
        sequence
    }

    /// Append a joint carrying the configured default size, grade and length.
    pub fn append_default_joint(&mut self) -> u32 {
        self.append_joint(self.joint_defaults.to_entry())
    }

    /// Edit the joint at a 0-based index.
    pub fn update_joint(&mut self, index: usize, update: JointUpdate) -> TallyResult<()> {
        self.ledger.update(index, update)?;
        self.edited();
        Ok(())
    }

    /// Remove the joint at a 0-based index; later joints are renumbered.
    pub fn remove_joint(&mut self, index: usize) -> TallyResult<JointEntry> {
        let removed = self.ledger.remove(index)?;
        self.edited();
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Parameter and catalog edits
    // ------------------------------------------------------------------

    pub fn set_reference_depth(&mut self, reference_depth_m: f64) {
        self.parameters.set_reference_depth(reference_depth_m);
        self.edited();
    }

    pub fn set_mud_weight(&mut self, mud_weight: f64) {
        self.parameters.set_mud_weight(mud_weight);
        self.edited();
    }

    pub fn set_steel_density(&mut self, steel_density: f64) {
        self.parameters.set_steel_density(steel_density);
        self.edited();
    }

    pub fn set_parameters(&mut self, parameters: TallyParameters) {
        self.parameters = parameters;
        self.edited();
    }

    /// Insert or replace a catalog entry; returns the replaced entry.
    pub fn upsert_specification(&mut self, spec: CasingSpecification) -> Option<CasingSpecification> {
        let replaced = self.catalog.upsert(spec);
        self.edited();
        replaced
    }

    // ------------------------------------------------------------------
    // Computation and views
    // ------------------------------------------------------------------

    /// Run a full tally pass and re-aggregate the summary.
    pub fn recompute(&mut self) -> &TallySummary {
        self.outcome = TallyProcessor::new(&self.catalog, &self.parameters)
            .with_fallback(self.fallback)
            .process(&mut self.ledger);
        self.summary = TallySummary::from_ledger(&self.ledger);
        debug!(
            tally = %self.meta.id,
            joints = self.summary.total_joints,
            total_length_m = self.summary.total_length_m,
            "Tally recomputed"
        );
        &self.summary
    }

    pub fn summary(&self) -> &TallySummary {
        &self.summary
    }

    /// Findings from the latest pass (fallback sizes, negative lengths)
    pub fn diagnostics(&self) -> &ProcessOutcome {
        &self.outcome
    }

    pub fn joints(&self) -> &JointLedger {
        &self.ledger
    }

    pub fn catalog(&self) -> &SpecificationCatalog {
        &self.catalog
    }

    pub fn parameters(&self) -> &TallyParameters {
        &self.parameters
    }

    pub fn fallback(&self) -> &FallbackPolicy {
        &self.fallback
    }

    /// Plain-text summary report
    pub fn report(&self) -> String {
        SummaryReport::new(&self.parameters, &self.summary, &self.catalog)
            .with_heading(&self.meta.label, &self.meta.well)
            .with_catalog_preview(self.catalog_preview)
            .to_string()
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    fn edited(&mut self) {
        self.recompute();
        self.touch();
    }
}

impl Default for CasingTally {
    fn default() -> Self {
        CasingTally::new("", "")
    }
}
