//! # tally_core - Casing Tally Calculation Engine
//!
//! `tally_core` computes a casing tally: for every joint run into a well, the
//! cumulative run-in length, the distance left to a reference depth, the
//! buoyed string weight and the internal fluid capacity.
//!
//! ## Design
//!
//! - **Eager**: every edit through [`CasingTally`] recomputes the whole
//!   ledger, so derived fields are never stale
//! - **No failure path in the math**: catalog misses use a named fallback
//!   policy, bad steel density zeroes the buoyancy factor, and overruns show
//!   up as negative numbers
//! - **JSON-First**: all state serializes through [`TallySnapshot`]
//!
//! ## Quick Start
//!
//! ```rust
//! use tally_core::{CasingSpecification, CasingTally, JointEntry, SpecificationCatalog, TallyParameters};
//!
//! let catalog = SpecificationCatalog::from_specs([CasingSpecification::new(13.375, 61.0, 12.415)]);
//! let mut tally = CasingTally::new("13-3/8 surface", "Endeavour-7")
//!     .with_catalog(catalog)
//!     .with_parameters(TallyParameters::new(3000.0, 65.0, 490.0));
//!
//! for _ in 0..3 {
//!     tally.append_joint(JointEntry::new(13.375, 12.0));
//! }
//!
//! let summary = tally.summary();
//! assert!((summary.total_length_m - 36.0).abs() < 1e-9);
//! assert!((summary.total_weight_klb - 6.25).abs() < 0.01);
//!
//! println!("{}", tally.report());
//! ```
//!
//! ## Modules
//!
//! - [`catalog`] - size-keyed casing specifications
//! - [`buoyancy`] - buoyancy factor and tally parameters
//! - [`ledger`] - the ordered joint list
//! - [`calculations`] - the tally pass and summary statistics
//! - [`report`] - plain-text summary
//! - [`tally`] - the live tally and its snapshot
//! - [`config`] - TOML defaults
//! - [`file_io`] - snapshot files
//! - [`units`] - unit newtypes and conversions
//! - [`errors`] - structured error types

pub mod buoyancy;
pub mod calculations;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod file_io;
pub mod ledger;
pub mod report;
pub mod tally;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use buoyancy::{buoyancy_factor, TallyParameters};
pub use calculations::{FallbackPolicy, ProcessOutcome, TallyProcessor, TallySummary};
pub use catalog::{CasingSpecification, SpecificationCatalog};
pub use config::TallyConfig;
pub use errors::{TallyError, TallyResult};
pub use file_io::{load_snapshot, save_snapshot};
pub use ledger::{JointEntry, JointLedger, JointStatus, JointUpdate};
pub use report::SummaryReport;
pub use tally::{CasingTally, TallySnapshot};
