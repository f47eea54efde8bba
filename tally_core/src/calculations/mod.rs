//! # Tally Calculations
//!
//! The computational part of the crate:
//!
//! - [`processor`] - the cumulative joint-by-joint pass
//! - [`statistics`] - summary figures read off a processed ledger
//!
//! Neither returns errors. Catalog misses and odd inputs are reported through
//! [`ProcessOutcome`] and carried into the numbers as-is.

pub mod processor;
pub mod statistics;

pub use processor::{
    joint_contribution, FallbackPolicy, JointContribution, ProcessOutcome, ResolvedPipe, TallyProcessor,
};
pub use statistics::TallySummary;
