//! # Summary Report
//!
//! Plain-text summary of a tally for printing or handing to an export
//! collaborator. Formatting only: every number shown is already computed by
//! the processor or the statistics pass. Blank text fields render as
//! `Not Selected`.
//!
//! ## Example
//!
//! ```rust
//! use tally_core::buoyancy::TallyParameters;
//! use tally_core::calculations::TallySummary;
//! use tally_core::catalog::SpecificationCatalog;
//! use tally_core::report::SummaryReport;
//!
//! let params = TallyParameters::new(3000.0, 65.0, 490.0);
//! let summary = TallySummary::default();
//! let catalog = SpecificationCatalog::api_standard();
//!
//! let text = SummaryReport::new(&params, &summary, &catalog).to_string();
//! assert!(text.contains("Buoyancy factor:"));
//! assert!(text.contains("Tally:             Not Selected"));
//! ```

use std::fmt;

use crate::buoyancy::TallyParameters;
use crate::calculations::TallySummary;
use crate::catalog::SpecificationCatalog;

/// Catalog entries listed when no preview limit is set
pub const DEFAULT_CATALOG_PREVIEW: usize = 5;

/// Placeholder for blank text fields
pub const NOT_SELECTED: &str = "Not Selected";

/// Fixed operational reminders printed at the end of every report
pub const RECOMMENDATIONS: [&str; 6] = [
    "Strap every joint with a steel tape and record lengths before running.",
    "Drift each joint; lay down any joint that will not pass the drift mandrel.",
    "Confirm mud weight before relying on the buoyed string weight.",
    "Re-check distance to reference after marking any joint OUT.",
    "Fill the string at the planned interval using the capacity figures above.",
    "Make up connections to the catalog make-up torque.",
];

/// Renders a tally summary as text via [`fmt::Display`].
#[derive(Debug, Clone, Copy)]
pub struct SummaryReport<'a> {
    parameters: &'a TallyParameters,
    summary: &'a TallySummary,
    catalog: &'a SpecificationCatalog,
    label: &'a str,
    well: &'a str,
    catalog_preview: usize,
}

impl<'a> SummaryReport<'a> {
    pub fn new(
        parameters: &'a TallyParameters,
        summary: &'a TallySummary,
        catalog: &'a SpecificationCatalog,
    ) -> Self {
        SummaryReport {
            parameters,
            summary,
            catalog,
            label: "",
            well: "",
            catalog_preview: DEFAULT_CATALOG_PREVIEW,
        }
    }

    /// Set the tally label and well name shown in the header
    pub fn with_heading(mut self, label: &'a str, well: &'a str) -> Self {
        self.label = label;
        self.well = well;
        self
    }

    /// Number of catalog entries to list
    pub fn with_catalog_preview(mut self, catalog_preview: usize) -> Self {
        self.catalog_preview = catalog_preview;
        self
    }
}

fn or_not_selected(text: &str) -> &str {
    if text.trim().is_empty() {
        NOT_SELECTED
    } else {
        text
    }
}

impl fmt::Display for SummaryReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.parameters;
        let s = self.summary;

        writeln!(f, "CASING TALLY SUMMARY")?;
        writeln!(f, "====================")?;
        writeln!(f, "Tally:             {}", or_not_selected(self.label))?;
        writeln!(f, "Well:              {}", or_not_selected(self.well))?;
        writeln!(f)?;

        writeln!(f, "PARAMETERS")?;
        writeln!(f, "  Reference depth: {:.2} m", p.reference_depth_m())?;
        writeln!(f, "  Mud weight:      {:.2}", p.mud_weight())?;
        writeln!(f, "  Steel density:   {:.2}", p.steel_density())?;
        writeln!(f, "  Buoyancy factor: {:.4}", p.buoyancy_factor())?;
        writeln!(f)?;

        writeln!(f, "STRING")?;
        writeln!(
            f,
            "  Joints:          {} (IN {} / OUT {})",
            s.total_joints, s.in_joints, s.out_joints
        )?;
        writeln!(f, "  Centralizers:    {}", s.centralizer_count)?;
        writeln!(
            f,
            "  Total length:    {:.2} m ({:.2} ft)",
            s.total_length_m, s.total_length_ft
        )?;
        writeln!(f, "  Average joint:   {:.2} m", s.average_joint_length_m)?;
        writeln!(f, "  To reference:    {:.2} m", s.shoe_distance_to_reference_m)?;
        writeln!(f, "  Buoyed weight:   {:.2} klb", s.total_weight_klb)?;
        writeln!(f, "  Capacity:        {:.2} bbl", s.total_capacity_bbl)?;
        writeln!(f)?;

        writeln!(f, "CASING SPECIFICATIONS")?;
        if self.catalog.is_empty() || self.catalog_preview == 0 {
            writeln!(f, "  {}", NOT_SELECTED)?;
        }
        for spec in self.catalog.iter().take(self.catalog_preview) {
            writeln!(
                f,
                "  {:>7.3}\"  {:>6.1} lb/ft  ID {:.3}\"  {}  {}",
                spec.size_in,
                spec.weight_ppf,
                spec.internal_diameter_in,
                or_not_selected(&spec.grade),
                or_not_selected(&spec.connection),
            )?;
        }
        if self.catalog.len() > self.catalog_preview && self.catalog_preview > 0 {
            writeln!(f, "  ... {} more", self.catalog.len() - self.catalog_preview)?;
        }
        writeln!(f)?;

        writeln!(f, "RECOMMENDATIONS")?;
        for line in RECOMMENDATIONS {
            writeln!(f, "  - {}", line)?;
        }
        Ok(())
    }
}
