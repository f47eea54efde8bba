//! # Tally Configuration
//!
//! Operator-tunable defaults loaded from TOML. Every section is optional and
//! falls back to built-in values, so an empty file or no file at all gives
//! the stock behavior.
//!
//! ```toml
//! [parameters]
//! reference_depth_m = 3000.0
//! mud_weight = 65.0
//! steel_density = 490.0
//!
//! [joint_defaults]
//! size_in = 13.375
//! grade = "K-55"
//! length_m = 12.0
//!
//! [fallback]
//! weight_factor = 4.5
//! id_offset_in = 0.5
//!
//! [report]
//! catalog_preview = 5
//! ```
//!
//! Load with [`TallyConfig::load`], which searches:
//! 1. `$CASING_TALLY_CONFIG`
//! 2. `./tally_config.toml`
//! 3. Built-in defaults

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::buoyancy::{TallyParameters, STEEL_DENSITY_PCF};
use crate::calculations::FallbackPolicy;
use crate::errors::{TallyError, TallyResult};
use crate::ledger::JointEntry;

/// Environment variable naming a config file
pub const CONFIG_ENV_VAR: &str = "CASING_TALLY_CONFIG";

/// Config file looked for in the working directory
pub const LOCAL_CONFIG_FILE: &str = "tally_config.toml";

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TallyConfig {
    /// Starting parameters for new tallies
    #[serde(default)]
    pub parameters: ParameterDefaults,

    /// Values for joints appended without explicit data
    #[serde(default)]
    pub joint_defaults: JointDefaults,

    /// Catalog-miss policy
    #[serde(default)]
    pub fallback: FallbackPolicy,

    /// Summary report options
    #[serde(default)]
    pub report: ReportConfig,
}

/// Starting parameters for a new tally.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterDefaults {
    /// Reference depth (m)
    pub reference_depth_m: f64,
    /// Mud weight, same unit as steel density (lb/ft³ by default)
    pub mud_weight: f64,
    /// Steel density (lb/ft³ by default)
    pub steel_density: f64,
}

impl Default for ParameterDefaults {
    fn default() -> Self {
        ParameterDefaults {
            reference_depth_m: 0.0,
            mud_weight: 65.0,
            steel_density: STEEL_DENSITY_PCF,
        }
    }
}

impl ParameterDefaults {
    pub fn to_parameters(&self) -> TallyParameters {
        TallyParameters::new(self.reference_depth_m, self.mud_weight, self.steel_density)
    }
}

/// Size, grade and length given to a joint appended with no data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JointDefaults {
    pub size_in: f64,
    pub grade: String,
    pub length_m: f64,
}

impl Default for JointDefaults {
    fn default() -> Self {
        JointDefaults {
            size_in: 9.625,
            grade: "N-80".to_string(),
            length_m: 12.0,
        }
    }
}

impl JointDefaults {
    /// A new IN joint carrying these defaults
    pub fn to_entry(&self) -> JointEntry {
        JointEntry::new(self.size_in, self.length_m).with_grade(self.grade.clone())
    }
}

/// Summary report options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Catalog entries listed in the summary report
    pub catalog_preview: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig { catalog_preview: 5 }
    }
}

impl TallyConfig {
    /// Load configuration using the standard search order.
    ///
    /// A file that fails to load is logged and skipped, never fatal.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded tally config from {}", CONFIG_ENV_VAR);
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load tally config, falling back");
                    }
                }
            } else {
                warn!(path = %path, "{} points to a missing file, falling back", CONFIG_ENV_VAR);
            }
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded tally config from ./{}", LOCAL_CONFIG_FILE);
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", LOCAL_CONFIG_FILE);
                }
            }
        }

        info!("No tally config found, using built-in defaults");
        Self::default()
    }

    /// Load and validate a specific TOML file.
    pub fn load_from_file(path: &Path) -> TallyResult<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| TallyError::config_error(path.display().to_string(), e.to_string()))?;
        Self::parse(&contents, &path.display().to_string())
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(contents: &str) -> TallyResult<Self> {
        Self::parse(contents, "<toml>")
    }

    fn parse(contents: &str, origin: &str) -> TallyResult<Self> {
        let config: Self =
            toml::from_str(contents).map_err(|e| TallyError::config_error(origin, e.to_string()))?;
        config
            .problems()
            .map_or(Ok(config), |reason| Err(TallyError::config_error(origin, reason)))
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> TallyResult<String> {
        toml::to_string_pretty(self).map_err(|e| TallyError::SerializationError {
            reason: e.to_string(),
        })
    }

    /// Reject values that would poison every tally computed with them.
    ///
    /// Zero or negative steel density is allowed; it zeroes the buoyancy
    /// factor like it does for parameters edited at runtime.
    pub fn validate(&self) -> TallyResult<()> {
        match self.problems() {
            Some(reason) => Err(TallyError::config_error("<validation>", reason)),
            None => Ok(()),
        }
    }

    fn problems(&self) -> Option<String> {
        let mut problems = Vec::new();

        let finite_checks = [
            ("parameters.reference_depth_m", self.parameters.reference_depth_m),
            ("parameters.mud_weight", self.parameters.mud_weight),
            ("parameters.steel_density", self.parameters.steel_density),
            ("joint_defaults.size_in", self.joint_defaults.size_in),
            ("joint_defaults.length_m", self.joint_defaults.length_m),
            ("fallback.weight_factor", self.fallback.weight_factor),
            ("fallback.id_offset_in", self.fallback.id_offset_in),
        ];
        for (field, value) in finite_checks {
            if !value.is_finite() {
                problems.push(format!("{} must be a finite number (got {})", field, value));
            }
        }

        if self.joint_defaults.size_in <= 0.0 {
            problems.push(format!(
                "joint_defaults.size_in must be positive (got {})",
                self.joint_defaults.size_in
            ));
        }
        if self.joint_defaults.length_m < 0.0 {
            problems.push(format!(
                "joint_defaults.length_m cannot be negative (got {})",
                self.joint_defaults.length_m
            ));
        }
        if self.fallback.weight_factor < 0.0 {
            problems.push(format!(
                "fallback.weight_factor cannot be negative (got {})",
                self.fallback.weight_factor
            ));
        }

        (!problems.is_empty()).then(|| problems.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_default() {
        let config = TallyConfig::from_toml_str("").unwrap();
        assert_eq!(config, TallyConfig::default());
        assert_eq!(config.fallback, FallbackPolicy::default());
        assert_eq!(config.report.catalog_preview, 5);
    }

    #[test]
    fn test_partial_sections() {
        let config = TallyConfig::from_toml_str(
            r#"
[parameters]
reference_depth_m = 1850.0

[fallback]
weight_factor = 5.0
"#,
        )
        .unwrap();

        assert_eq!(config.parameters.reference_depth_m, 1850.0);
        assert_eq!(config.parameters.steel_density, STEEL_DENSITY_PCF);
        assert_eq!(config.fallback.weight_factor, 5.0);
        assert_eq!(config.fallback.id_offset_in, 0.5);
        assert_eq!(config.joint_defaults.grade, "N-80");
    }

    #[test]
    fn test_validation_rejects_bad_defaults() {
        let err = TallyConfig::from_toml_str(
            r#"
[joint_defaults]
size_in = 0.0
length_m = -3.0
"#,
        )
        .unwrap_err();

        assert_eq!(err.error_code(), "CONFIG_ERROR");
        let msg = err.to_string();
        assert!(msg.contains("joint_defaults.size_in"));
        assert!(msg.contains("joint_defaults.length_m"));
    }

    #[test]
    fn test_unparseable_toml() {
        let err = TallyConfig::from_toml_str("[parameters\nmud_weight = ").unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = TallyConfig::default();
        config.joint_defaults.size_in = 13.375;
        config.report.catalog_preview = 3;

        let text = config.to_toml().unwrap();
        let parsed = TallyConfig::from_toml_str(&text).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_joint_defaults_entry() {
        let entry = JointDefaults::default().to_entry();
        assert_eq!(entry.size_in, 9.625);
        assert_eq!(entry.grade, "N-80");
        assert_eq!(entry.length_m, 12.0);
        assert!(entry.status.is_in());
    }

    #[test]
    fn test_parameter_defaults_derive_factor() {
        let params = ParameterDefaults::default().to_parameters();
        assert!((params.buoyancy_factor() - (1.0 - 65.0 / 490.0)).abs() < 1e-12);
    }
}
