//! # File I/O Module
//!
//! Reads and writes [`TallySnapshot`]s as JSON `.tly` files:
//! - **Atomic saves**: write to `.tmp`, sync, rename over the target
//! - **Version validation**: refuse snapshots from a newer schema
//!
//! ## Example
//!
//! ```rust,no_run
//! use tally_core::file_io::{load_snapshot, save_snapshot};
//! use tally_core::tally::CasingTally;
//! use std::path::Path;
//!
//! let tally = CasingTally::new("7in liner", "Endeavour-7");
//! let path = Path::new("liner.tly");
//!
//! save_snapshot(&tally.to_snapshot(), path)?;
//! let restored = CasingTally::from_snapshot(load_snapshot(path)?);
//! # Ok::<(), tally_core::errors::TallyError>(())
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use tracing::info;

use crate::errors::{TallyError, TallyResult};
use crate::tally::{TallySnapshot, SCHEMA_VERSION};

/// File extension for tally snapshots
pub const SNAPSHOT_EXTENSION: &str = "tly";

/// Save a snapshot with atomic write semantics.
///
/// 1. Serialize to JSON
/// 2. Write to `<path>.tly.tmp`
/// 3. Sync to disk
/// 4. Rename over `path`
pub fn save_snapshot(snapshot: &TallySnapshot, path: &Path) -> TallyResult<()> {
    let json = serde_json::to_string_pretty(snapshot)?;

    let tmp_path = path.with_extension(format!("{}.tmp", SNAPSHOT_EXTENSION));

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        TallyError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        TallyError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        TallyError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        TallyError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    info!(
        path = %path.display(),
        joints = snapshot.joints.len(),
        "Tally snapshot saved"
    );
    Ok(())
}

/// Load a snapshot from a file.
///
/// # Returns
///
/// * `Err(TallyError::VersionMismatch)` - schema is newer or a different major
/// * `Err(TallyError::SerializationError)` - invalid JSON
/// * `Err(TallyError::FileError)` - I/O error
pub fn load_snapshot(path: &Path) -> TallyResult<TallySnapshot> {
    let mut file = File::open(path)
        .map_err(|e| TallyError::file_error("open", path.display().to_string(), e.to_string()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| TallyError::file_error("read", path.display().to_string(), e.to_string()))?;

    let snapshot: TallySnapshot =
        serde_json::from_str(&contents).map_err(|e| TallyError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", path.display(), e),
        })?;

    validate_version(&snapshot.meta.version)?;

    info!(
        path = %path.display(),
        joints = snapshot.joints.len(),
        specifications = snapshot.specifications.len(),
        "Tally snapshot loaded"
    );
    Ok(snapshot)
}

/// Check a file's schema version against [`SCHEMA_VERSION`].
fn validate_version(file_version: &str) -> TallyResult<()> {
    let parse = |v: &str| -> Vec<u32> { v.split('.').filter_map(|p| p.parse().ok()).collect() };
    let file_parts = parse(file_version);
    let current_parts = parse(SCHEMA_VERSION);

    let mismatch = || TallyError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(mismatch());
    }

    // Major version must match
    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }

    // 0.x: a newer minor may carry breaking changes
    if current_parts[0] == 0
        && file_parts.len() > 1
        && current_parts.len() > 1
        && file_parts[1] > current_parts[1]
    {
        return Err(mismatch());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SpecificationCatalog;
    use crate::ledger::JointEntry;
    use crate::tally::CasingTally;
    use std::env::temp_dir;
    use std::path::PathBuf;

    fn temp_snapshot_path(name: &str) -> PathBuf {
        temp_dir().join(format!("casing_tally_test_{}.{}", name, SNAPSHOT_EXTENSION))
    }

    fn sample_tally() -> CasingTally {
        let mut tally = CasingTally::new("Test string", "Test well")
            .with_catalog(SpecificationCatalog::api_standard());
        tally.set_reference_depth(1200.0);
        tally.append_joint(JointEntry::new(9.625, 12.0));
        tally.append_joint(JointEntry::new(9.625, 11.8));
        tally
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_snapshot_path("roundtrip");
        let tally = sample_tally();

        save_snapshot(&tally.to_snapshot(), &path).unwrap();
        let loaded = load_snapshot(&path).unwrap();

        assert_eq!(loaded.meta.label, "Test string");
        assert_eq!(loaded.joints.len(), 2);
        assert_eq!(loaded.specifications.len(), tally.catalog().len());

        let restored = CasingTally::from_snapshot(loaded);
        assert_eq!(restored.summary(), tally.summary());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_atomic_save_creates_no_tmp_file() {
        let path = temp_snapshot_path("atomic");
        let tmp_path = path.with_extension(format!("{}.tmp", SNAPSHOT_EXTENSION));

        save_snapshot(&sample_tally().to_snapshot(), &path).unwrap();
        assert!(!tmp_path.exists());
        assert!(path.exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_snapshot(&temp_snapshot_path("does_not_exist")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_load_invalid_json() {
        let path = temp_snapshot_path("invalid_json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_snapshot(&path).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_newer_schema_rejected() {
        let path = temp_snapshot_path("newer_schema");
        let mut snapshot = sample_tally().to_snapshot();
        snapshot.meta.version = "0.9.0".to_string();
        save_snapshot(&snapshot, &path).unwrap();

        let err = load_snapshot(&path).unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.7").is_ok());
        assert!(validate_version("0.0.3").is_ok());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("garbage").is_err());
    }
}
