use crate::domain::Filter;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default number of seconds a notice stays on screen
pub const DEFAULT_NOTICE_SECS: u64 = 3;

fn default_notice_secs() -> u64 {
    DEFAULT_NOTICE_SECS
}

/// UI preferences stored in meta.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppMetadata {
    /// Filter that was active when the app last closed
    #[serde(default)]
    pub filter: Filter,
    #[serde(default = "default_notice_secs")]
    pub notice_secs: u64,
}

impl Default for AppMetadata {
    fn default() -> Self {
        Self {
            filter: Filter::All,
            notice_secs: DEFAULT_NOTICE_SECS,
        }
    }
}

/// Load app metadata from meta.json file
pub fn load_metadata<P: AsRef<Path>>(path: P) -> Result<AppMetadata> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(AppMetadata::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read metadata: {}", path.display()))?;
    let metadata: AppMetadata = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse metadata: {}", path.display()))?;
    Ok(metadata)
}

/// Save app metadata to meta.json file
pub fn save_metadata<P: AsRef<Path>>(path: P, metadata: &AppMetadata) -> Result<()> {
    let json = serde_json::to_string_pretty(metadata)?;
    crate::persistence::atomic_write(path, &json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_nonexistent_metadata() {
        let temp_dir = tempdir().unwrap();
        let meta_path = temp_dir.path().join("meta.json");

        let metadata = load_metadata(&meta_path).unwrap();
        assert_eq!(metadata, AppMetadata::default());
        assert_eq!(metadata.notice_secs, 3);
    }

    #[test]
    fn test_save_and_load_metadata() {
        let temp_dir = tempdir().unwrap();
        let meta_path = temp_dir.path().join("meta.json");

        let metadata = AppMetadata {
            filter: Filter::Urgent,
            notice_secs: 5,
        };
        save_metadata(&meta_path, &metadata).unwrap();

        let loaded = load_metadata(&meta_path).unwrap();
        assert_eq!(loaded, metadata);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let temp_dir = tempdir().unwrap();
        let meta_path = temp_dir.path().join("meta.json");
        std::fs::write(&meta_path, r#"{"filter":"overdue"}"#).unwrap();

        let loaded = load_metadata(&meta_path).unwrap();
        assert_eq!(loaded.filter, Filter::Overdue);
        assert_eq!(loaded.notice_secs, DEFAULT_NOTICE_SECS);
    }

    #[test]
    fn test_invalid_metadata_is_an_error() {
        let temp_dir = tempdir().unwrap();
        let meta_path = temp_dir.path().join("meta.json");
        std::fs::write(&meta_path, "not json").unwrap();

        assert!(load_metadata(&meta_path).is_err());
    }
}
