//! Application configuration
//!
//! Read from the environment (after `.env` is loaded by the binary):
//!
//! | variable                   | default                 |
//! |----------------------------|-------------------------|
//! | `AGROLINK_API_URL`         | `http://localhost:8080` |
//! | `AGROLINK_CENTER_ID`       | `main`                  |
//! | `AGROLINK_POLL_SECS`       | `15`                    |
//! | `AGROLINK_SHELF_TYPE`      | unset (all types)       |
//! | `AGROLINK_VIEWPORT_CONFIG` | unset (built-in tuning) |
//!
//! `AGROLINK_VIEWPORT_CONFIG` names a JSON file with `ViewportConfig` fields;
//! missing fields keep their defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use agrolink_types::ShelfType;
use thiserror::Error;
use warehouse_board::ViewportConfig;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_CENTER_ID: &str = "main";
pub const DEFAULT_POLL_SECS: u64 = 15;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("AGROLINK_POLL_SECS must be a positive integer, got {0:?}")]
    InvalidPollInterval(String),

    #[error("AGROLINK_SHELF_TYPE: {0}")]
    InvalidShelfType(String),

    #[error("AGROLINK_CENTER_ID must not be empty")]
    EmptyCenterId,

    #[error("failed to read viewport config {path}: {source}")]
    ViewportFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid viewport config {path}: {source}")]
    ViewportJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_url: String,
    pub center_id: String,
    pub poll_interval: Duration,
    pub shelf_type: Option<ShelfType>,
    pub viewport: ViewportConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            center_id: DEFAULT_CENTER_ID.to_string(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_SECS),
            shelf_type: None,
            viewport: ViewportConfig::default(),
        }
    }
}

impl AppConfig {
    /// Create from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::default();

        if let Some(url) = get("AGROLINK_API_URL") {
            config.api_url = url;
        }
        if let Some(center) = lookup("AGROLINK_CENTER_ID") {
            let center = center.trim();
            if center.is_empty() {
                return Err(ConfigError::EmptyCenterId);
            }
            config.center_id = center.to_string();
        }
        if let Some(secs) = get("AGROLINK_POLL_SECS") {
            let parsed = secs
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or(ConfigError::InvalidPollInterval(secs))?;
            config.poll_interval = Duration::from_secs(parsed);
        }
        if let Some(shelf_type) = get("AGROLINK_SHELF_TYPE") {
            config.shelf_type = Some(
                shelf_type
                    .parse::<ShelfType>()
                    .map_err(ConfigError::InvalidShelfType)?,
            );
        }
        if let Some(path) = get("AGROLINK_VIEWPORT_CONFIG") {
            config.viewport = load_viewport_config(Path::new(&path))?;
        }

        Ok(config)
    }
}

/// Read viewport tunables from a JSON file.
pub fn load_viewport_config(path: &Path) -> Result<ViewportConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ViewportFile {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ConfigError::ViewportJson {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("AGROLINK_API_URL", "https://api.example.test"),
            ("AGROLINK_CENTER_ID", " north "),
            ("AGROLINK_POLL_SECS", "30"),
            ("AGROLINK_SHELF_TYPE", "picker"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "https://api.example.test");
        assert_eq!(config.center_id, "north");
        assert_eq!(config.poll_interval, Duration::from_secs(30));
        assert_eq!(config.shelf_type, Some(ShelfType::Picker));
    }

    #[test]
    fn rejects_bad_values() {
        let err = AppConfig::from_lookup(lookup(&[("AGROLINK_POLL_SECS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPollInterval(_)));

        let err = AppConfig::from_lookup(lookup(&[("AGROLINK_SHELF_TYPE", "forklift")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidShelfType(_)));

        let err = AppConfig::from_lookup(lookup(&[("AGROLINK_CENTER_ID", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyCenterId));
    }

    #[test]
    fn viewport_file_merges_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "maxScale": 5.0, "zoomStep": 1.5 }}"#).unwrap();

        let config = load_viewport_config(file.path()).unwrap();
        assert_eq!(config.max_scale, 5.0);
        assert_eq!(config.zoom_step, 1.5);
        assert_eq!(config.min_scale, ViewportConfig::default().min_scale);
    }

    #[test]
    fn viewport_file_errors_are_typed() {
        let err = load_viewport_config(Path::new("/nonexistent/viewport.json")).unwrap_err();
        assert!(matches!(err, ConfigError::ViewportFile { .. }));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = load_viewport_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ViewportJson { .. }));
    }
}
