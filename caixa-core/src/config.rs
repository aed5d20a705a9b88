//! Configuration handling for settings.json in the data directory.
//!
//! Loading is tolerant: a missing or unreadable file yields the defaults.
//! Saving keeps any fields we do not manage, so hand-edited settings
//! survive a round trip.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::AGENCY;

pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Branch code printed on opened accounts.
    #[serde(default = "default_agency")]
    pub agency: String,

    /// How many backups to keep; `None` keeps everything.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_backups: Option<usize>,

    /// Fields we do not manage, preserved verbatim on save.
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

fn default_agency() -> String {
    AGENCY.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            agency: default_agency(),
            max_backups: None,
            other: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn path(data_dir: &Path) -> PathBuf {
        data_dir.join(SETTINGS_FILE)
    }

    pub fn load(data_dir: &Path) -> Self {
        let path = Self::path(data_dir);
        fs::read_to_string(&path)
            .ok()
            .and_then(|contents| serde_json::from_str(&contents).ok())
            .unwrap_or_default()
    }

    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let path = Self::path(data_dir);
        let contents =
            serde_json::to_string_pretty(self).context("failed to serialize settings")?;
        fs::write(&path, contents)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load(dir.path());
        assert_eq!(config.agency, AGENCY);
        assert!(config.max_backups.is_none());
    }

    #[test]
    fn test_invalid_json_yields_defaults() {
        let dir = tempdir().unwrap();
        fs::write(Config::path(dir.path()), "not json").unwrap();
        let config = Config::load(dir.path());
        assert_eq!(config.agency, AGENCY);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let mut config = Config::default();
        config.agency = "0042".to_string();
        config.max_backups = Some(5);
        config.save(dir.path()).unwrap();

        let loaded = Config::load(dir.path());
        assert_eq!(loaded.agency, "0042");
        assert_eq!(loaded.max_backups, Some(5));
    }

    #[test]
    fn test_unmanaged_fields_survive_round_trip() {
        let dir = tempdir().unwrap();
        fs::write(
            Config::path(dir.path()),
            r#"{"agency": "0001", "theme": "dark"}"#,
        )
        .unwrap();

        let mut config = Config::load(dir.path());
        config.max_backups = Some(3);
        config.save(dir.path()).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(Config::path(dir.path())).unwrap()).unwrap();
        assert_eq!(raw["theme"], "dark");
        assert_eq!(raw["maxBackups"], 3);
    }
}
