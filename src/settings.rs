use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SplitError};
use crate::reconciler::DEFAULT_BATCH_SIZE;
use crate::splitter::{SplitRules, DEFAULT_DELIMITER, DEFAULT_TRANSFER_MARKER};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_days_back")]
    pub days_back: i64,
    #[serde(default = "default_only_unapproved")]
    pub only_unapproved: bool,
    #[serde(default = "default_transfer_marker")]
    pub transfer_marker: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_days_back() -> i64 {
    30
}

fn default_only_unapproved() -> bool {
    true
}

fn default_transfer_marker() -> String {
    DEFAULT_TRANSFER_MARKER.to_string()
}

fn default_delimiter() -> String {
    DEFAULT_DELIMITER.to_string()
}

fn default_api_base_url() -> String {
    "https://api.ynab.com/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            days_back: default_days_back(),
            only_unapproved: default_only_unapproved(),
            transfer_marker: default_transfer_marker(),
            delimiter: default_delimiter(),
            api_base_url: default_api_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Settings {
    pub fn split_rules(&self) -> SplitRules {
        SplitRules {
            transfer_marker: self.transfer_marker.clone(),
            delimiter: self.delimiter.clone(),
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("ynab-split")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn load_settings() -> Settings {
    load_settings_from(&settings_path())
}

pub fn load_settings_from(path: &Path) -> Settings {
    if path.exists() {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<PathBuf> {
    let path = settings_path();
    save_settings_to(settings, &path)?;
    Ok(path)
}

pub fn save_settings_to(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| SplitError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            batch_size: 1,
            delimiter: " | ".to_string(),
            ..Settings::default()
        };
        save_settings_to(&settings, &path).unwrap();
        let loaded = load_settings_from(&path);
        assert_eq!(loaded.batch_size, 1);
        assert_eq!(loaded.delimiter, " | ");
        assert_eq!(loaded.transfer_marker, "Transfer : ");
    }

    #[test]
    fn test_load_returns_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let s = load_settings_from(&dir.path().join("nope.json"));
        assert_eq!(s.batch_size, 25);
        assert_eq!(s.days_back, 30);
        assert!(s.only_unapproved);
        assert_eq!(s.api_base_url, "https://api.ynab.com/v1");
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{"days_back": 7, "transfer_marker": "Overboeking: "}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.days_back, 7);
        assert_eq!(s.delimiter, " - ");
        assert_eq!(s.split_rules().transfer_marker, "Overboeking: ");
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(load_settings_from(&path).batch_size, 25);
    }

    #[test]
    fn test_save_creates_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep").join("nested").join("settings.json");
        save_settings_to(&Settings::default(), &path).unwrap();
        assert!(path.exists());
    }
}
