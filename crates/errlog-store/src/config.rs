//! Store settings, loaded from the hosting dashboard's option storage.
//!
//! The settings collaborator is modelled as a TOML file with serde
//! defaults; the two keys consumed by this core keep the names the
//! dashboard stores them under.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings consumed by the log store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Keep reading the log even when the interpreter reports error
    /// logging as disabled (the file may still hold older entries).
    #[serde(default)]
    pub keep_reading_error_log: bool,

    /// How many records to preserve when truncating the log.
    #[serde(default = "default_keep_records")]
    pub keep_error_log_records_truncate: usize,
}

fn default_keep_records() -> usize {
    20
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            keep_reading_error_log: false,
            keep_error_log_records_truncate: default_keep_records(),
        }
    }
}

impl StoreConfig {
    /// Load settings from a TOML file, falling back to defaults when the
    /// file is missing or malformed.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => {
                    log::info!("loaded store settings from {}", path.display());
                    config
                }
                Err(err) => {
                    log::warn!("failed to parse {}: {err}", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::debug!("no settings file at {}, using defaults", path.display());
                Self::default()
            }
        }
    }
}
