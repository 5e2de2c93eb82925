//! Notification preference store
//!
//! One boolean, persisted as JSON in local storage, independent of
//! session state. Read once at startup, written only on explicit toggle.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PrefsFile {
    #[serde(default = "default_enabled")]
    enabled: bool,
}

impl Default for PrefsFile {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// File-backed notification preference
#[derive(Debug)]
pub struct NotificationPrefs {
    /// Preference file path: {data_dir}/notification.json
    file_path: PathBuf,
    data: PrefsFile,
}

impl NotificationPrefs {
    /// Load from the data directory; a missing file means enabled
    pub fn load(data_dir: &Path) -> Result<Self, PrefsError> {
        let file_path = data_dir.join("notification.json");

        let data = if file_path.exists() {
            let content = std::fs::read_to_string(&file_path)?;
            serde_json::from_str(&content)?
        } else {
            PrefsFile::default()
        };

        Ok(Self { file_path, data })
    }

    pub fn enabled(&self) -> bool {
        self.data.enabled
    }

    /// Persist a new value; called on explicit toggle only
    pub fn set_enabled(&mut self, enabled: bool) -> Result<(), PrefsError> {
        self.data.enabled = enabled;
        self.save()
    }

    fn save(&self) -> Result<(), PrefsError> {
        if let Some(parent) = self.file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.data)?;
        std::fs::write(&self.file_path, content)?;

        tracing::debug!(enabled = self.data.enabled, "Notification preference saved");
        Ok(())
    }
}
