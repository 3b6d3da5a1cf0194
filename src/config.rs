use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::RwLock,
    time::Duration,
};
use uuid::Uuid;

use crate::detector::{DetectorConfig, DetectorError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderMessage {
    pub id: String,
    pub text: String,
}

impl ReminderMessage {
    pub fn new(text: impl Into<String>) -> Self {
        let uuid = Uuid::new_v4().simple().to_string();
        Self {
            id: format!("r_{}", &uuid[..10]),
            text: text.into(),
        }
    }
}

/// User-facing settings: reminder list plus the detector tuning knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub reminders: Vec<ReminderMessage>,
    pub sound_enabled: bool,
    pub active_threshold: f32,
    pub inactive_threshold: f32,
    pub inactive_hold_secs: u64,
    pub sample_interval_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            reminders: vec![
                ReminderMessage::new("Drink water"),
                ReminderMessage::new("Stretch for 2 minutes"),
            ],
            sound_enabled: true,
            active_threshold: 80.0,
            inactive_threshold: 35.0,
            inactive_hold_secs: 10,
            sample_interval_ms: 1000,
        }
    }
}

impl AppConfig {
    /// Convert to a validated detector configuration.
    pub fn detector_config(&self) -> Result<DetectorConfig, DetectorError> {
        DetectorConfig::new(
            self.active_threshold,
            self.inactive_threshold,
            Duration::from_secs(self.inactive_hold_secs),
            Duration::from_millis(self.sample_interval_ms),
        )
    }
}

pub struct ConfigStore {
    path: PathBuf,
    data: RwLock<AppConfig>,
}

impl ConfigStore {
    /// Load from `path`, or write the defaults there so the user has a file
    /// to edit. A file that fails to parse falls back to defaults.
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            let defaults = AppConfig::default();
            Self::write(&path, &defaults)?;
            defaults
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn get(&self) -> AppConfig {
        self.data.read().unwrap().clone()
    }

    pub fn update(&self, config: AppConfig) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        *guard = config;
        Self::write(&self.path, &guard)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(path: &Path, data: &AppConfig) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(path, serialized)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config_path() -> PathBuf {
        std::env::temp_dir().join(format!("gamewatch-test-{}.json", Uuid::new_v4().simple()))
    }

    #[test]
    fn missing_file_gets_defaults_written() {
        let path = temp_config_path();

        let store = ConfigStore::new(path.clone()).unwrap();

        assert!(path.exists());
        let config = store.get();
        assert_eq!(config.reminders.len(), 2);
        assert_eq!(config.active_threshold, 80.0);
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn update_round_trips_through_the_file() {
        let path = temp_config_path();
        let store = ConfigStore::new(path.clone()).unwrap();

        let mut config = store.get();
        config.sound_enabled = false;
        config.inactive_hold_secs = 30;
        store.update(config).unwrap();

        let reloaded = ConfigStore::new(path.clone()).unwrap();
        assert!(!reloaded.get().sound_enabled);
        assert_eq!(reloaded.get().inactive_hold_secs, 30);
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn unparseable_file_falls_back_to_defaults() {
        let path = temp_config_path();
        fs::write(&path, "{not json").unwrap();

        let store = ConfigStore::new(path.clone()).unwrap();

        assert_eq!(store.get().sample_interval_ms, 1000);
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn detector_config_conversion_validates() {
        let mut config = AppConfig::default();
        assert!(config.detector_config().is_ok());

        config.inactive_threshold = 90.0;
        assert!(config.detector_config().is_err());
    }

    #[test]
    fn reminder_ids_have_the_expected_shape() {
        let reminder = ReminderMessage::new("Drink water");
        assert!(reminder.id.starts_with("r_"));
        assert_eq!(reminder.id.len(), 12);
    }
}
