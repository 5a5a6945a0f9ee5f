use crate::domain::device::{DeviceIdentity, Language};
use crate::error::{AppError, Result};
use crate::utils::helpers::{normalize_server_url, redact_token};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

fn default_update_interval() -> u64 {
    60
}

/// Connection and preference state, persisted as part of [`AppConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionSettings {
    #[serde(default)]
    pub server_url: String,
    #[serde(default)]
    pub access_token: String,
    /// Sensor push period in seconds, >= 1.
    #[serde(default = "default_update_interval")]
    pub update_interval: u64,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub autostart: bool,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            server_url: String::new(),
            access_token: String::new(),
            update_interval: default_update_interval(),
            language: Language::default(),
            autostart: false,
        }
    }
}

impl ConnectionSettings {
    /// Both fields the registration protocol requires are present.
    pub fn is_configured(&self) -> bool {
        !self.server_url.is_empty() && !self.access_token.is_empty()
    }
}

/// The single persisted record: connection settings, device identity and
/// the sensor enablement map. Rewritten wholesale on every save.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub settings: ConnectionSettings,
    #[serde(default)]
    pub identity: DeviceIdentity,
    #[serde(default)]
    pub enabled_sensors: HashMap<String, bool>,
}

impl AppConfig {
    pub fn sensor_enabled(&self, sensor_id: &str) -> bool {
        // Unknown sensors default to enabled
        *self.enabled_sensors.get(sensor_id).unwrap_or(&true)
    }
}

/// Partial settings update; only the provided fields are applied.
#[derive(Debug, Clone, Default)]
pub struct SettingsPatch {
    pub server_url: Option<String>,
    pub access_token: Option<String>,
    pub update_interval: Option<u64>,
    pub language: Option<Language>,
    pub autostart: Option<bool>,
}

/// Owned store around the persisted record.
///
/// All mutations take the write lock, apply to the in-memory record and
/// rewrite the file atomically before releasing it, so saves serialize and
/// a concurrent `get` observes either the pre- or post-save state.
pub struct ConfigStore {
    path: PathBuf,
    state: RwLock<AppConfig>,
}

impl ConfigStore {
    /// Load the record from disk.
    ///
    /// A missing file is a first run; an unreadable or corrupt file degrades
    /// to defaults with a warning instead of failing startup.
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => crate::config::paths::get_settings_path()?,
        };

        let config = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<AppConfig>(&raw) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!(
                        "Settings record at {:?} is corrupt ({}), treating as first run",
                        path,
                        e
                    );
                    AppConfig::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => AppConfig::default(),
            Err(e) => {
                log::warn!(
                    "Settings record at {:?} is unreadable ({}), treating as first run",
                    path,
                    e
                );
                AppConfig::default()
            }
        };

        Ok(Self {
            path,
            state: RwLock::new(config),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Consistent snapshot of the record. Callers that need fresh data
    /// after a save call this again; handed-out snapshots are never
    /// mutated in place.
    pub fn get(&self) -> AppConfig {
        self.state.read().expect("config lock poisoned").clone()
    }

    /// Apply a partial settings update and persist the whole record.
    pub fn save(&self, patch: SettingsPatch) -> Result<()> {
        if let Some(interval) = patch.update_interval {
            if interval < 1 {
                return Err(AppError::validation(
                    "update interval must be at least 1 second",
                ));
            }
        }

        let mut state = self.state.write().expect("config lock poisoned");
        if let Some(url) = patch.server_url {
            state.settings.server_url = normalize_server_url(&url);
        }
        if let Some(token) = patch.access_token {
            state.settings.access_token = token.trim().to_string();
        }
        if let Some(interval) = patch.update_interval {
            state.settings.update_interval = interval;
        }
        if let Some(language) = patch.language {
            state.settings.language = language;
        }
        if let Some(autostart) = patch.autostart {
            state.settings.autostart = autostart;
        }

        self.persist(&state)?;
        log::debug!(
            "Settings saved (server={}, token={})",
            state.settings.server_url,
            redact_token(&state.settings.access_token)
        );
        Ok(())
    }

    /// Persist a successful registration in one write.
    ///
    /// `device_id` is only ever written here; once set it survives every
    /// later re-registration.
    pub fn record_registration(&self, device_id: &str, webhook_id: &str) -> Result<()> {
        let mut state = self.state.write().expect("config lock poisoned");
        if state.identity.device_id.is_empty() {
            state.identity.device_id = device_id.to_string();
        }
        state.identity.webhook_id = Some(webhook_id.to_string());
        state.identity.is_registered = true;
        self.persist(&state)
    }

    /// Drop the registration: the hub revoked the webhook or the user
    /// changed the connection settings. The device id is kept.
    pub fn clear_registration(&self) -> Result<()> {
        let mut state = self.state.write().expect("config lock poisoned");
        state.identity.webhook_id = None;
        state.identity.is_registered = false;
        self.persist(&state)
    }

    pub fn set_sensor_enabled(&self, sensor_id: &str, enabled: bool) -> Result<()> {
        let mut state = self.state.write().expect("config lock poisoned");
        state.enabled_sensors.insert(sensor_id.to_string(), enabled);
        self.persist(&state)
    }

    /// Write the record atomically: serialize to a temp file next to the
    /// target, then rename over it. A reader sees the old or the new
    /// record, never a torn write.
    fn persist(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::storage(format!("create settings dir failed: {}", e)))?;
        }

        let raw = serde_json::to_string_pretty(config)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, raw)
            .map_err(|e| AppError::storage(format!("write settings failed: {}", e)))?;
        fs::rename(&tmp_path, &self.path)
            .map_err(|e| AppError::storage(format!("replace settings failed: {}", e)))?;
        Ok(())
    }
}
