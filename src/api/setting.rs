use crate::config::SettingsPatch;
use crate::domain::device::Language;
use crate::error::AppError;
use crate::AppState;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tauri::State;
use tauri_plugin_autostart::ManagerExt as _;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsResponse {
    pub server_url: String,
    pub access_token: String,
    pub device_id: String,
    pub webhook_id: Option<String>,
    pub update_interval: u64,
    pub language: String,
    pub autostart: bool,
    pub enabled_sensors: HashMap<String, bool>,
    pub is_registered: bool,
}

/// Current settings snapshot for the settings view.
#[tauri::command]
pub async fn get_settings(state: State<'_, Arc<AppState>>) -> Result<SettingsResponse, String> {
    let config = state.config.get();

    Ok(SettingsResponse {
        server_url: config.settings.server_url,
        access_token: config.settings.access_token,
        device_id: config.identity.device_id,
        webhook_id: config.identity.webhook_id,
        update_interval: config.settings.update_interval,
        language: config.settings.language.to_string(),
        autostart: config.settings.autostart,
        enabled_sensors: config.enabled_sensors,
        is_registered: config.identity.is_registered,
    })
}

/// Save settings and react to what changed: a new URL or token drops the
/// registration so the UI re-registers, a new interval reschedules the
/// running update loop.
#[tauri::command]
pub async fn save_settings(
    state: State<'_, Arc<AppState>>,
    app: tauri::AppHandle,
    server_url: String,
    access_token: String,
    update_interval: u64,
    language: String,
    autostart: bool,
) -> Result<(), String> {
    let language: Language = language
        .parse()
        .map_err(|_| AppError::validation(format!("unsupported language: {}", language)))?;

    let before = state.config.get();
    state
        .config
        .save(SettingsPatch {
            server_url: Some(server_url),
            access_token: Some(access_token),
            update_interval: Some(update_interval),
            language: Some(language),
            autostart: Some(autostart),
        })
        .map_err(String::from)?;

    // Keep the OS launcher in sync with the stored preference
    let autolaunch = app.autolaunch();
    let _ = if autostart {
        autolaunch.enable()
    } else {
        autolaunch.disable()
    };

    let after = state.config.get();
    let connection_changed = before.settings.server_url != after.settings.server_url
        || before.settings.access_token != after.settings.access_token;

    if connection_changed && after.identity.webhook_id.is_some() {
        log::info!("Hub connection changed, dropping registration");
        state.config.clear_registration().map_err(String::from)?;
        state.scheduler.stop(&after.identity.device_id).await;
    } else if after.identity.is_registered
        && before.settings.update_interval != after.settings.update_interval
    {
        // Restarting the loop makes the next tick honor the new period
        // without firing immediately
        state.scheduler.start(&after.identity.device_id).await;
    }

    Ok(())
}

/// Current UI language.
#[tauri::command]
pub async fn get_current_language(state: State<'_, Arc<AppState>>) -> Result<String, String> {
    Ok(state.config.get().settings.language.to_string())
}
