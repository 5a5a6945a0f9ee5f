use crate::config::SettingsPatch;
use crate::AppState;
use std::sync::Arc;
use tauri::State;
use tauri_plugin_autostart::ManagerExt as _;

/// Enable launch-on-login and persist the preference.
#[tauri::command]
pub async fn enable_autostart(
    state: State<'_, Arc<AppState>>,
    app_handle: tauri::AppHandle,
) -> Result<(), String> {
    app_handle
        .autolaunch()
        .enable()
        .map_err(|e| e.to_string())?;
    state
        .config
        .save(SettingsPatch {
            autostart: Some(true),
            ..Default::default()
        })
        .map_err(String::from)
}

/// Disable launch-on-login and persist the preference.
#[tauri::command]
pub async fn disable_autostart(
    state: State<'_, Arc<AppState>>,
    app_handle: tauri::AppHandle,
) -> Result<(), String> {
    app_handle
        .autolaunch()
        .disable()
        .map_err(|e| e.to_string())?;
    state
        .config
        .save(SettingsPatch {
            autostart: Some(false),
            ..Default::default()
        })
        .map_err(String::from)
}

/// Whether launch-on-login is active in the OS launcher.
#[tauri::command]
pub async fn is_autostart_enabled(app_handle: tauri::AppHandle) -> Result<bool, String> {
    app_handle
        .autolaunch()
        .is_enabled()
        .map_err(|e| e.to_string())
}
