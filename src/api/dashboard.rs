use crate::AppState;
use std::sync::Arc;
use tauri::State;

/// Run the session bootstrap and show the hub dashboard.
#[tauri::command]
pub async fn load_dashboard(state: State<'_, Arc<AppState>>) -> Result<(), String> {
    state.dashboard.load().await.map_err(String::from)
}

/// Close the dashboard view (e.g. when the settings view takes over).
#[tauri::command]
pub async fn hide_dashboard(state: State<'_, Arc<AppState>>) -> Result<(), String> {
    state.dashboard.close();
    Ok(())
}
