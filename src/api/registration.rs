use crate::AppState;
use std::sync::Arc;
use tauri::State;

/// Register this device with the hub and start the update loop.
#[tauri::command]
pub async fn register_device(state: State<'_, Arc<AppState>>) -> Result<String, String> {
    let webhook_id = state
        .registration
        .register_device()
        .await
        .map_err(String::from)?;

    let device_id = state.config.get().identity.device_id;
    state.scheduler.start(&device_id).await;

    Ok(webhook_id)
}
