use crate::domain::sensor::SensorListItem;
use crate::AppState;
use std::sync::Arc;
use tauri::State;

/// Sensor catalog with current enablement.
#[tauri::command]
pub async fn get_sensor_list(
    state: State<'_, Arc<AppState>>,
) -> Result<Vec<SensorListItem>, String> {
    Ok(state.registry.list())
}

/// Flip one sensor; the change is persisted immediately and applies from
/// the next tick on.
#[tauri::command]
pub async fn toggle_sensor(
    state: State<'_, Arc<AppState>>,
    sensor_id: String,
    enabled: bool,
) -> Result<(), String> {
    state
        .registry
        .toggle(&sensor_id, enabled)
        .map_err(String::from)
}

/// Push all enabled periodic sensors right now, outside the schedule.
#[tauri::command]
pub async fn update_sensors_now(state: State<'_, Arc<AppState>>) -> Result<(), String> {
    let outcome = state.scheduler.push_now().await.map_err(String::from)?;
    log::info!(
        "Manual update pushed {} sensors ({} skipped)",
        outcome.pushed,
        outcome.skipped
    );
    Ok(())
}
