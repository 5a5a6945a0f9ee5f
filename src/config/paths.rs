use crate::utils::env::is_development;
use anyhow::Result;
use std::env;
use std::path::PathBuf;

/// Config directory of the app.
///
/// Development and production use separate directories so that test data
/// never mixes with a real hub connection.
pub fn get_config_dir() -> Result<PathBuf> {
    let base_dir =
        dirs::config_dir().ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;

    let config_dir = if is_development() {
        base_dir.join("hublink-dev")
    } else {
        base_dir.join("hublink")
    };

    Ok(config_dir)
}

/// Path of the persisted settings record.
///
/// The HUBLINK_SETTINGS_PATH environment variable overrides the default
/// location, which tests and portable installs rely on.
pub fn get_settings_path() -> Result<PathBuf> {
    if let Ok(path) = env::var("HUBLINK_SETTINGS_PATH") {
        return Ok(PathBuf::from(path));
    }

    let config_dir = get_config_dir()?;
    Ok(config_dir.join("settings.json"))
}
