pub mod paths;
pub mod store;

pub use paths::{get_config_dir, get_settings_path};
pub use store::{AppConfig, ConfigStore, ConnectionSettings, SettingsPatch};
