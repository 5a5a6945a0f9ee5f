use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Descriptor of one sensor in the catalog.
///
/// The catalog itself is fixed by the metric collaborator; enablement is
/// owned by the registry and persisted in the settings record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorDescriptor {
    pub id: String,
    pub name: String,
    /// true for periodic metrics (CPU usage), false for static facts
    /// (OS version) captured once per registration/startup cycle.
    pub updates_at_interval: bool,
}

impl SensorDescriptor {
    pub fn periodic(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            updates_at_interval: true,
        }
    }

    pub fn fixed(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            updates_at_interval: false,
        }
    }
}

/// One sensor reading formatted for the hub.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorReading {
    pub id: String,
    pub name: String,
    pub state: serde_json::Value,
    pub unit_of_measurement: Option<String>,
    pub device_class: Option<String>,
    pub state_class: Option<String>,
    pub icon: Option<String>,
    #[serde(default)]
    pub attributes: HashMap<String, serde_json::Value>,
    pub updates_at_interval: bool,
}

/// Entry of the sensor list shown in the settings view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorListItem {
    pub id: String,
    pub name: String,
    pub enabled: bool,
    pub updates_at_interval: bool,
}
