//! Wire types of the hub's registration and webhook endpoints.

use crate::domain::sensor::SensorReading;
use serde::{Deserialize, Serialize};

/// Response of the device-registration endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationResponse {
    pub success: bool,
    pub webhook_id: Option<String>,
    pub error: Option<String>,
}

/// Envelope of every webhook message: a type tag plus a payload.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookMessage {
    #[serde(rename = "type")]
    pub message_type: String,
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
struct SensorAnnouncement<'a> {
    sensor_unique_id: &'a str,
    sensor_name: &'a str,
    sensor_state: &'a serde_json::Value,
    sensor_device_class: Option<&'a str>,
    sensor_unit_of_measurement: Option<&'a str>,
    sensor_state_class: Option<&'a str>,
    sensor_icon: Option<&'a str>,
}

#[derive(Debug, Clone, Serialize)]
struct SensorStateUpdate<'a> {
    sensor_unique_id: &'a str,
    sensor_state: &'a serde_json::Value,
    sensor_attributes: serde_json::Value,
    sensor_icon: Option<&'a str>,
}

impl WebhookMessage {
    /// Announce a sensor to the hub so it creates the matching entity.
    pub fn register_sensor(reading: &SensorReading) -> serde_json::Result<Self> {
        let data = serde_json::to_value(SensorAnnouncement {
            sensor_unique_id: &reading.id,
            sensor_name: &reading.name,
            sensor_state: &reading.state,
            sensor_device_class: reading.device_class.as_deref(),
            sensor_unit_of_measurement: reading.unit_of_measurement.as_deref(),
            sensor_state_class: reading.state_class.as_deref(),
            sensor_icon: reading.icon.as_deref(),
        })?;
        Ok(Self {
            message_type: "register_sensor".to_string(),
            data,
        })
    }

    /// Push current state for a batch of sensors.
    pub fn update_sensor_states(readings: &[SensorReading]) -> serde_json::Result<Self> {
        let updates: Vec<serde_json::Value> = readings
            .iter()
            .map(|reading| {
                serde_json::to_value(SensorStateUpdate {
                    sensor_unique_id: &reading.id,
                    sensor_state: &reading.state,
                    sensor_attributes: serde_json::to_value(&reading.attributes)
                        .unwrap_or_default(),
                    sensor_icon: reading.icon.as_deref(),
                })
            })
            .collect::<serde_json::Result<_>>()?;

        Ok(Self {
            message_type: "update_sensor_states".to_string(),
            data: serde_json::json!({ "sensors": updates }),
        })
    }
}
