use crate::config::ConfigStore;
use crate::domain::device::DeviceMetadata;
use crate::domain::sensor::SensorReading;
use crate::error::{AppError, Result};
use crate::infrastructure::hub::payload::{RegistrationResponse, WebhookMessage};
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Duration;

/// HTTP client towards the hub.
///
/// Stateless besides the connection pool: every call reads a fresh
/// settings snapshot, so URL or token edits take effect without rebuilds.
pub struct HubClient {
    http: reqwest::Client,
    config: Arc<ConfigStore>,
}

impl HubClient {
    pub fn new(config: Arc<ConfigStore>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            // Local hubs commonly run on self-signed certificates
            .danger_accept_invalid_certs(true)
            .build()
            .unwrap_or_default();

        Self { http, config }
    }

    /// Register this device and return the webhook id the hub issued.
    pub async fn register_device(&self, metadata: &DeviceMetadata) -> Result<String> {
        let config = self.config.get();
        let url = format!("{}/api/hublink/registrations", config.settings.server_url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&config.settings.access_token)
            .json(metadata)
            .send()
            .await
            .map_err(|e| AppError::registration(format!("Cannot reach hub: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::registration(format!(
                "Registration failed ({}): {}",
                status, body
            )));
        }

        let parsed: RegistrationResponse = response
            .json()
            .await
            .map_err(|e| AppError::registration(format!("Invalid registration response: {}", e)))?;

        if !parsed.success {
            return Err(AppError::registration(format!(
                "Registration rejected: {}",
                parsed.error.unwrap_or_else(|| "unknown error".to_string())
            )));
        }

        parsed
            .webhook_id
            .ok_or_else(|| AppError::registration("Registration response missing webhook_id"))
    }

    /// Announce a sensor so the hub creates the matching entity.
    pub async fn announce_sensor(&self, reading: &SensorReading) -> Result<()> {
        let message = WebhookMessage::register_sensor(reading)
            .map_err(|e| AppError::push(format!("encode announcement failed: {}", e)))?;
        self.post_webhook(&message).await
    }

    /// Push the current state of one sensor.
    pub async fn update_sensor(&self, reading: &SensorReading) -> Result<()> {
        let message = WebhookMessage::update_sensor_states(std::slice::from_ref(reading))
            .map_err(|e| AppError::push(format!("encode update failed: {}", e)))?;
        self.post_webhook(&message).await
    }

    /// Push a batch of sensor states in one webhook call.
    pub async fn update_sensors(&self, readings: &[SensorReading]) -> Result<()> {
        if readings.is_empty() {
            return Ok(());
        }
        let message = WebhookMessage::update_sensor_states(readings)
            .map_err(|e| AppError::push(format!("encode update failed: {}", e)))?;
        self.post_webhook(&message).await
    }

    async fn post_webhook(&self, message: &WebhookMessage) -> Result<()> {
        let config = self.config.get();
        let webhook_id = config
            .identity
            .webhook_id
            .as_deref()
            .ok_or_else(|| AppError::push("no webhook registered"))?;
        let url = format!(
            "{}/api/webhook/{}",
            config.settings.server_url, webhook_id
        );

        let response = self
            .http
            .post(&url)
            .json(message)
            .send()
            .await
            .map_err(|e| AppError::push(format!("Cannot reach hub: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify_push_failure(status, &body))
    }
}

/// Only an explicit gone/not-found on the webhook endpoint means the hub
/// revoked the registration; everything else is transient.
fn classify_push_failure(status: StatusCode, body: &str) -> AppError {
    match status.as_u16() {
        404 | 410 => AppError::webhook_revoked(format!("hub reports webhook gone ({})", status)),
        _ => AppError::push(format!("hub returned {}: {}", status, body)),
    }
}
