use crate::application::sensor_service::SensorRegistry;
use crate::config::ConfigStore;
use crate::domain::device::{DeviceMetadata, RegistrationState};
use crate::error::{AppError, Result};
use crate::infrastructure::hub::HubClient;
use crate::utils::helpers::redact_token;
use futures::future::join_all;
use std::sync::{Arc, RwLock};

/// Drives the registration state machine against the hub.
pub struct RegistrationService {
    config: Arc<ConfigStore>,
    hub: Arc<HubClient>,
    registry: Arc<SensorRegistry>,
    state: RwLock<RegistrationState>,
}

impl RegistrationService {
    pub fn new(
        config: Arc<ConfigStore>,
        hub: Arc<HubClient>,
        registry: Arc<SensorRegistry>,
    ) -> Self {
        let snapshot = config.get();
        let initial = if snapshot.identity.is_registered {
            RegistrationState::Registered
        } else {
            RegistrationState::Unconfigured
        };

        Self {
            config,
            hub,
            registry,
            state: RwLock::new(initial),
        }
    }

    pub fn state(&self) -> RegistrationState {
        *self.state.read().expect("registration lock poisoned")
    }

    fn set_state(&self, state: RegistrationState) {
        *self.state.write().expect("registration lock poisoned") = state;
    }

    /// Register this device with the hub.
    ///
    /// Idempotent: while already registered this refreshes the webhook and
    /// reuses the stored device id, it never mints a second one. On
    /// failure no partial identity is persisted.
    pub async fn register_device(&self) -> Result<String> {
        let config = self.config.get();
        if config.settings.server_url.is_empty() {
            return Err(AppError::validation("Server URL is not configured"));
        }
        if config.settings.access_token.is_empty() {
            return Err(AppError::validation("Access token is not configured"));
        }

        self.set_state(RegistrationState::Pending);
        log::info!(
            "Registering with {} (token={})",
            config.settings.server_url,
            redact_token(&config.settings.access_token)
        );

        // The id is minted here but only persisted once the hub accepted us
        let device_id = if config.identity.device_id.is_empty() {
            uuid::Uuid::new_v4().to_string()
        } else {
            config.identity.device_id.clone()
        };
        let metadata = DeviceMetadata::collect(device_id.clone());

        let webhook_id = match self.hub.register_device(&metadata).await {
            Ok(webhook_id) => webhook_id,
            Err(e) => {
                self.set_state(RegistrationState::Failed);
                log::error!("Registration failed: {}", e);
                return Err(e);
            }
        };

        if let Err(e) = self.config.record_registration(&device_id, &webhook_id) {
            self.set_state(RegistrationState::Failed);
            log::error!("Persisting registration failed: {}", e);
            return Err(e);
        }
        self.set_state(RegistrationState::Registered);
        log::info!("Device registered (device_id={})", device_id);

        // Announce the enabled sensors and push their first values. The
        // registration itself already succeeded; problems here only cost
        // the initial readings, the scheduler fills them in later.
        self.announce_enabled_sensors().await;

        Ok(webhook_id)
    }

    /// Announce every enabled sensor to the hub and push its current value.
    async fn announce_enabled_sensors(&self) {
        let readings = self.read_enabled(false);
        for reading in &readings {
            if let Err(e) = self.hub.announce_sensor(reading).await {
                log::warn!("Announcing sensor {} failed: {}", reading.id, e);
            }
        }
        if let Err(e) = self.hub.update_sensors(&readings).await {
            log::warn!("Initial sensor push failed: {}", e);
        }
    }

    /// Push the enabled static sensors once.
    ///
    /// Called at startup when the device is already registered; the
    /// scheduler never touches these on its ticks. Detecting a revoked
    /// webhook here drops the registration like a tick would.
    pub async fn push_static_sensors(&self) {
        let readings = self.read_enabled(true);
        let results = join_all(readings.iter().map(|r| self.hub.update_sensor(r))).await;

        for (reading, result) in readings.iter().zip(results) {
            match result {
                Ok(()) => {}
                Err(e) if e.is_webhook_revoked() => {
                    log::warn!("Hub revoked the webhook, re-registration required");
                    if let Err(e) = self.config.clear_registration() {
                        log::error!("Dropping registration failed: {}", e);
                    }
                    self.set_state(RegistrationState::Unconfigured);
                    return;
                }
                Err(e) => log::warn!("Static push failed for {}: {}", reading.id, e),
            }
        }
    }

    fn read_enabled(&self, static_only: bool) -> Vec<crate::domain::sensor::SensorReading> {
        let descriptors = if static_only {
            self.registry.enabled_static()
        } else {
            self.registry.enabled_all()
        };

        let source = self.registry.source();
        descriptors
            .iter()
            .filter_map(|descriptor| match source.read(&descriptor.id) {
                Ok(reading) => Some(reading),
                Err(e) => {
                    log::warn!("Skipping sensor {}: {}", descriptor.id, e);
                    None
                }
            })
            .collect()
    }
}
