use crate::application::sensor_service::SensorRegistry;
use crate::config::ConfigStore;
use crate::error::{AppError, Result};
use crate::infrastructure::hub::HubClient;
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::AbortHandle;
use tokio::time::{sleep, Duration};

/// Result of one scheduler tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickOutcome {
    pub pushed: usize,
    pub skipped: usize,
    pub revoked: bool,
}

/// Periodic sensor push loop.
///
/// One cancellable task per device id; starting a loop aborts any
/// existing one for the same device, so an interval change reschedules
/// the next tick without leaking a duplicate timer. The tick awaits all
/// of its pushes, so pushes for one sensor never overlap across ticks.
pub struct UpdateScheduler {
    config: Arc<ConfigStore>,
    hub: Arc<HubClient>,
    registry: Arc<SensorRegistry>,
    tasks: Mutex<HashMap<String, AbortHandle>>,
}

impl UpdateScheduler {
    pub fn new(
        config: Arc<ConfigStore>,
        hub: Arc<HubClient>,
        registry: Arc<SensorRegistry>,
    ) -> Self {
        Self {
            config,
            hub,
            registry,
            tasks: Mutex::new(HashMap::new()),
        }
    }

    /// Start (or restart) the update loop for a device.
    pub async fn start(self: &Arc<Self>, device_id: &str) {
        let mut tasks = self.tasks.lock().await;
        if let Some(existing) = tasks.remove(device_id) {
            existing.abort();
        }

        let scheduler = Arc::clone(self);
        let key = device_id.to_string();
        let handle = tokio::spawn(async move {
            scheduler.run_loop(key).await;
        });

        tasks.insert(device_id.to_string(), handle.abort_handle());
        log::debug!("Update loop started for device {}", device_id);
    }

    /// Cancel the update loop for a device, if any.
    pub async fn stop(&self, device_id: &str) {
        let mut tasks = self.tasks.lock().await;
        if let Some(handle) = tasks.remove(device_id) {
            handle.abort();
            log::debug!("Update loop stopped for device {}", device_id);
        }
    }

    pub async fn is_running(&self, device_id: &str) -> bool {
        self.tasks.lock().await.contains_key(device_id)
    }

    async fn run_loop(self: Arc<Self>, device_id: String) {
        loop {
            // Re-read the interval every round so a changed setting takes
            // effect on the tick after the running one.
            let interval = self.config.get().settings.update_interval.max(1);
            sleep(Duration::from_secs(interval)).await;

            if !self.config.get().identity.is_registered {
                break;
            }

            let outcome = self.tick().await;
            if outcome.revoked {
                log::warn!("Hub revoked the webhook, stopping updates until re-registration");
                if let Err(e) = self.config.clear_registration() {
                    log::error!("Dropping registration failed: {}", e);
                }
                break;
            }
        }

        self.tasks.lock().await.remove(&device_id);
    }

    /// Read and push every enabled periodic sensor once.
    ///
    /// A failing sensor is logged and skipped; the remaining sensors of
    /// the tick still push. Pushes run concurrently since sensors are
    /// independent of each other.
    pub async fn tick(&self) -> TickOutcome {
        let descriptors = self.registry.enabled_periodic();
        let source = self.registry.source();

        let mut outcome = TickOutcome::default();
        let mut readings = Vec::with_capacity(descriptors.len());
        for descriptor in &descriptors {
            match source.read(&descriptor.id) {
                Ok(reading) => readings.push(reading),
                Err(e) => {
                    outcome.skipped += 1;
                    log::warn!("Skipping sensor {}: {}", descriptor.id, e);
                }
            }
        }

        let results = join_all(readings.iter().map(|r| self.hub.update_sensor(r))).await;
        for (reading, result) in readings.iter().zip(results) {
            match result {
                Ok(()) => outcome.pushed += 1,
                Err(e) if e.is_webhook_revoked() => {
                    outcome.revoked = true;
                    log::warn!("Push for {} rejected: {}", reading.id, e);
                }
                Err(e) => {
                    outcome.skipped += 1;
                    log::warn!("Push failed for {}: {}", reading.id, e);
                }
            }
        }

        log::debug!(
            "Tick pushed {} sensors ({} skipped)",
            outcome.pushed,
            outcome.skipped
        );
        outcome
    }

    /// Immediate manual push outside the schedule.
    pub async fn push_now(&self) -> Result<TickOutcome> {
        let config = self.config.get();
        if !config.identity.is_registered {
            return Err(AppError::validation("device is not registered"));
        }

        let outcome = self.tick().await;
        if outcome.revoked {
            self.config.clear_registration()?;
            self.stop(&config.identity.device_id).await;
        }
        Ok(outcome)
    }
}
