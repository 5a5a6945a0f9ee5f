use crate::config::ConfigStore;
use crate::domain::sensor::{SensorDescriptor, SensorListItem};
use crate::error::{AppError, Result};
use crate::interface::SensorSource;
use std::sync::Arc;

/// Catalog of known sensors merged with the persisted enablement map.
///
/// The catalog itself comes from the metric collaborator; enablement is
/// owned here and persists through the config store. Sensors the store has
/// never seen default to enabled.
pub struct SensorRegistry {
    source: Arc<dyn SensorSource>,
    config: Arc<ConfigStore>,
}

impl SensorRegistry {
    pub fn new(source: Arc<dyn SensorSource>, config: Arc<ConfigStore>) -> Self {
        Self { source, config }
    }

    /// Catalog in source order, with the current enabled flags.
    pub fn list(&self) -> Vec<SensorListItem> {
        let config = self.config.get();
        self.source
            .catalog()
            .into_iter()
            .map(|descriptor| SensorListItem {
                enabled: config.sensor_enabled(&descriptor.id),
                id: descriptor.id,
                name: descriptor.name,
                updates_at_interval: descriptor.updates_at_interval,
            })
            .collect()
    }

    /// Flip a sensor on or off. Persists immediately; the change takes
    /// effect on the next scheduler tick, already pushed values are not
    /// retracted.
    pub fn toggle(&self, sensor_id: &str, enabled: bool) -> Result<()> {
        let known = self
            .source
            .catalog()
            .iter()
            .any(|descriptor| descriptor.id == sensor_id);
        if !known {
            return Err(AppError::not_found(format!("unknown sensor: {}", sensor_id)));
        }

        self.config.set_sensor_enabled(sensor_id, enabled)?;
        log::info!(
            "Sensor {} {}",
            sensor_id,
            if enabled { "enabled" } else { "disabled" }
        );
        Ok(())
    }

    /// Enabled periodic sensors, the per-tick push set.
    pub fn enabled_periodic(&self) -> Vec<SensorDescriptor> {
        self.enabled_matching(true)
    }

    /// Enabled static sensors, pushed once per registration/startup cycle.
    pub fn enabled_static(&self) -> Vec<SensorDescriptor> {
        self.enabled_matching(false)
    }

    /// All enabled sensors regardless of kind.
    pub fn enabled_all(&self) -> Vec<SensorDescriptor> {
        let config = self.config.get();
        self.source
            .catalog()
            .into_iter()
            .filter(|descriptor| config.sensor_enabled(&descriptor.id))
            .collect()
    }

    pub fn source(&self) -> &Arc<dyn SensorSource> {
        &self.source
    }

    fn enabled_matching(&self, periodic: bool) -> Vec<SensorDescriptor> {
        let config = self.config.get();
        self.source
            .catalog()
            .into_iter()
            .filter(|descriptor| {
                descriptor.updates_at_interval == periodic && config.sensor_enabled(&descriptor.id)
            })
            .collect()
    }
}
