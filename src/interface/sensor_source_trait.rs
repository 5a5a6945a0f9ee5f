use crate::domain::sensor::{SensorDescriptor, SensorReading};
use crate::error::Result;

/// External capability that owns the raw metric collection.
///
/// The core never reads CPU counters itself; it asks the source for the
/// catalog and for current values. Reads are per sensor so a failing
/// sensor cannot take the rest of a tick down with it.
pub trait SensorSource: Send + Sync {
    /// The fixed, ordered catalog of sensors this source provides.
    fn catalog(&self) -> Vec<SensorDescriptor>;

    /// Current reading of one sensor, formatted for the hub.
    fn read(&self, sensor_id: &str) -> Result<SensorReading>;
}
