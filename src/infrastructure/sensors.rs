//! System metric source backed by sysinfo.
//!
//! The catalog is fixed: periodic metrics refresh on every read, static
//! facts are captured from the OS once per call and pushed once per
//! registration/startup cycle by the scheduler.

use crate::domain::sensor::{SensorDescriptor, SensorReading};
use crate::error::{AppError, Result};
use crate::interface::SensorSource;
use std::collections::HashMap;
use std::sync::Mutex;
use sysinfo::{Disks, System};

const GIB: f64 = 1_073_741_824.0;

pub struct SystemSensorSource {
    sys: Mutex<System>,
}

impl SystemSensorSource {
    pub fn new() -> Self {
        Self {
            sys: Mutex::new(System::new_all()),
        }
    }

    fn reading(
        id: &str,
        name: &str,
        state: serde_json::Value,
        unit: Option<&str>,
        device_class: Option<&str>,
        icon: &str,
        periodic: bool,
    ) -> SensorReading {
        SensorReading {
            id: id.to_string(),
            name: name.to_string(),
            state,
            unit_of_measurement: unit.map(str::to_string),
            device_class: device_class.map(str::to_string),
            state_class: periodic.then(|| "measurement".to_string()),
            icon: Some(icon.to_string()),
            attributes: HashMap::new(),
            updates_at_interval: periodic,
        }
    }
}

impl Default for SystemSensorSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorSource for SystemSensorSource {
    fn catalog(&self) -> Vec<SensorDescriptor> {
        vec![
            SensorDescriptor::periodic("cpu_usage", "CPU Usage"),
            SensorDescriptor::periodic("memory_usage", "Memory Usage"),
            SensorDescriptor::periodic("memory_used", "Memory Used"),
            SensorDescriptor::periodic("disk_usage", "Disk Usage"),
            SensorDescriptor::periodic("uptime", "Uptime"),
            SensorDescriptor::fixed("hostname", "Hostname"),
            SensorDescriptor::fixed("os_name", "Operating System"),
            SensorDescriptor::fixed("os_version", "OS Version"),
        ]
    }

    fn read(&self, sensor_id: &str) -> Result<SensorReading> {
        match sensor_id {
            "cpu_usage" => {
                let mut sys = self.sys.lock().expect("sensor lock poisoned");
                sys.refresh_cpu_usage();
                let usage = sys.global_cpu_usage();
                Ok(Self::reading(
                    sensor_id,
                    "CPU Usage",
                    serde_json::json!(format!("{:.1}", usage)),
                    Some("%"),
                    None,
                    "mdi:cpu-64-bit",
                    true,
                ))
            }
            "memory_usage" => {
                let mut sys = self.sys.lock().expect("sensor lock poisoned");
                sys.refresh_memory();
                let total = sys.total_memory();
                if total == 0 {
                    return Err(AppError::internal("total memory reported as zero"));
                }
                let percent = sys.used_memory() as f64 / total as f64 * 100.0;
                Ok(Self::reading(
                    sensor_id,
                    "Memory Usage",
                    serde_json::json!(format!("{:.1}", percent)),
                    Some("%"),
                    None,
                    "mdi:memory",
                    true,
                ))
            }
            "memory_used" => {
                let mut sys = self.sys.lock().expect("sensor lock poisoned");
                sys.refresh_memory();
                let used_gb = sys.used_memory() as f64 / GIB;
                Ok(Self::reading(
                    sensor_id,
                    "Memory Used",
                    serde_json::json!(format!("{:.2}", used_gb)),
                    Some("GB"),
                    Some("data_size"),
                    "mdi:memory",
                    true,
                ))
            }
            "disk_usage" => {
                let disks = Disks::new_with_refreshed_list();
                let (total, available) = disks
                    .iter()
                    .fold((0u64, 0u64), |(total, available), disk| {
                        (total + disk.total_space(), available + disk.available_space())
                    });
                if total == 0 {
                    return Err(AppError::internal("no disks reported"));
                }
                let percent = (total - available) as f64 / total as f64 * 100.0;
                let mut reading = Self::reading(
                    sensor_id,
                    "Disk Usage",
                    serde_json::json!(format!("{:.1}", percent)),
                    Some("%"),
                    None,
                    "mdi:harddisk",
                    true,
                );
                reading.attributes.insert(
                    "total_gb".to_string(),
                    serde_json::json!(format!("{:.1}", total as f64 / GIB)),
                );
                reading.attributes.insert(
                    "free_gb".to_string(),
                    serde_json::json!(format!("{:.1}", available as f64 / GIB)),
                );
                Ok(reading)
            }
            "uptime" => Ok(Self::reading(
                sensor_id,
                "Uptime",
                serde_json::json!(System::uptime()),
                Some("s"),
                Some("duration"),
                "mdi:clock-outline",
                true,
            )),
            "hostname" => Ok(Self::reading(
                sensor_id,
                "Hostname",
                serde_json::json!(crate::utils::helpers::device_hostname()),
                None,
                None,
                "mdi:desktop-classic",
                false,
            )),
            "os_name" => Ok(Self::reading(
                sensor_id,
                "Operating System",
                serde_json::json!(System::name().unwrap_or_else(|| "Unknown".to_string())),
                None,
                None,
                "mdi:desktop-classic",
                false,
            )),
            "os_version" => Ok(Self::reading(
                sensor_id,
                "OS Version",
                serde_json::json!(System::os_version().unwrap_or_else(|| "Unknown".to_string())),
                None,
                None,
                "mdi:counter",
                false,
            )),
            other => Err(AppError::not_found(format!("unknown sensor: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ids_are_unique_and_readable() {
        let source = SystemSensorSource::new();
        let catalog = source.catalog();

        let mut seen = std::collections::HashSet::new();
        for descriptor in &catalog {
            assert!(seen.insert(descriptor.id.clone()), "duplicate id");
        }

        // Every cataloged sensor must produce a reading on this machine,
        // except hardware-dependent ones that may legitimately be absent.
        for descriptor in &catalog {
            match source.read(&descriptor.id) {
                Ok(reading) => {
                    assert_eq!(reading.id, descriptor.id);
                    assert_eq!(reading.updates_at_interval, descriptor.updates_at_interval);
                }
                Err(AppError::Internal(_)) => {}
                Err(other) => panic!("unexpected error for {}: {}", descriptor.id, other),
            }
        }
    }

    #[test]
    fn test_unknown_sensor_is_not_found() {
        let source = SystemSensorSource::new();
        assert!(matches!(
            source.read("nonexistent"),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_static_sensors_have_no_state_class() {
        let source = SystemSensorSource::new();
        let reading = source.read("os_name").unwrap();
        assert!(!reading.updates_at_interval);
        assert!(reading.state_class.is_none());
    }
}
