#![allow(dead_code)] // each test binary uses a subset of these helpers

use hublink_lib::config::{ConfigStore, SettingsPatch};
use hublink_lib::domain::sensor::{SensorDescriptor, SensorReading};
use hublink_lib::error::{AppError, Result};
use hublink_lib::interface::SensorSource;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Deterministic sensor source for integration tests: two periodic
/// sensors, one static fact, and an optional failing sensor. Records
/// which ids were read.
pub struct FakeSource {
    pub with_failing: bool,
    pub reads: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn new(with_failing: bool) -> Self {
        Self {
            with_failing,
            reads: Mutex::new(Vec::new()),
        }
    }

    pub fn reads_of(&self, sensor_id: &str) -> usize {
        self.reads
            .lock()
            .unwrap()
            .iter()
            .filter(|id| id.as_str() == sensor_id)
            .count()
    }
}

impl SensorSource for FakeSource {
    fn catalog(&self) -> Vec<SensorDescriptor> {
        let mut catalog = vec![
            SensorDescriptor::periodic("cpu_usage", "CPU Usage"),
            SensorDescriptor::periodic("memory_usage", "Memory Usage"),
            SensorDescriptor::fixed("os_name", "Operating System"),
        ];
        if self.with_failing {
            catalog.push(SensorDescriptor::periodic("broken", "Broken Sensor"));
        }
        catalog
    }

    fn read(&self, sensor_id: &str) -> Result<SensorReading> {
        self.reads.lock().unwrap().push(sensor_id.to_string());
        if sensor_id == "broken" {
            return Err(AppError::internal("sensor hardware absent"));
        }

        Ok(SensorReading {
            id: sensor_id.to_string(),
            name: sensor_id.to_string(),
            state: serde_json::json!("1.0"),
            unit_of_measurement: Some("%".to_string()),
            device_class: None,
            state_class: Some("measurement".to_string()),
            icon: None,
            attributes: HashMap::new(),
            updates_at_interval: sensor_id != "os_name",
        })
    }
}

/// A store under the given temp dir, pointed at the mock hub.
pub fn configured_store(dir: &tempfile::TempDir, server_url: &str) -> Arc<ConfigStore> {
    let store = ConfigStore::load(Some(settings_path(dir))).unwrap();
    store
        .save(SettingsPatch {
            server_url: Some(server_url.to_string()),
            access_token: Some("test-token".to_string()),
            update_interval: Some(1),
            ..Default::default()
        })
        .unwrap();
    Arc::new(store)
}

pub fn settings_path(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join("settings.json")
}

/// Shared hit counter for mock webhook endpoints.
pub fn hit_counter() -> (Arc<AtomicUsize>, impl Fn() -> usize) {
    let counter = Arc::new(AtomicUsize::new(0));
    let reader = {
        let counter = Arc::clone(&counter);
        move || counter.load(Ordering::SeqCst)
    };
    (counter, reader)
}
