//! End-to-end registration protocol tests against a mock hub.

mod common;

use common::{configured_store, settings_path, FakeSource};
use hublink_lib::application::{RegistrationService, SensorRegistry};
use hublink_lib::config::ConfigStore;
use hublink_lib::domain::device::RegistrationState;
use hublink_lib::error::AppError;
use hublink_lib::infrastructure::hub::HubClient;
use hublink_lib::interface::SensorSource;
use std::sync::Arc;
use tempfile::tempdir;

fn service(store: Arc<ConfigStore>) -> (RegistrationService, Arc<FakeSource>) {
    let source = Arc::new(FakeSource::new(false));
    let source_dyn: Arc<dyn SensorSource> = source.clone();
    let hub = Arc::new(HubClient::new(Arc::clone(&store)));
    let registry = Arc::new(SensorRegistry::new(source_dyn, Arc::clone(&store)));
    (RegistrationService::new(store, hub, registry), source)
}

async fn registration_ok(server: &mut mockito::ServerGuard, webhook_id: &str) -> mockito::Mock {
    server
        .mock("POST", "/api/hublink/registrations")
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(
            r#"{{"success":true,"webhook_id":"{}","error":null}}"#,
            webhook_id
        ))
        .create_async()
        .await
}

async fn webhook_ok(server: &mut mockito::ServerGuard, webhook_id: &str) -> mockito::Mock {
    server
        .mock("POST", format!("/api/webhook/{}", webhook_id).as_str())
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await
}

#[tokio::test]
async fn test_fresh_install_scenario() {
    let dir = tempdir().unwrap();
    let mut server = mockito::Server::new_async().await;

    // Empty store: settings empty, registration blocked before any I/O
    let empty_store = Arc::new(ConfigStore::load(Some(settings_path(&dir))).unwrap());
    let config = empty_store.get();
    assert_eq!(config.settings.server_url, "");
    assert_eq!(config.settings.access_token, "");

    let (registration, _) = service(Arc::clone(&empty_store));
    assert!(matches!(
        registration.register_device().await,
        Err(AppError::Validation(_))
    ));
    assert!(!empty_store.get().identity.is_registered);

    // After saving valid settings the registration succeeds
    let store = configured_store(&dir, &server.url());
    let _registration_mock = registration_ok(&mut server, "wh-1").await;
    let _webhook_mock = webhook_ok(&mut server, "wh-1").await;

    let (registration, _) = service(Arc::clone(&store));
    registration.register_device().await.unwrap();

    let config = store.get();
    assert!(config.identity.is_registered);
    assert!(!config.identity.device_id.is_empty());
    assert_eq!(config.identity.webhook_id.as_deref(), Some("wh-1"));
    assert_eq!(registration.state(), RegistrationState::Registered);
}

#[tokio::test]
async fn test_register_twice_keeps_device_id() {
    let dir = tempdir().unwrap();
    let mut server = mockito::Server::new_async().await;
    let store = configured_store(&dir, &server.url());

    let _first = registration_ok(&mut server, "wh-1").await;
    let _hook1 = webhook_ok(&mut server, "wh-1").await;

    let (registration, _) = service(Arc::clone(&store));
    registration.register_device().await.unwrap();
    let first_id = store.get().identity.device_id.clone();
    assert!(!first_id.is_empty());

    // The hub may rotate the webhook on re-registration
    let _second = registration_ok(&mut server, "wh-2").await;
    let _hook2 = webhook_ok(&mut server, "wh-2").await;
    registration.register_device().await.unwrap();

    let config = store.get();
    assert_eq!(config.identity.device_id, first_id);
    assert_eq!(config.identity.webhook_id.as_deref(), Some("wh-2"));
    assert_eq!(registration.state(), RegistrationState::Registered);
}

#[tokio::test]
async fn test_rejected_registration_persists_nothing() {
    let dir = tempdir().unwrap();
    let mut server = mockito::Server::new_async().await;
    let store = configured_store(&dir, &server.url());

    let _mock = server
        .mock("POST", "/api/hublink/registrations")
        .with_status(401)
        .with_body("invalid token")
        .create_async()
        .await;

    let (registration, _) = service(Arc::clone(&store));
    let err = registration.register_device().await.unwrap_err();
    assert!(matches!(err, AppError::Registration(_)));
    assert_eq!(registration.state(), RegistrationState::Failed);

    let config = store.get();
    assert!(!config.identity.is_registered);
    assert!(config.identity.device_id.is_empty());
    assert!(config.identity.webhook_id.is_none());
}

#[tokio::test]
async fn test_registration_announces_enabled_sensors_only() {
    let dir = tempdir().unwrap();
    let mut server = mockito::Server::new_async().await;
    let store = configured_store(&dir, &server.url());

    let _registration_mock = registration_ok(&mut server, "wh-1").await;
    let _webhook_mock = webhook_ok(&mut server, "wh-1").await;

    let (registration, source) = service(Arc::clone(&store));

    // A disabled sensor is excluded from the initial announce/push too
    store.set_sensor_enabled("memory_usage", false).unwrap();
    registration.register_device().await.unwrap();

    assert!(source.reads_of("cpu_usage") >= 1);
    assert!(source.reads_of("os_name") >= 1);
    assert_eq!(source.reads_of("memory_usage"), 0);
}
