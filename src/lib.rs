//! hublink: desktop companion for a home-automation hub.
//!
//! Registers this machine as a device, mirrors system metric sensors on a
//! schedule and hosts the hub's dashboard in an embedded, already
//! authenticated webview.

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interface;
pub mod utils;

pub use application::{DashboardService, RegistrationService, SensorRegistry, UpdateScheduler};
pub use config::{AppConfig, ConfigStore, ConnectionSettings, SettingsPatch};
pub use infrastructure::hub::HubClient;

use infrastructure::dashboard::TauriDashboardView;
use infrastructure::sensors::SystemSensorSource;
use interface::SensorSource;
use std::sync::Arc;
use tauri::{
    menu::{MenuBuilder, MenuItemBuilder},
    tray::TrayIconBuilder,
    Emitter, Manager, RunEvent, WindowEvent,
};
use utils::logging;

/// Shared application state, managed by Tauri and consumed by the
/// command handlers in `api/`.
pub struct AppState {
    pub config: Arc<ConfigStore>,
    pub registry: Arc<SensorRegistry>,
    pub registration: Arc<RegistrationService>,
    pub scheduler: Arc<UpdateScheduler>,
    pub dashboard: Arc<DashboardService>,
}

pub fn run() {
    // A missing or corrupt record degrades to first-run defaults inside
    // the store; only an unresolvable settings location is fatal.
    let config = match ConfigStore::load(None) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            eprintln!("Cannot resolve the settings location: {}", e);
            std::process::exit(1);
        }
    };

    let source: Arc<dyn SensorSource> = Arc::new(SystemSensorSource::new());
    let hub = Arc::new(HubClient::new(Arc::clone(&config)));
    let registry = Arc::new(SensorRegistry::new(Arc::clone(&source), Arc::clone(&config)));
    let registration = Arc::new(RegistrationService::new(
        Arc::clone(&config),
        Arc::clone(&hub),
        Arc::clone(&registry),
    ));
    let scheduler = Arc::new(UpdateScheduler::new(
        Arc::clone(&config),
        Arc::clone(&hub),
        Arc::clone(&registry),
    ));

    let app = tauri::Builder::default()
        .plugin(logging::get_builder().build())
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_single_instance::init(|app, _args, _cwd| {
            // Focus the main window when a second instance is launched
            if let Some(window) = app.get_webview_window("main") {
                let _ = window.show();
                let _ = window.set_focus();
            }
        }))
        .plugin(tauri_plugin_autostart::init(
            tauri_plugin_autostart::MacosLauncher::LaunchAgent,
            Some(vec![]),
        ))
        .setup(move |app| {
            let handle = app.handle().clone();

            let view = Arc::new(TauriDashboardView::new(handle.clone()));
            let dashboard = Arc::new(DashboardService::new(Arc::clone(&config), view));

            let state = Arc::new(AppState {
                config: Arc::clone(&config),
                registry: Arc::clone(&registry),
                registration: Arc::clone(&registration),
                scheduler: Arc::clone(&scheduler),
                dashboard,
            });
            app.manage(Arc::clone(&state));

            // Tray menu
            let show_hide = MenuItemBuilder::with_id("show_hide", "Show / Hide").build(app)?;
            let settings_item = MenuItemBuilder::with_id("settings", "Settings").build(app)?;
            let quit = MenuItemBuilder::with_id("quit", "Quit").build(app)?;
            let menu = MenuBuilder::new(app)
                .item(&show_hide)
                .item(&settings_item)
                .separator()
                .item(&quit)
                .build()?;

            let mut tray = TrayIconBuilder::new()
                .tooltip("hublink")
                .menu(&menu)
                .show_menu_on_left_click(false)
                .on_menu_event(move |app, event| match event.id().as_ref() {
                    "show_hide" => {
                        if let Some(window) = app.get_webview_window("main") {
                            if window.is_visible().unwrap_or(false) {
                                let _ = window.hide();
                            } else {
                                let _ = window.show();
                                let _ = window.set_focus();
                            }
                        }
                    }
                    "settings" => {
                        // The dashboard overlay would cover the settings view
                        let state = app.state::<Arc<AppState>>();
                        state.dashboard.close();
                        if let Some(window) = app.get_webview_window("main") {
                            let _ = window.show();
                            let _ = window.set_focus();
                            let _ = window.emit("tray-show-settings", ());
                        }
                    }
                    "quit" => {
                        app.exit(0);
                    }
                    _ => {}
                })
                .on_tray_icon_event(|tray, event| {
                    if let tauri::tray::TrayIconEvent::DoubleClick { .. } = event {
                        let app = tray.app_handle();
                        if let Some(window) = app.get_webview_window("main") {
                            if window.is_visible().unwrap_or(false) {
                                let _ = window.hide();
                            } else {
                                let _ = window.show();
                                let _ = window.set_focus();
                            }
                        }
                    }
                });
            if let Some(icon) = app.default_window_icon() {
                tray = tray.icon(icon.clone());
            }
            let _tray = tray.build(app)?;

            // Resume a previous registration: push the static facts once,
            // then hand over to the periodic loop
            let bg_state = Arc::clone(&state);
            tauri::async_runtime::spawn(async move {
                let config = bg_state.config.get();
                if !config.identity.is_registered {
                    return;
                }

                bg_state.registration.push_static_sensors().await;

                // The static push may have revealed a revoked webhook
                let config = bg_state.config.get();
                if config.identity.is_registered {
                    bg_state.scheduler.start(&config.identity.device_id).await;
                }
            });

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            api::setting::get_settings,
            api::setting::save_settings,
            api::setting::get_current_language,
            api::registration::register_device,
            api::sensor::get_sensor_list,
            api::sensor::toggle_sensor,
            api::sensor::update_sensors_now,
            api::dashboard::load_dashboard,
            api::dashboard::hide_dashboard,
            api::network::get_my_public_ip,
            api::autostart::enable_autostart,
            api::autostart::disable_autostart,
            api::autostart::is_autostart_enabled,
        ])
        .build(tauri::generate_context!())
        .expect("error while building tauri application");

    app.run(|app_handle, event| {
        if let RunEvent::WindowEvent {
            label,
            event: WindowEvent::CloseRequested { api, .. },
            ..
        } = event
        {
            // Closing the main window hides to tray instead of quitting
            if label == "main" {
                api.prevent_close();
                if let Some(window) = app_handle.get_webview_window("main") {
                    let _ = window.hide();
                }
            }
        }
    });
}
