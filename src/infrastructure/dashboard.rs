//! Tauri adapter of the embedded dashboard view.
//!
//! The dashboard lives in its own webview window. Every bootstrap rebuilds
//! it from scratch: an inert bundled blank page first, whose load
//! completion is signalled through `on_page_load`, then the credential
//! write, then the navigation to the hub. The webview processes the
//! injected script and the subsequent navigation in dispatch order, so the
//! write has executed before the dashboard URL starts loading.

use crate::error::{AppError, Result};
use crate::interface::{DashboardView, SessionCredential};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tauri::webview::PageLoadEvent;
use tauri::{AppHandle, Manager, Url, WebviewUrl, WebviewWindowBuilder};
use tokio::sync::oneshot;
use tokio::time::{timeout, Duration};

pub const DASHBOARD_WINDOW: &str = "dashboard";

/// Storage key the hub frontend reads its session from.
const SESSION_STORAGE_KEY: &str = "hublink_session";

const PAGE_LOAD_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TauriDashboardView {
    app: AppHandle,
    pending_load: Arc<Mutex<Option<oneshot::Sender<()>>>>,
}

impl TauriDashboardView {
    pub fn new(app: AppHandle) -> Self {
        Self {
            app,
            pending_load: Arc::new(Mutex::new(None)),
        }
    }
}

#[async_trait]
impl DashboardView for TauriDashboardView {
    async fn open_blank(&self) -> Result<()> {
        // A previous dashboard window must not survive a re-bootstrap
        if let Some(window) = self.app.get_webview_window(DASHBOARD_WINDOW) {
            window
                .destroy()
                .map_err(|e| AppError::internal(format!("close old dashboard failed: {}", e)))?;
        }

        let (tx, rx) = oneshot::channel();
        *self.pending_load.lock().expect("dashboard lock poisoned") = Some(tx);

        let pending = Arc::clone(&self.pending_load);
        WebviewWindowBuilder::new(
            &self.app,
            DASHBOARD_WINDOW,
            WebviewUrl::App("dashboard.html".into()),
        )
        .title("Dashboard")
        .inner_size(1100.0, 750.0)
        .on_page_load(move |_window, payload| {
            if matches!(payload.event(), PageLoadEvent::Finished) {
                // Only the first load (the blank page) has a waiter
                if let Some(tx) = pending.lock().expect("dashboard lock poisoned").take() {
                    let _ = tx.send(());
                }
            }
        })
        .build()
        .map_err(|e| AppError::internal(format!("create dashboard view failed: {}", e)))?;

        match timeout(PAGE_LOAD_TIMEOUT, rx).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err(AppError::internal("dashboard view closed while loading")),
            Err(_) => Err(AppError::internal("blank page did not finish loading")),
        }
    }

    async fn inject_session(&self, credential: &SessionCredential) -> Result<()> {
        let window = self
            .app
            .get_webview_window(DASHBOARD_WINDOW)
            .ok_or_else(|| AppError::internal("dashboard view is gone"))?;

        // The credential goes into localStorage, never into a URL
        let key = serde_json::to_string(SESSION_STORAGE_KEY)?;
        let value = serde_json::to_string(&serde_json::to_string(credential)?)?;
        let script = format!(
            "(function() {{ window.localStorage.setItem({}, {}); }})();",
            key, value
        );

        window
            .eval(&script)
            .map_err(|e| AppError::internal(format!("session injection failed: {}", e)))
    }

    async fn show(&self, url: &str) -> Result<()> {
        let mut window = self
            .app
            .get_webview_window(DASHBOARD_WINDOW)
            .ok_or_else(|| AppError::internal("dashboard view is gone"))?;

        let url = Url::parse(url)
            .map_err(|e| AppError::validation(format!("invalid dashboard URL: {}", e)))?;
        window
            .navigate(url)
            .map_err(|e| AppError::internal(format!("dashboard navigation failed: {}", e)))?;

        let _ = window.show();
        let _ = window.set_focus();
        Ok(())
    }

    fn close(&self) {
        if let Some(window) = self.app.get_webview_window(DASHBOARD_WINDOW) {
            let _ = window.close();
        }
    }
}
