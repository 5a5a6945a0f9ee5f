use crate::config::ConfigStore;
use crate::error::{AppError, Result};
use crate::interface::{DashboardView, SessionCredential};
use std::sync::Arc;

/// Boots the embedded dashboard with an authenticated session.
///
/// The three steps are strictly sequential: the inert blank page must
/// have finished loading before the credential is written, and the write
/// must have returned before the real dashboard URL is issued, so the
/// token never rides along in a navigable address.
pub struct DashboardService {
    config: Arc<ConfigStore>,
    view: Arc<dyn DashboardView>,
}

impl DashboardService {
    pub fn new(config: Arc<ConfigStore>, view: Arc<dyn DashboardView>) -> Self {
        Self { config, view }
    }

    /// Run the full bootstrap sequence. Re-invocations repeat all three
    /// steps instead of assuming the previous credential is still valid.
    pub async fn load(&self) -> Result<()> {
        let config = self.config.get();
        if !config.settings.is_configured() {
            return Err(AppError::validation("Hub connection is not configured"));
        }

        let credential = SessionCredential::bearer(
            config.settings.server_url.clone(),
            config.settings.access_token.clone(),
        );

        self.view.open_blank().await?;

        // A failed write is not fatal: the dashboard then falls back to
        // its own login prompt instead of the app hanging here.
        if let Err(e) = self.view.inject_session(&credential).await {
            log::warn!("Session injection failed, dashboard will ask for login: {}", e);
        }

        self.view.show(&config.settings.server_url).await
    }

    pub fn close(&self) {
        self.view.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SettingsPatch;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::tempdir;

    #[derive(Default)]
    struct RecordingView {
        calls: Mutex<Vec<String>>,
        fail_blank: bool,
        fail_inject: bool,
    }

    #[async_trait]
    impl DashboardView for RecordingView {
        async fn open_blank(&self) -> Result<()> {
            self.calls.lock().unwrap().push("blank".to_string());
            if self.fail_blank {
                return Err(AppError::internal("blank failed"));
            }
            Ok(())
        }

        async fn inject_session(&self, credential: &SessionCredential) -> Result<()> {
            assert_eq!(credential.token_type, "Bearer");
            self.calls.lock().unwrap().push("inject".to_string());
            if self.fail_inject {
                return Err(AppError::internal("storage inaccessible"));
            }
            Ok(())
        }

        async fn show(&self, url: &str) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("navigate:{}", url));
            Ok(())
        }

        fn close(&self) {
            self.calls.lock().unwrap().push("close".to_string());
        }
    }

    fn configured_store(dir: &tempfile::TempDir) -> Arc<ConfigStore> {
        let store = ConfigStore::load(Some(dir.path().join("settings.json"))).unwrap();
        store
            .save(SettingsPatch {
                server_url: Some("https://hub.local:8123".to_string()),
                access_token: Some("token".to_string()),
                ..Default::default()
            })
            .unwrap();
        Arc::new(store)
    }

    #[tokio::test]
    async fn test_bootstrap_order_is_blank_inject_navigate() {
        let dir = tempdir().unwrap();
        let view = Arc::new(RecordingView::default());
        let service = DashboardService::new(configured_store(&dir), view.clone());

        service.load().await.unwrap();

        let calls = view.calls.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec![
                "blank".to_string(),
                "inject".to_string(),
                "navigate:https://hub.local:8123".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_injection_failure_still_navigates() {
        let dir = tempdir().unwrap();
        let view = Arc::new(RecordingView {
            fail_inject: true,
            ..Default::default()
        });
        let service = DashboardService::new(configured_store(&dir), view.clone());

        service.load().await.unwrap();

        let calls = view.calls.lock().unwrap().clone();
        assert_eq!(calls.len(), 3);
        assert!(calls[2].starts_with("navigate:"));
    }

    #[tokio::test]
    async fn test_blank_failure_aborts_before_injection() {
        let dir = tempdir().unwrap();
        let view = Arc::new(RecordingView {
            fail_blank: true,
            ..Default::default()
        });
        let service = DashboardService::new(configured_store(&dir), view.clone());

        assert!(service.load().await.is_err());

        let calls = view.calls.lock().unwrap().clone();
        assert_eq!(calls, vec!["blank".to_string()]);
    }

    #[tokio::test]
    async fn test_unconfigured_store_blocks_dashboard() {
        let dir = tempdir().unwrap();
        let store = Arc::new(
            ConfigStore::load(Some(dir.path().join("settings.json"))).unwrap(),
        );
        let view = Arc::new(RecordingView::default());
        let service = DashboardService::new(store, view.clone());

        assert!(matches!(
            service.load().await,
            Err(AppError::Validation(_))
        ));
        assert!(view.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reload_repeats_the_full_sequence() {
        let dir = tempdir().unwrap();
        let view = Arc::new(RecordingView::default());
        let service = DashboardService::new(configured_store(&dir), view.clone());

        service.load().await.unwrap();
        service.load().await.unwrap();

        let calls = view.calls.lock().unwrap().clone();
        assert_eq!(calls.len(), 6);
        assert_eq!(calls[0], calls[3]);
        assert_eq!(calls[1], calls[4]);
    }
}
