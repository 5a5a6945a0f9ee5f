use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Session credential written into the dashboard view's storage before its
/// first navigation, so the hub frontend skips its login prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCredential {
    pub base_url: String,
    pub access_token: String,
    pub token_type: String,
}

impl SessionCredential {
    pub fn bearer(base_url: String, access_token: String) -> Self {
        Self {
            base_url,
            access_token,
            token_type: "Bearer".to_string(),
        }
    }
}

/// Embedded view hosting the hub's web dashboard.
///
/// Each method resolves only once its step has completed, which is what
/// lets the bootstrap enforce blank -> inject -> navigate ordering.
#[async_trait]
pub trait DashboardView: Send + Sync {
    /// Point the view at an inert blank page and wait for it to finish
    /// loading.
    async fn open_blank(&self) -> Result<()>;

    /// Write the session credential into the view's persistent client-side
    /// storage. The token must never appear in a navigable URL.
    async fn inject_session(&self, credential: &SessionCredential) -> Result<()>;

    /// Navigate the view to the real dashboard URL.
    async fn show(&self, url: &str) -> Result<()>;

    /// Tear the view down (e.g. when the settings view takes over).
    fn close(&self);
}
