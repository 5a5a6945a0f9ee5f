//! Unified error type for the hublink desktop application.
//!
//! Commands hand errors to the webview as plain strings, so every variant
//! carries a message that is safe to show to the user. Secrets (the hub
//! access token) must never end up inside an error message.

use std::fmt;

/// Application error, organized by failure domain.
#[derive(Debug, Clone)]
pub enum AppError {
    /// Malformed or missing input, caught before any I/O.
    Validation(String),

    /// Persisted settings record unreadable or unwritable.
    Storage(String),

    /// Device registration rejected by the hub or unreachable.
    Registration(String),

    /// A single sensor update failed; contained within the scheduler.
    Push(String),

    /// The hub reported the webhook as gone; the device must re-register.
    WebhookRevoked(String),

    /// Lookup of an unknown sensor id.
    NotFound(String),

    /// Network-level failure outside registration/push (e.g. public IP lookup).
    Network(String),

    /// Anything that does not fit the other categories.
    Internal(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn registration(msg: impl Into<String>) -> Self {
        Self::Registration(msg.into())
    }

    pub fn push(msg: impl Into<String>) -> Self {
        Self::Push(msg.into())
    }

    pub fn webhook_revoked(msg: impl Into<String>) -> Self {
        Self::WebhookRevoked(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// True when the hub explicitly told us the webhook no longer exists.
    /// Transient failures (timeouts, 5xx) never map to this variant.
    pub fn is_webhook_revoked(&self) -> bool {
        matches!(self, AppError::WebhookRevoked(_))
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::Validation(msg)
            | AppError::Storage(msg)
            | AppError::Registration(msg)
            | AppError::Push(msg)
            | AppError::WebhookRevoked(msg)
            | AppError::NotFound(msg)
            | AppError::Network(msg)
            | AppError::Internal(msg) => msg,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::Registration(msg) => write!(f, "Registration error: {}", msg),
            AppError::Push(msg) => write!(f, "Push error: {}", msg),
            AppError::WebhookRevoked(msg) => write!(f, "Webhook revoked: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Network(msg) => write!(f, "Network error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::storage(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::storage(format!("JSON error: {}", err))
    }
}

/// Tauri command return values require errors to be String.
impl From<AppError> for String {
    fn from(err: AppError) -> Self {
        err.to_string()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = AppError::validation("server URL is not configured");
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.message(), "server URL is not configured");
    }

    #[test]
    fn test_error_display() {
        let err = AppError::registration("hub rejected the token");
        let display = format!("{}", err);
        assert!(display.contains("Registration error"));
        assert!(display.contains("hub rejected the token"));
    }

    #[test]
    fn test_webhook_revoked_classification() {
        assert!(AppError::webhook_revoked("410 Gone").is_webhook_revoked());
        assert!(!AppError::push("timed out").is_webhook_revoked());
        assert!(!AppError::network("connection refused").is_webhook_revoked());
    }

    #[test]
    fn test_from_anyhow() {
        let anyhow_err = anyhow::anyhow!("something went wrong");
        let app_err: AppError = anyhow_err.into();
        assert!(matches!(app_err, AppError::Internal(_)));
    }

    #[test]
    fn test_into_string_for_commands() {
        let msg: String = AppError::not_found("unknown sensor: cpu_usage2").into();
        assert!(msg.contains("unknown sensor"));
    }
}
