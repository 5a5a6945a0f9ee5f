/// Normalize a hub server URL as entered by the user.
///
/// Trailing slashes are stripped and a missing scheme defaults to https,
/// so that endpoint paths can be appended without double slashes.
pub fn normalize_server_url(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    with_scheme.trim_end_matches('/').to_string()
}

/// Redact an access token for log output. Only ever log the result of this,
/// never the token itself.
pub fn redact_token(token: &str) -> String {
    if token.is_empty() {
        return "<empty>".to_string();
    }
    if token.chars().count() <= 8 {
        return "****".to_string();
    }
    let prefix: String = token.chars().take(4).collect();
    format!("{}****", prefix)
}

/// Hostname of this machine, used as the default device name.
pub fn device_hostname() -> String {
    gethostname::gethostname()
        .to_str()
        .unwrap_or("Unknown Device")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_trailing_slashes() {
        assert_eq!(
            normalize_server_url("https://hub.local:8123///"),
            "https://hub.local:8123"
        );
        assert_eq!(
            normalize_server_url("http://192.168.1.10:8123/"),
            "http://192.168.1.10:8123"
        );
    }

    #[test]
    fn test_normalize_adds_https_scheme() {
        assert_eq!(normalize_server_url("hub.local:8123"), "https://hub.local:8123");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize_server_url("   "), "");
    }

    #[test]
    fn test_redact_token_never_leaks_full_value() {
        let token = "eyJhbGciOiJIUzI1NiJ9.secret.payload";
        let redacted = redact_token(token);
        assert!(!redacted.contains("secret"));
        assert!(redacted.len() < token.len());
        assert_eq!(redact_token(""), "<empty>");
        assert_eq!(redact_token("short"), "****");
    }
}
