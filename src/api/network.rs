use crate::error::AppError;
use std::time::Duration;

/// This machine's public (outbound) IP, for reverse-proxy allowlists.
#[tauri::command]
pub async fn get_my_public_ip() -> Result<String, String> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .map_err(|e| AppError::network(format!("Failed to create HTTP client: {}", e)))?;

    let body = client
        .get("https://api.ipify.org")
        .send()
        .await
        .map_err(|e| AppError::network(format!("Network error: {}", e)))?
        .text()
        .await
        .map_err(|e| AppError::network(format!("Failed to read response: {}", e)))?;

    Ok(body.trim().to_string())
}
