use serde::Deserialize;
use std::time::Duration;

use crate::config::Config;
use crate::error::ServiceError;

#[derive(Deserialize)]
struct ScanResponse {
    template: Option<String>,
    error: Option<String>,
}

/// Client for the local biometric hardware bridge. The bridge returns an
/// opaque template string which is only ever compared for equality against
/// `employees.fingerprint_hash`, never interpreted.
#[derive(Clone)]
pub struct FingerprintBridge {
    client: reqwest::Client,
    base_url: String,
    mock: bool,
}

impl FingerprintBridge {
    pub fn new(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            // Covers the time the user has to place a finger on the scanner.
            .timeout(Duration::from_secs(config.fingerprint_timeout_secs))
            .build()
            .expect("failed to build fingerprint bridge client");

        Self {
            client,
            base_url: config.fingerprint_url.clone(),
            mock: config.fingerprint_mock,
        }
    }

    /// Triggers the hardware to scan a finger and returns the template.
    /// Unreachable or timed-out hardware degrades to `HardwareUnavailable`
    /// so the kiosk can fall back to PIN entry.
    pub async fn capture_template(&self) -> Result<String, ServiceError> {
        if self.mock {
            return Ok("MOCK-TEMPLATE".to_string());
        }

        let response = self
            .client
            .post(format!("{}/scan", self.base_url))
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Fingerprint bridge unreachable");
                if e.is_timeout() {
                    ServiceError::HardwareUnavailable("Scan timed out. Please try again.".into())
                } else {
                    ServiceError::HardwareUnavailable(
                        "Fingerprint service not running on this machine.".into(),
                    )
                }
            })?;

        let body: ScanResponse = response.json().await.map_err(|e| {
            tracing::warn!(error = %e, "Fingerprint bridge returned malformed payload");
            ServiceError::HardwareUnavailable("Unknown biometric error".into())
        })?;

        match (body.template, body.error) {
            (Some(template), _) => Ok(template),
            (None, Some(error)) => Err(ServiceError::HardwareUnavailable(error)),
            (None, None) => Err(ServiceError::HardwareUnavailable(
                "Unknown biometric error".into(),
            )),
        }
    }

    /// Pings the bridge to check if hardware is ready.
    pub async fn check_status(&self) -> bool {
        if self.mock {
            return true;
        }
        match self
            .client
            .get(format!("{}/status", self.base_url))
            .send()
            .await
        {
            Ok(res) => res.status().is_success(),
            Err(_) => false,
        }
    }
}
