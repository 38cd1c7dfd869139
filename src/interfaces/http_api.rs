//! Best-effort delivery of a cycle's readings to the remote API.
//!
//! Transport-level failures are retried at a fixed interval up to the
//! configured bound; a response from the server, even a failing one, ends
//! the attempt loop. Nothing here propagates to the caller: a lost upload
//! must not take down the cycle or the next scheduled one.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;
use thiserror::Error;

use crate::config::ApiConfig;
use crate::constants::defaults;
use crate::data_mgmt::payload::TelemetryPayload;
use crate::helpers::{retry_fixed, Delay, RetryError};

#[derive(Error, Debug)]
enum UploadError {
    #[error("network failure: {0}")]
    Network(String),
    #[error("server failure: {0}")]
    Server(String),
}

/// Error body the API is expected (but not required) to return on failure.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

fn get_ureq_agent(timeout: Duration) -> Result<ureq::Agent> {
    Ok(ureq::AgentBuilder::new()
        .tls_connector(Arc::new(native_tls::TlsConnector::new()?))
        .timeout(timeout)
        .build())
}

/// Post `payload` to the configured endpoint. Logs the outcome and always
/// returns; delivery is fire-and-forget from the caller's perspective.
pub fn write(payload: &TelemetryPayload, api: &ApiConfig, delay: &mut dyn Delay) {
    log::debug!("Started posting data to {}", api.endpoint);
    let agent = match get_ureq_agent(Duration::from_secs(api.timeout)) {
        Ok(agent) => agent,
        Err(e) => {
            log::error!("Could not build HTTP client: {:#}", e);
            return;
        }
    };

    let post = || {
        match agent
            .post(&api.endpoint)
            .set("Authorization", &api.api_key)
            .set("Accept", "application/json")
            .set("Content-Type", "application/json")
            .send_json(payload)
        {
            Ok(response) => Ok(format!("{} {}", response.status(), response.status_text())),
            Err(ureq::Error::Status(code, response)) => {
                Err(RetryError::Permanent(UploadError::Server(describe_failure(
                    code, response,
                ))))
            }
            Err(e) => Err(RetryError::Transient(UploadError::Network(e.to_string()))),
        }
    };

    match retry_fixed(api.max_retries, defaults::API_RETRY_INTERVAL, delay, post) {
        Ok(status) => log::info!("Data posted to API: {}", status),
        Err(RetryError::Permanent(e)) => log::warn!("Failed to post data: {}", e),
        Err(RetryError::Transient(e)) => log::error!(
            "Giving up posting data after {} attempts: {}",
            api.max_retries,
            e
        ),
    }
}

fn describe_failure(code: u16, response: ureq::Response) -> String {
    let reason = response.status_text().to_string();
    match response.into_json::<ErrorBody>() {
        Ok(ErrorBody { error: Some(message) }) => format!("{} {}: {}", code, reason, message),
        _ => format!("{} {}", code, reason),
    }
}
