// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::ApifyConfig;

/// Headers sent with every request: the bearer token.
pub(crate) fn auth_headers(token: &str) -> Result<HeaderMap> {
    let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|_| AppError::config("API token contains characters not allowed in a header"))?;
    value.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}

// --- Async Functions ---

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &ApifyConfig, token: &str) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .default_headers(auth_headers(token)?)
        .build()
        .map_err(|e| AppError::dependency(format!("could not build async HTTP client: {e}")))
}

// --- Blocking Functions ---

/// Create a configured blocking HTTP client.
pub fn create_blocking_client(
    config: &ApifyConfig,
    token: &str,
) -> Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .default_headers(auth_headers(token)?)
        .build()
        .map_err(|e| AppError::dependency(format!("could not build blocking HTTP client: {e}")))
}

// --- Error Payloads ---

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(rename = "type", default)]
    error_type: String,
    #[serde(default)]
    message: String,
}

/// Turn a non-success response body into an [`AppError::Api`].
///
/// Bodies that are not the platform's error envelope are kept verbatim as
/// the message.
pub fn api_error(status: StatusCode, body: &str) -> AppError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => AppError::api(status.as_u16(), envelope.error.error_type, envelope.error.message),
        Err(_) => AppError::api(
            status.as_u16(),
            status.canonical_reason().unwrap_or("unknown"),
            body.trim(),
        ),
    }
}
