// src/error.rs

//! Unified error handling for the loader.

use std::fmt;

use thiserror::Error;

use crate::models::RunStatus;

/// Result type alias for loader operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error (missing credentials, unusable settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// The platform client could not be constructed
    #[error("Dependency error: {0}")]
    Dependency(String),

    /// The platform answered with an error payload
    #[error("Apify API error ({status}) {error_type}: {message}")]
    Api {
        status: u16,
        error_type: String,
        message: String,
    },

    /// An actor run finished without succeeding
    #[error("Actor run {run_id} finished with status {status}")]
    ActorRun { run_id: String, status: RunStatus },

    /// A dataset item could not be turned into a document
    #[error("Mapping error: {0}")]
    Mapping(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a dependency error.
    pub fn dependency(message: impl fmt::Display) -> Self {
        Self::Dependency(message.to_string())
    }

    /// Create a mapping error.
    pub fn mapping(message: impl Into<String>) -> Self {
        Self::Mapping(message.into())
    }

    /// Create an API error from a response status and the platform's error body.
    pub fn api(
        status: u16,
        error_type: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Api {
            status,
            error_type: error_type.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = AppError::api(404, "record-not-found", "Dataset was not found");
        assert_eq!(
            err.to_string(),
            "Apify API error (404) record-not-found: Dataset was not found"
        );
    }

    #[test]
    fn test_actor_run_error_display() {
        let err = AppError::ActorRun {
            run_id: "run-1".to_string(),
            status: RunStatus::TimedOut,
        };
        assert_eq!(err.to_string(), "Actor run run-1 finished with status TIMED-OUT");
    }
}
