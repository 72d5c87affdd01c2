//! Error types for service-call
//!
//! This module defines the error hierarchy used throughout the crate.
//! Configuration and adapter errors are fatal and surface at startup or
//! method declaration; call errors surface to whoever executes a call.

use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Call adapter error: {0}")]
    Adapter(#[from] AdapterError),

    #[error("Call failed: {0}")]
    Call(#[from] CallError),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {field}")]
    Missing { field: String },
}

/// Errors raised while resolving a call adapter for a declared method
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    /// The wrapper type was declared without its payload type argument
    #[error("{raw} return type must be parameterized as {raw}<Foo> or {raw}<? extends Foo>")]
    MissingPayloadType { raw: &'static str },

    #[error("No call adapter registered for return type {return_type}")]
    NoAdapter { return_type: String },

    #[error("Declared payload type {declared} does not match {expected}")]
    PayloadMismatch { declared: String, expected: String },
}

/// Errors produced while building, executing or decoding a call
#[derive(Error, Debug)]
pub enum CallError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Already executed")]
    AlreadyExecuted,

    #[error("Canceled")]
    Canceled,

    #[error("Failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for call operations
pub type CallResult<T> = std::result::Result<T, CallError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_payload_type_message() {
        let err = AdapterError::MissingPayloadType { raw: "ServiceCall" };
        assert_eq!(
            err.to_string(),
            "ServiceCall return type must be parameterized as ServiceCall<Foo> or ServiceCall<? extends Foo>"
        );
    }

    #[test]
    fn test_app_error_from_variants() {
        let err: AppError = CallError::AlreadyExecuted.into();
        assert!(matches!(err, AppError::Call(CallError::AlreadyExecuted)));

        let err: AppError = AdapterError::NoAdapter {
            return_type: "Vec<u8>".into(),
        }
        .into();
        assert!(err.to_string().contains("Vec<u8>"));

        let err: AppError = ConfigError::Missing {
            field: "http.base_url".into(),
        }
        .into();
        assert!(err.to_string().contains("http.base_url"));
    }
}
