//! Error types for the MYGO orchestration layer.
//!
//! Gateway implementations return `MygoResult<T>`. The orchestration core
//! never hands these to its own callers: every failure ends up as a
//! conversational error message, so the variants carry enough context to
//! log the failure and nothing more.

use thiserror::Error;

/// The unified error type for backend calls and configuration.
#[derive(Debug, Error)]
pub enum MygoError {
    /// The request never produced a response (connection refused, timeout, DNS).
    #[error("backend request to '{operation}' failed: {reason}")]
    Transport { operation: String, reason: String },

    /// The backend answered with a non-success status.
    #[error("backend returned status {status} for '{operation}': {message}")]
    Status {
        operation: String,
        status: u16,
        message: String,
    },

    /// The response body could not be decoded into the expected shape.
    #[error("unexpected response from '{operation}': {reason}")]
    UnexpectedResponse { operation: String, reason: String },

    /// A JSON body arrived where a binary document was expected.
    ///
    /// The backend reports generation failures this way for download
    /// requests; the JSON is never treated as the payload.
    #[error("expected a binary document from '{operation}' but received JSON: {message}")]
    NotBinary { operation: String, message: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

/// Convenience alias used throughout the MYGO crates.
pub type MygoResult<T> = Result<T, MygoError>;
