//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A configuration value is invalid (bad timeout, malformed base URL).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A resolved request URL is invalid or malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// The request body cannot be serialized.
    #[error("invalid body: {0}")]
    InvalidBody(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
