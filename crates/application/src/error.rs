//! Application error types
//!
//! These are the fail-fast channel: contract violations that abort the
//! current scenario step. Verification mismatches never appear here — they
//! accumulate on the scenario report as `AssertionOutcome` records.

use thiserror::Error;
use verity_domain::{DomainError, ExtractError, ScenarioState};

/// Application-level errors raised by step operations.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// A JSON extraction failed.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractError),

    /// The response body was empty where content was required.
    #[error("response body is empty")]
    EmptyBody,

    /// The response body does not match the requested shape.
    #[error("failed to deserialize response body: {source}")]
    Deserialization {
        /// The underlying parse failure.
        #[source]
        source: serde_json::Error,
    },

    /// A response-reading step ran before any request was sent.
    #[error("no response has been received yet")]
    NoResponse,

    /// A step was attempted out of lifecycle order.
    #[error("invalid scenario transition: {from} -> {to}")]
    Lifecycle {
        /// The state the scenario was in.
        from: ScenarioState,
        /// The state the step required.
        to: ScenarioState,
    },

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
