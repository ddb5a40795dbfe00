//! Response value
//!
//! The immutable outcome of one executed request. Transport-level failures
//! (timeouts, connection errors) are captured here rather than raised, so
//! callers always receive a response they can assert on.

use std::time::Duration;

use thiserror::Error;

/// A network or protocol failure captured inside a response.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request did not complete within the configured timeout.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// The timeout that elapsed, in milliseconds.
        timeout_ms: u64,
    },

    /// The remote host actively refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// The host name could not be resolved.
    #[error("DNS resolution failed for {host}: {message}")]
    Dns {
        /// Host that failed to resolve.
        host: String,
        /// Resolver error text.
        message: String,
    },

    /// The connection could not be established for another reason.
    #[error("connection failed: {0}")]
    Connect(String),

    /// Any other transport-level failure.
    #[error("transport error: {0}")]
    Other(String),
}

/// The outcome of one executed HTTP request.
///
/// Immutable once produced; owned exclusively by the caller that receives it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code; `0` when the request never reached the protocol
    /// layer (see [`transport_error`](Self::transport_error)).
    pub status: u16,
    /// Response body as text.
    pub body: String,
    /// Wall-clock time the request took to settle.
    pub duration: Duration,
    /// The captured failure, when the transport never produced a response.
    pub transport_error: Option<TransportError>,
}

impl ApiResponse {
    /// Creates a response from a completed HTTP exchange.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>, duration: Duration) -> Self {
        Self {
            status,
            body: body.into(),
            duration,
            transport_error: None,
        }
    }

    /// Creates a response capturing a transport failure.
    #[must_use]
    pub const fn from_transport_error(error: TransportError, duration: Duration) -> Self {
        Self {
            status: 0,
            body: String::new(),
            duration,
            transport_error: Some(error),
        }
    }

    /// Returns true iff the status code is in the 2xx range.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Returns true when the request failed before an HTTP response arrived.
    #[must_use]
    pub const fn is_transport_failure(&self) -> bool {
        self.transport_error.is_some()
    }

    /// Renders the captured transport failure, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.transport_error.as_ref().map(ToString::to_string)
    }
}
