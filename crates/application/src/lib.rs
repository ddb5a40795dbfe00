//! Verity Application - Scenario execution engine
//!
//! This crate wires the domain types into a per-scenario lifecycle: the
//! [`ApiClient`](ports::ApiClient) port abstracts the HTTP transport, the
//! [`ResponseHandler`](handler::ResponseHandler) verifies and extracts from
//! responses, and the [`scenario`] module owns session state and reporting.

pub mod error;
pub mod handler;
pub mod ports;
pub mod scenario;

pub use error::{ApplicationError, ApplicationResult};
pub use handler::ResponseHandler;
pub use ports::ApiClient;
pub use scenario::{ScenarioRunner, ScenarioSession};
