//! Verity Infrastructure - HTTP adapter
//!
//! The reqwest-backed [`RestClient`](http::RestClient) implementing the
//! application layer's `ApiClient` port, plus the factory helpers that
//! assemble a per-scenario session bundle.

pub mod http;
pub mod session;

pub use http::RestClient;
pub use session::{scenario_runner, scenario_session};
