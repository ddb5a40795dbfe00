//! Per-scenario bundle factories
//!
//! Explicit construction of the client/handler/extractor bundle — a plain
//! value handed to step code, with no process-wide registry behind it.

use verity_application::scenario::{ScenarioRunner, ScenarioSession};

use crate::http::RestClient;

/// Builds a fresh session for one scenario, backed by a [`RestClient`].
#[must_use]
pub fn scenario_session(title: &str) -> ScenarioSession<RestClient> {
    ScenarioSession::new(title, RestClient::new())
}

/// Builds a runner that backs every scenario with its own [`RestClient`].
#[must_use]
pub fn scenario_runner() -> ScenarioRunner<impl FnMut() -> RestClient> {
    ScenarioRunner::new(RestClient::new)
}
