//! Scenario lifecycle
//!
//! A [`ScenarioSession`] owns one scenario's client/handler/extractor triple
//! and its state machine; a [`ScenarioRunner`] builds a fresh session per
//! scenario, drives the steps, and guarantees teardown.

mod runner;
mod session;

pub use runner::ScenarioRunner;
pub use session::ScenarioSession;
