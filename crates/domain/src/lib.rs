//! Verity Domain - Core types for the API test harness
//!
//! This crate defines the domain model for scenario-driven API testing.
//! All types here are pure Rust with no I/O dependencies: the response
//! value, client configuration, request method/body, JSON extraction,
//! and the scenario lifecycle/reporting types.

pub mod config;
pub mod error;
pub mod extract;
pub mod request;
pub mod response;
pub mod scenario;

pub use config::{ClientConfig, DEFAULT_TIMEOUT_MS, Header};
pub use error::{DomainError, DomainResult};
pub use extract::{ExtractError, JsonExtractor, first_element, is_json_array};
pub use request::{HttpMethod, RequestBody};
pub use response::{ApiResponse, TransportError};
pub use scenario::{AssertionOutcome, RunSummary, ScenarioReport, ScenarioState};
