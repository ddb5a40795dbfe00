//! Ports - interfaces to the outside world
//!
//! The application layer depends on these traits; infrastructure provides
//! the implementations.

mod api_client;

pub use api_client::ApiClient;
