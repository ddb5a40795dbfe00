//! HTTP infrastructure
//!
//! The reqwest adapter behind the `ApiClient` port.

mod rest_client;

pub use rest_client::RestClient;
