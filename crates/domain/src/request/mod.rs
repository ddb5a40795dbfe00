//! Request domain types
//!
//! The HTTP verbs scenarios may send and the request body forms step
//! bindings can supply.

mod body;
mod method;

pub use body::RequestBody;
pub use method::HttpMethod;
