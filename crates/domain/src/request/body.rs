//! HTTP Request body forms

use serde::Serialize;

use crate::error::{DomainError, DomainResult};

/// A request body supplied by a scenario step.
///
/// Structured values are serialized to JSON once at send time; a pre-formed
/// JSON string is passed through verbatim and never re-encoded.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    /// No body.
    #[default]
    None,
    /// A structured value, serialized to JSON when the request is sent.
    Json(serde_json::Value),
    /// A pre-formed JSON string, sent exactly as given.
    Raw(String),
}

impl RequestBody {
    /// Creates an empty body.
    #[must_use]
    pub const fn none() -> Self {
        Self::None
    }

    /// Creates a structured JSON body from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidBody` when the value cannot be
    /// represented as JSON.
    pub fn json<T: Serialize>(value: &T) -> DomainResult<Self> {
        serde_json::to_value(value)
            .map(Self::Json)
            .map_err(|e| DomainError::InvalidBody(e.to_string()))
    }

    /// Creates a raw body from a pre-formed JSON string.
    #[must_use]
    pub fn raw(content: impl Into<String>) -> Self {
        Self::Raw(content.into())
    }

    /// Returns whether the body carries any content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::None => true,
            Self::Json(_) => false,
            Self::Raw(content) => content.is_empty(),
        }
    }

    /// Returns the content type to send with this body, if any.
    #[must_use]
    pub fn content_type(&self) -> Option<&'static str> {
        if self.is_empty() {
            None
        } else {
            Some("application/json")
        }
    }

    /// Renders the body into the payload string to put on the wire.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidBody` when a structured value fails to
    /// serialize.
    pub fn to_payload(&self) -> DomainResult<Option<String>> {
        match self {
            Self::None => Ok(None),
            Self::Json(value) => serde_json::to_string(value)
                .map(Some)
                .map_err(|e| DomainError::InvalidBody(e.to_string())),
            Self::Raw(content) => Ok(Some(content.clone())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_none_body() {
        let body = RequestBody::none();
        assert!(body.is_empty());
        assert_eq!(body.content_type(), None);
        assert_eq!(body.to_payload().unwrap(), None);
    }

    #[test]
    fn test_json_body() {
        let body = RequestBody::json(&serde_json::json!({"name": "Bob"})).unwrap();
        assert!(!body.is_empty());
        assert_eq!(body.content_type(), Some("application/json"));
        assert_eq!(
            body.to_payload().unwrap(),
            Some(r#"{"name":"Bob"}"#.to_string())
        );
    }

    #[test]
    fn test_raw_body_passes_through_verbatim() {
        // Odd spacing survives: a raw string is never re-encoded.
        let raw = "{ \"name\" :  \"Bob\" }";
        let body = RequestBody::raw(raw);
        assert_eq!(body.to_payload().unwrap(), Some(raw.to_string()));
        assert_eq!(body.content_type(), Some("application/json"));
    }

    #[test]
    fn test_empty_raw_body() {
        let body = RequestBody::raw("");
        assert!(body.is_empty());
        assert_eq!(body.content_type(), None);
    }
}
