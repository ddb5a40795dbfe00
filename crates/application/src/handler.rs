//! Response handler
//!
//! Verifications and typed reads over a settled [`ApiResponse`]. The
//! response type is fixed at compile time, so no runtime shape check guards
//! these entry points. Verification mismatches come back as
//! [`AssertionOutcome`] records; only contract violations (empty body where
//! content was required, malformed JSON, bad paths) are errors.

use serde::de::DeserializeOwned;
use tracing::{debug, error};
use verity_domain::{ApiResponse, AssertionOutcome, JsonExtractor};

use crate::error::{ApplicationError, ApplicationResult};

/// Assertion and extraction operations over responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseHandler {
    extractor: JsonExtractor,
}

impl ResponseHandler {
    /// Creates a handler.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            extractor: JsonExtractor::new(),
        }
    }

    /// Checks that the response carries exactly the expected status code.
    #[must_use]
    pub fn verify_status_code(&self, response: &ApiResponse, expected: u16) -> AssertionOutcome {
        debug!(expected, actual = response.status, "verifying status code");
        let description = format!("status code is {expected}");
        if response.status == expected {
            AssertionOutcome::pass_with_value(description, response.status.to_string())
        } else {
            AssertionOutcome::fail_with_value(
                description,
                response.status.to_string(),
                format!(
                    "expected status code {expected} but got {}",
                    response.status
                ),
            )
        }
    }

    /// Checks that the response status is in the 2xx range.
    #[must_use]
    pub fn verify_successful(&self, response: &ApiResponse) -> AssertionOutcome {
        debug!(status = response.status, "verifying response is successful");
        let description = "response is successful".to_string();
        if response.is_success() {
            AssertionOutcome::pass_with_value(description, response.status.to_string())
        } else {
            let detail = response
                .error_message()
                .map_or_else(String::new, |m| format!(": {m}"));
            AssertionOutcome::fail_with_value(
                description,
                response.status.to_string(),
                format!("request failed with status {}{detail}", response.status),
            )
        }
    }

    /// Checks that the response body contains `expected` as a literal,
    /// case-sensitive substring.
    #[must_use]
    pub fn verify_contains(&self, response: &ApiResponse, expected: &str) -> AssertionOutcome {
        debug!(expected, "verifying response contains text");
        let description = format!("body contains '{expected}'");
        if response.body.contains(expected) {
            AssertionOutcome::pass(description)
        } else {
            AssertionOutcome::fail_with_value(
                description,
                preview(&response.body),
                format!("body does not contain '{expected}'"),
            )
        }
    }

    /// Deserializes the response body into `T`.
    ///
    /// # Errors
    ///
    /// `EmptyBody` when there is no content, `Deserialization` when the body
    /// does not match the requested shape.
    pub fn deserialize<T: DeserializeOwned>(&self, response: &ApiResponse) -> ApplicationResult<T> {
        if response.body.trim().is_empty() {
            return Err(ApplicationError::EmptyBody);
        }
        match serde_json::from_str(&response.body) {
            Ok(value) => {
                debug!(
                    target_type = std::any::type_name::<T>(),
                    "deserialized response body"
                );
                Ok(value)
            }
            Err(e) => {
                error!(error = %e, "failed to deserialize response body");
                Err(ApplicationError::Deserialization { source: e })
            }
        }
    }

    /// Extracts the value at `path` from the response body, coerced to `T`.
    ///
    /// # Errors
    ///
    /// `EmptyBody` when there is no content; otherwise the extractor's
    /// parse/path/coercion failures, logged with context before propagating.
    pub fn extract<T: DeserializeOwned>(
        &self,
        response: &ApiResponse,
        path: &str,
    ) -> ApplicationResult<T> {
        if response.body.trim().is_empty() {
            return Err(ApplicationError::EmptyBody);
        }
        match self.extractor.extract_value(&response.body, path) {
            Ok(value) => {
                debug!(path, "extracted value from response");
                Ok(value)
            }
            Err(e) => {
                error!(path, error = %e, "failed to extract value from response");
                Err(e.into())
            }
        }
    }

    /// Returns the raw body text, with no validation.
    #[must_use]
    pub fn content<'a>(&self, response: &'a ApiResponse) -> &'a str {
        &response.body
    }
}

// Failure messages carry at most this much of the body.
fn preview(body: &str) -> String {
    const LIMIT: usize = 100;
    if body.chars().count() > LIMIT {
        let head: String = body.chars().take(LIMIT).collect();
        format!("{head}...")
    } else {
        body.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;
    use std::time::Duration;
    use verity_domain::{ExtractError, TransportError};

    #[derive(Debug, Deserialize, PartialEq)]
    struct User {
        id: u64,
        name: String,
    }

    fn response(status: u16, body: &str) -> ApiResponse {
        ApiResponse::new(status, body, Duration::from_millis(5))
    }

    #[test]
    fn test_verify_status_code() {
        let handler = ResponseHandler::new();
        let resp = response(200, "");

        assert!(handler.verify_status_code(&resp, 200).passed);

        let outcome = handler.verify_status_code(&resp, 201);
        assert!(!outcome.passed);
        assert_eq!(
            outcome.message.as_deref(),
            Some("expected status code 201 but got 200")
        );
    }

    #[test]
    fn test_verify_successful() {
        let handler = ResponseHandler::new();
        assert!(handler.verify_successful(&response(204, "")).passed);

        let outcome = handler.verify_successful(&response(503, ""));
        assert!(!outcome.passed);
        assert_eq!(
            outcome.message.as_deref(),
            Some("request failed with status 503")
        );
    }

    #[test]
    fn test_verify_successful_reports_transport_failure() {
        let handler = ResponseHandler::new();
        let resp = ApiResponse::from_transport_error(
            TransportError::Timeout { timeout_ms: 150 },
            Duration::from_millis(151),
        );

        let outcome = handler.verify_successful(&resp);
        assert!(!outcome.passed);
        let message = outcome.message.unwrap();
        assert!(message.contains("status 0"));
        assert!(message.contains("timed out after 150ms"));
    }

    #[test]
    fn test_verify_contains_is_case_sensitive() {
        let handler = ResponseHandler::new();
        let resp = response(200, r#"{"name":"Bob"}"#);

        assert!(handler.verify_contains(&resp, "Bob").passed);
        assert!(!handler.verify_contains(&resp, "bob").passed);
        assert!(!handler.verify_contains(&resp, "Carol").passed);
    }

    #[test]
    fn test_deserialize() {
        let handler = ResponseHandler::new();
        let user: User = handler
            .deserialize(&response(201, r#"{"id":7,"name":"Bob"}"#))
            .unwrap();
        assert_eq!(
            user,
            User {
                id: 7,
                name: "Bob".to_string()
            }
        );
    }

    #[test]
    fn test_deserialize_failures() {
        let handler = ResponseHandler::new();

        let result: ApplicationResult<User> = handler.deserialize(&response(200, "  "));
        assert!(matches!(result, Err(ApplicationError::EmptyBody)));

        let result: ApplicationResult<User> =
            handler.deserialize(&response(200, r#"{"wrong":"shape"}"#));
        assert!(matches!(
            result,
            Err(ApplicationError::Deserialization { .. })
        ));
    }

    #[test]
    fn test_extract() {
        let handler = ResponseHandler::new();
        let resp = response(200, r#"[{"id":1,"name":"Ada"}]"#);

        let name: String = handler.extract(&resp, "[0].name").unwrap();
        assert_eq!(name, "Ada");

        let result: ApplicationResult<String> = handler.extract(&resp, "[0].missing");
        assert!(matches!(
            result,
            Err(ApplicationError::Extraction(
                ExtractError::PathNotFound { .. }
            ))
        ));

        let result: ApplicationResult<String> = handler.extract(&response(200, ""), "[0].name");
        assert!(matches!(result, Err(ApplicationError::EmptyBody)));
    }

    #[test]
    fn test_content_returns_raw_body() {
        let handler = ResponseHandler::new();
        let resp = response(500, "not json at all");
        assert_eq!(handler.content(&resp), "not json at all");
    }
}
