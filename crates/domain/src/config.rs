//! Client configuration
//!
//! Connection-level settings shared by every request a scenario sends:
//! base URL, default headers, bearer token, and the per-request timeout.
//! Mutations that change connection-level settings (base URL, timeout)
//! oblige the owning client to invalidate and rebuild its transport;
//! header and auth mutations apply to the existing transport instance.

use url::Url;

use crate::error::{DomainError, DomainResult};

/// Default per-request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// A single default header sent with every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Header name.
    pub name: String,
    /// Header value.
    pub value: String,
}

impl Header {
    /// Creates a new header.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Connection configuration for a request client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: Option<String>,
    headers: Vec<Header>,
    auth_token: Option<String>,
    timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            headers: Vec::new(),
            auth_token: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ClientConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the configured base URL, if any.
    #[must_use]
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Returns the default headers in insertion order.
    #[must_use]
    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    /// Returns the configured bearer token, if any.
    #[must_use]
    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    /// Returns the per-request timeout in milliseconds.
    #[must_use]
    pub const fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Sets or replaces the base URL.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidConfiguration` when the URL does not
    /// parse as an absolute URL. Prior configuration is left unchanged.
    pub fn set_base_url(&mut self, url: &str) -> DomainResult<()> {
        Url::parse(url).map_err(|e| {
            DomainError::InvalidConfiguration(format!("invalid base URL '{url}': {e}"))
        })?;
        self.base_url = Some(url.to_string());
        Ok(())
    }

    /// Adds or overwrites a default header. Duplicate names (compared
    /// case-insensitively, per HTTP semantics) overwrite in place, so the
    /// first-insertion order is preserved.
    pub fn set_header(&mut self, name: &str, value: &str) {
        if let Some(existing) = self
            .headers
            .iter_mut()
            .find(|h| h.name.eq_ignore_ascii_case(name))
        {
            existing.value = value.to_string();
        } else {
            self.headers.push(Header::new(name, value));
        }
    }

    /// Records a bearer token. Equivalent to setting the `Authorization`
    /// header to `Bearer <token>`.
    pub fn set_auth_token(&mut self, token: &str) {
        self.auth_token = Some(token.to_string());
        self.set_header("Authorization", &format!("Bearer {token}"));
    }

    /// Removes every default header, including any recorded bearer token.
    pub fn clear_headers(&mut self) {
        self.headers.clear();
        self.auth_token = None;
    }

    /// Sets the per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidConfiguration` when `millis` is not a
    /// positive integer. Prior configuration is left unchanged.
    pub fn set_timeout(&mut self, millis: i64) -> DomainResult<()> {
        match u64::try_from(millis) {
            Ok(ms) if ms > 0 => {
                self.timeout_ms = ms;
                Ok(())
            }
            _ => Err(DomainError::InvalidConfiguration(format!(
                "timeout must be a positive number of milliseconds, got {millis}"
            ))),
        }
    }

    /// Resolves an endpoint against the base URL.
    ///
    /// Exactly one `/` separates the base and the endpoint: the endpoint's
    /// leading slash is stripped when the base already ends with one, and a
    /// slash is inserted when neither side carries one. Without a base URL
    /// the endpoint is used verbatim.
    #[must_use]
    pub fn resolve_url(&self, endpoint: &str) -> String {
        match &self.base_url {
            None => endpoint.to_string(),
            Some(base) => {
                if base.ends_with('/') {
                    format!("{base}{}", endpoint.trim_start_matches('/'))
                } else if endpoint.starts_with('/') {
                    format!("{base}{endpoint}")
                } else {
                    format!("{base}/{endpoint}")
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_timeout() {
        let config = ClientConfig::new();
        assert_eq!(config.timeout_ms(), 30_000);
        assert_eq!(config.base_url(), None);
        assert!(config.headers().is_empty());
    }

    #[test]
    fn test_set_timeout_rejects_non_positive() {
        let mut config = ClientConfig::new();
        config.set_timeout(5_000).unwrap();

        for bad in [0, -1, -5_000] {
            let result = config.set_timeout(bad);
            assert!(matches!(
                result,
                Err(DomainError::InvalidConfiguration(_))
            ));
            // Prior configuration is untouched.
            assert_eq!(config.timeout_ms(), 5_000);
        }
    }

    #[test]
    fn test_set_base_url_validates() {
        let mut config = ClientConfig::new();
        assert!(config.set_base_url("not a url").is_err());
        assert_eq!(config.base_url(), None);

        config.set_base_url("https://api.example.com").unwrap();
        assert_eq!(config.base_url(), Some("https://api.example.com"));
    }

    #[test]
    fn test_header_upsert_preserves_order() {
        let mut config = ClientConfig::new();
        config.set_header("Accept", "application/json");
        config.set_header("X-Trace", "abc");
        config.set_header("accept", "text/plain");

        assert_eq!(config.headers().len(), 2);
        assert_eq!(config.headers()[0].name, "Accept");
        assert_eq!(config.headers()[0].value, "text/plain");
        assert_eq!(config.headers()[1].name, "X-Trace");
    }

    #[test]
    fn test_auth_token_sets_bearer_header() {
        let mut config = ClientConfig::new();
        config.set_auth_token("t0k3n");

        assert_eq!(config.auth_token(), Some("t0k3n"));
        assert_eq!(config.headers()[0].name, "Authorization");
        assert_eq!(config.headers()[0].value, "Bearer t0k3n");

        // A later explicit header overwrites the token's header, and a later
        // token overwrites an explicit header.
        config.set_header("Authorization", "Basic xyz");
        assert_eq!(config.headers()[0].value, "Basic xyz");
        config.set_auth_token("fresh");
        assert_eq!(config.headers()[0].value, "Bearer fresh");
    }

    #[test]
    fn test_clear_headers() {
        let mut config = ClientConfig::new();
        config.set_auth_token("t0k3n");
        config.set_header("Accept", "application/json");

        config.clear_headers();
        assert!(config.headers().is_empty());
        assert_eq!(config.auth_token(), None);
    }

    #[test]
    fn test_resolve_url_without_base() {
        let config = ClientConfig::new();
        assert_eq!(config.resolve_url("/users"), "/users");
        assert_eq!(
            config.resolve_url("https://other.example.com/users"),
            "https://other.example.com/users"
        );
    }

    #[test]
    fn test_resolve_url_single_separator() {
        // Exactly one slash between base and endpoint, whatever each carries.
        for base in ["https://api.example.com/v1", "https://api.example.com/v1/"] {
            for endpoint in ["users", "/users"] {
                let mut config = ClientConfig::new();
                config.set_base_url(base).unwrap();
                assert_eq!(
                    config.resolve_url(endpoint),
                    "https://api.example.com/v1/users",
                    "base={base} endpoint={endpoint}"
                );
            }
        }
    }
}
