//! HTTP client implementation using reqwest.
//!
//! This adapter implements the `ApiClient` port. Connection-level settings
//! live in a [`ClientConfig`]; mutating the base URL or timeout invalidates
//! the underlying `reqwest::Client`, which is rebuilt lazily on the next
//! request, so at most one transport instance is ever alive per client.
//! Header and auth mutations touch only the configuration and apply to the
//! existing transport.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Method};
use tracing::{debug, error, info};
use url::Url;
use verity_application::ports::ApiClient;
use verity_application::{ApplicationError, ApplicationResult};
use verity_domain::{
    ApiResponse, ClientConfig, DomainError, HttpMethod, RequestBody, TransportError,
};

/// reqwest-backed request client, built fresh for each scenario.
#[derive(Debug, Default)]
pub struct RestClient {
    config: ClientConfig,
    transport: Option<Client>,
}

impl RestClient {
    /// Creates a client with default configuration and no live transport.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: ClientConfig::new(),
            transport: None,
        }
    }

    /// Returns the live transport, building one from the current
    /// configuration when none exists.
    fn transport(&mut self) -> ApplicationResult<&Client> {
        if self.transport.is_none() {
            let client = Client::builder()
                .user_agent(concat!("Verity/", env!("CARGO_PKG_VERSION")))
                .timeout(Duration::from_millis(self.config.timeout_ms()))
                .build()
                .map_err(|e| {
                    ApplicationError::Internal(format!("failed to build HTTP transport: {e}"))
                })?;
            debug!(timeout_ms = self.config.timeout_ms(), "built HTTP transport");
            self.transport = Some(client);
        }
        self.transport
            .as_ref()
            .ok_or_else(|| ApplicationError::Internal("transport unavailable".to_string()))
    }

    /// Drops the live transport; the next request rebuilds it.
    fn invalidate_transport(&mut self) {
        if self.transport.take().is_some() {
            debug!("transport invalidated; rebuilding on next request");
        }
    }

    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Maps reqwest errors to the captured transport failure taxonomy.
    fn map_transport_error(error: &reqwest::Error, timeout_ms: u64) -> TransportError {
        let host = error
            .url()
            .and_then(Url::host_str)
            .unwrap_or("unknown")
            .to_string();

        if error.is_timeout() {
            return TransportError::Timeout { timeout_ms };
        }

        if error.is_connect() {
            let message = error.to_string();
            let lowered = message.to_lowercase();
            if lowered.contains("dns") || lowered.contains("resolve") {
                return TransportError::Dns { host, message };
            }
            if lowered.contains("refused") {
                return TransportError::ConnectionRefused {
                    host,
                    port: error.url().and_then(Url::port_or_known_default).unwrap_or(80),
                };
            }
            return TransportError::Connect(message);
        }

        TransportError::Other(error.to_string())
    }
}

#[async_trait]
impl ApiClient for RestClient {
    fn set_base_url(&mut self, url: &str) -> ApplicationResult<()> {
        info!(url, "setting base URL");
        self.config.set_base_url(url)?;
        self.invalidate_transport();
        Ok(())
    }

    fn add_header(&mut self, name: &str, value: &str) {
        debug!(name, value, "adding default header");
        self.config.set_header(name, value);
    }

    fn add_authentication(&mut self, token: &str) {
        debug!("adding bearer authentication");
        self.config.set_auth_token(token);
    }

    fn clear_headers(&mut self) {
        debug!("clearing default headers");
        self.config.clear_headers();
    }

    fn set_timeout(&mut self, millis: i64) -> ApplicationResult<()> {
        debug!(millis, "setting timeout");
        self.config.set_timeout(millis)?;
        self.invalidate_transport();
        Ok(())
    }

    async fn execute(
        &mut self,
        method: HttpMethod,
        endpoint: &str,
        body: RequestBody,
    ) -> ApplicationResult<ApiResponse> {
        let url = self.config.resolve_url(endpoint);
        let parsed =
            Url::parse(&url).map_err(|e| DomainError::InvalidUrl(format!("{e}: {url}")))?;
        let payload = body.to_payload()?;

        match payload.as_deref() {
            Some(p) => debug!(method = %method, url = %url, body = p, "sending request"),
            None => debug!(method = %method, url = %url, "sending request"),
        }

        let timeout_ms = self.config.timeout_ms();
        let headers = self.config.headers().to_vec();
        let transport = self.transport()?;

        let mut builder = transport.request(Self::to_reqwest_method(method), parsed);
        for header in &headers {
            builder = builder.header(header.name.as_str(), header.value.as_str());
        }
        if let Some(p) = payload {
            let has_content_type = headers
                .iter()
                .any(|h| h.name.eq_ignore_ascii_case("content-type"));
            if !has_content_type {
                builder = builder.header("Content-Type", "application/json");
            }
            builder = builder.body(p);
        }

        let start = Instant::now();
        match builder.send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                match response.text().await {
                    Ok(text) => {
                        let response = ApiResponse::new(status, text, start.elapsed());
                        if response.is_success() {
                            info!(status, "response received");
                        } else {
                            error!(status, "response received");
                        }
                        if !response.body.is_empty() {
                            debug!(body = %response.body, "response body");
                        }
                        Ok(response)
                    }
                    Err(e) => {
                        let failure =
                            TransportError::Other(format!("failed to read response body: {e}"));
                        error!(method = %method, url = %url, error = %failure, "request failed");
                        Ok(ApiResponse::from_transport_error(failure, start.elapsed()))
                    }
                }
            }
            Err(e) => {
                let failure = Self::map_transport_error(&e, timeout_ms);
                error!(method = %method, url = %url, error = %failure, "request failed");
                Ok(ApiResponse::from_transport_error(failure, start.elapsed()))
            }
        }
    }

    fn dispose(&mut self) {
        if self.transport.take().is_some() {
            debug!("transport released");
        }
    }
}

impl Drop for RestClient {
    fn drop(&mut self) {
        self.dispose();
    }
}
