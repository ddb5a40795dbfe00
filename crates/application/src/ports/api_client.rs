//! API client port

use async_trait::async_trait;
use verity_domain::{ApiResponse, HttpMethod, RequestBody};

use crate::ApplicationResult;

/// Port for the HTTP client a scenario drives.
///
/// This trait abstracts the transport, allowing the scenario lifecycle to
/// be exercised against an in-memory double as well as a real HTTP stack.
///
/// `execute` returns `Ok` for every HTTP-level and network-level outcome —
/// 4xx/5xx statuses and transport failures are captured in the returned
/// [`ApiResponse`]. Only programming-contract violations (an unresolvable
/// URL, broken configuration) are errors.
#[async_trait]
pub trait ApiClient: Send {
    /// Sets or replaces the base URL subsequent endpoints resolve against.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL is malformed; prior configuration is
    /// left unchanged.
    fn set_base_url(&mut self, url: &str) -> ApplicationResult<()>;

    /// Adds or overwrites a default header sent with every subsequent
    /// request.
    fn add_header(&mut self, name: &str, value: &str);

    /// Records a bearer token; equivalent to setting the `Authorization`
    /// header to `Bearer <token>`.
    fn add_authentication(&mut self, token: &str);

    /// Removes every default header, including any recorded bearer token.
    fn clear_headers(&mut self);

    /// Sets the per-request timeout in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns an error when `millis` is not positive; prior configuration
    /// is left unchanged.
    fn set_timeout(&mut self, millis: i64) -> ApplicationResult<()>;

    /// Executes a request and returns its settled outcome.
    ///
    /// # Errors
    ///
    /// Only contract violations; never HTTP or network failures.
    async fn execute(
        &mut self,
        method: HttpMethod,
        endpoint: &str,
        body: RequestBody,
    ) -> ApplicationResult<ApiResponse>;

    /// Sends a GET request.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    async fn get(&mut self, endpoint: &str) -> ApplicationResult<ApiResponse> {
        self.execute(HttpMethod::Get, endpoint, RequestBody::None)
            .await
    }

    /// Sends a POST request with the given body.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    async fn post(&mut self, endpoint: &str, body: RequestBody) -> ApplicationResult<ApiResponse> {
        self.execute(HttpMethod::Post, endpoint, body).await
    }

    /// Sends a PUT request with the given body.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    async fn put(&mut self, endpoint: &str, body: RequestBody) -> ApplicationResult<ApiResponse> {
        self.execute(HttpMethod::Put, endpoint, body).await
    }

    /// Sends a DELETE request.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    async fn delete(&mut self, endpoint: &str) -> ApplicationResult<ApiResponse> {
        self.execute(HttpMethod::Delete, endpoint, RequestBody::None)
            .await
    }

    /// Releases the underlying transport. Safe to call multiple times.
    fn dispose(&mut self);
}
