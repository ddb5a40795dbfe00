//! Per-scenario session

use std::mem;
use std::time::Instant;

use chrono::Utc;
use serde::de::DeserializeOwned;
use tracing::{Span, debug, error, info, info_span, warn};
use uuid::Uuid;
use verity_domain::{
    ApiResponse, AssertionOutcome, HttpMethod, JsonExtractor, RequestBody, ScenarioReport,
    ScenarioState,
};

use crate::error::{ApplicationError, ApplicationResult};
use crate::handler::ResponseHandler;
use crate::ports::ApiClient;

/// One scenario's isolated execution context.
///
/// Holds a fresh client/handler/extractor triple bound to a logging span
/// carrying the scenario's title. Nothing is shared across scenarios, so
/// concurrently running scenarios need no locking.
///
/// Step operations enforce the lifecycle ordering
/// `Created → Configuring → Executing → Verifying → Completed`: the
/// session advances one state at a time as steps of each kind arrive, and a
/// step belonging to an earlier phase than the current one is a
/// [`Lifecycle`](ApplicationError::Lifecycle) contract error.
pub struct ScenarioSession<C: ApiClient> {
    id: Uuid,
    title: String,
    client: C,
    handler: ResponseHandler,
    extractor: JsonExtractor,
    state: ScenarioState,
    last_response: Option<ApiResponse>,
    checks: Vec<AssertionOutcome>,
    step_failure: Option<String>,
    span: Span,
    started: Instant,
}

impl<C: ApiClient> ScenarioSession<C> {
    /// Creates a session for one scenario, taking ownership of its client.
    #[must_use]
    pub fn new(title: impl Into<String>, client: C) -> Self {
        let title = title.into();
        let id = Uuid::now_v7();
        let span = info_span!("scenario", title = %title, id = %id);
        span.in_scope(|| info!("starting scenario"));
        Self {
            id,
            title,
            client,
            handler: ResponseHandler::new(),
            extractor: JsonExtractor::new(),
            state: ScenarioState::Created,
            last_response: None,
            checks: Vec::new(),
            step_failure: None,
            span,
            started: Instant::now(),
        }
    }

    /// The unique id of this scenario run.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// The scenario's identifying title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> ScenarioState {
        self.state
    }

    /// The logging span scoped to this scenario.
    #[must_use]
    pub const fn span(&self) -> &Span {
        &self.span
    }

    /// The session's extractor, for raw-text extraction in step bindings.
    #[must_use]
    pub const fn extractor(&self) -> &JsonExtractor {
        &self.extractor
    }

    /// The last response observed, if any request has been sent.
    #[must_use]
    pub const fn last_response(&self) -> Option<&ApiResponse> {
        self.last_response.as_ref()
    }

    /// True iff no assertion failed and no step errored so far.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.step_failure.is_none() && self.checks.iter().all(|c| c.passed)
    }

    /// Sets or replaces the base URL.
    ///
    /// # Errors
    ///
    /// Lifecycle violations and malformed URLs.
    pub fn set_base_url(&mut self, url: &str) -> ApplicationResult<()> {
        self.advance(ScenarioState::Configuring)?;
        self.client.set_base_url(url)
    }

    /// Adds or overwrites a default header.
    ///
    /// # Errors
    ///
    /// Lifecycle violations.
    pub fn add_header(&mut self, name: &str, value: &str) -> ApplicationResult<()> {
        self.advance(ScenarioState::Configuring)?;
        self.client.add_header(name, value);
        Ok(())
    }

    /// Records a bearer token for the `Authorization` header.
    ///
    /// # Errors
    ///
    /// Lifecycle violations.
    pub fn add_authentication(&mut self, token: &str) -> ApplicationResult<()> {
        self.advance(ScenarioState::Configuring)?;
        self.client.add_authentication(token);
        Ok(())
    }

    /// Removes every default header, including any recorded bearer token.
    ///
    /// # Errors
    ///
    /// Lifecycle violations.
    pub fn clear_headers(&mut self) -> ApplicationResult<()> {
        self.advance(ScenarioState::Configuring)?;
        self.client.clear_headers();
        Ok(())
    }

    /// Sets the per-request timeout in milliseconds.
    ///
    /// # Errors
    ///
    /// Lifecycle violations and non-positive timeouts.
    pub fn set_timeout(&mut self, millis: i64) -> ApplicationResult<()> {
        self.advance(ScenarioState::Configuring)?;
        self.client.set_timeout(millis)
    }

    /// Sends a request and retains its response for later verification.
    ///
    /// # Errors
    ///
    /// Lifecycle violations and the client's contract errors; HTTP and
    /// network failures are captured in the returned response instead.
    pub async fn send(
        &mut self,
        method: HttpMethod,
        endpoint: &str,
        body: RequestBody,
    ) -> ApplicationResult<&ApiResponse> {
        self.advance(ScenarioState::Executing)?;
        let response = self.client.execute(method, endpoint, body).await?;
        Ok(self.last_response.insert(response))
    }

    /// Sends a GET request.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn get(&mut self, endpoint: &str) -> ApplicationResult<&ApiResponse> {
        self.send(HttpMethod::Get, endpoint, RequestBody::None).await
    }

    /// Sends a POST request.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn post(
        &mut self,
        endpoint: &str,
        body: RequestBody,
    ) -> ApplicationResult<&ApiResponse> {
        self.send(HttpMethod::Post, endpoint, body).await
    }

    /// Sends a PUT request.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn put(
        &mut self,
        endpoint: &str,
        body: RequestBody,
    ) -> ApplicationResult<&ApiResponse> {
        self.send(HttpMethod::Put, endpoint, body).await
    }

    /// Sends a DELETE request.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn delete(&mut self, endpoint: &str) -> ApplicationResult<&ApiResponse> {
        self.send(HttpMethod::Delete, endpoint, RequestBody::None)
            .await
    }

    /// Checks the retained response's status code and records the outcome.
    ///
    /// # Errors
    ///
    /// Lifecycle violations and [`NoResponse`](ApplicationError::NoResponse).
    pub fn verify_status_code(&mut self, expected: u16) -> ApplicationResult<AssertionOutcome> {
        self.advance(ScenarioState::Verifying)?;
        let outcome = {
            let response = self.response()?;
            self.handler.verify_status_code(response, expected)
        };
        Ok(self.record(outcome))
    }

    /// Checks that the retained response succeeded and records the outcome.
    ///
    /// # Errors
    ///
    /// Lifecycle violations and [`NoResponse`](ApplicationError::NoResponse).
    pub fn verify_successful(&mut self) -> ApplicationResult<AssertionOutcome> {
        self.advance(ScenarioState::Verifying)?;
        let outcome = {
            let response = self.response()?;
            self.handler.verify_successful(response)
        };
        Ok(self.record(outcome))
    }

    /// Checks that the retained response body contains a substring and
    /// records the outcome.
    ///
    /// # Errors
    ///
    /// Lifecycle violations and [`NoResponse`](ApplicationError::NoResponse).
    pub fn verify_contains(&mut self, expected: &str) -> ApplicationResult<AssertionOutcome> {
        self.advance(ScenarioState::Verifying)?;
        let outcome = {
            let response = self.response()?;
            self.handler.verify_contains(response, expected)
        };
        Ok(self.record(outcome))
    }

    /// Extracts a typed value from the retained response body.
    ///
    /// # Errors
    ///
    /// Lifecycle violations, [`NoResponse`](ApplicationError::NoResponse),
    /// and the handler's extraction failures.
    pub fn extract<T: DeserializeOwned>(&mut self, path: &str) -> ApplicationResult<T> {
        self.advance(ScenarioState::Verifying)?;
        let response = self.response()?;
        self.handler.extract(response, path)
    }

    /// Deserializes the retained response body into `T`.
    ///
    /// # Errors
    ///
    /// Lifecycle violations, [`NoResponse`](ApplicationError::NoResponse),
    /// and the handler's deserialization failures.
    pub fn deserialize<T: DeserializeOwned>(&mut self) -> ApplicationResult<T> {
        self.advance(ScenarioState::Verifying)?;
        let response = self.response()?;
        self.handler.deserialize(response)
    }

    /// Returns the retained response's raw body text.
    ///
    /// # Errors
    ///
    /// [`NoResponse`](ApplicationError::NoResponse).
    pub fn content(&self) -> ApplicationResult<&str> {
        Ok(self.handler.content(self.response()?))
    }

    /// Finishes the scenario: logs the structured pass/fail line, releases
    /// the client's transport, and produces the report. Runs exactly once —
    /// the session is consumed.
    #[must_use]
    pub fn finish(mut self) -> ScenarioReport {
        let duration = self.started.elapsed();
        let passed = self.passed();
        let failure = self.step_failure.take().or_else(|| {
            self.checks
                .iter()
                .find(|c| !c.passed)
                .and_then(|c| c.message.clone())
        });

        self.span.in_scope(|| {
            if passed {
                info!(checks = self.checks.len(), "scenario passed");
            } else {
                error!(
                    failure = failure.as_deref().unwrap_or("assertion failed"),
                    "scenario failed"
                );
            }
        });

        self.client.dispose();
        self.state = ScenarioState::Completed;

        ScenarioReport {
            id: self.id,
            title: mem::take(&mut self.title),
            passed,
            failure,
            checks: mem::take(&mut self.checks),
            duration,
            finished_at: Utc::now(),
        }
    }

    pub(crate) fn record_step_error(&mut self, error: &ApplicationError) {
        self.span
            .in_scope(|| error!(error = %error, "scenario step failed"));
        self.step_failure = Some(error.to_string());
    }

    fn response(&self) -> ApplicationResult<&ApiResponse> {
        self.last_response
            .as_ref()
            .ok_or(ApplicationError::NoResponse)
    }

    fn record(&mut self, outcome: AssertionOutcome) -> AssertionOutcome {
        self.checks.push(outcome.clone());
        outcome
    }

    fn advance(&mut self, target: ScenarioState) -> ApplicationResult<()> {
        if self.state == target {
            return Ok(());
        }
        if target < self.state {
            return Err(ApplicationError::Lifecycle {
                from: self.state,
                to: target,
            });
        }
        while self.state < target {
            match self.state.next() {
                Some(next) => {
                    self.span
                        .in_scope(|| debug!(from = %self.state, to = %next, "scenario state"));
                    self.state = next;
                }
                None => {
                    return Err(ApplicationError::Lifecycle {
                        from: self.state,
                        to: target,
                    });
                }
            }
        }
        Ok(())
    }
}

// Teardown must run even when a scenario is abandoned partway; release is
// idempotent, so a completed session's drop is a no-op.
impl<C: ApiClient> Drop for ScenarioSession<C> {
    fn drop(&mut self) {
        if self.state != ScenarioState::Completed {
            self.span
                .in_scope(|| warn!("session dropped before finish; releasing client"));
            self.client.dispose();
        }
    }
}
