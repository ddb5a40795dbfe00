//! Scenario runner

use tracing::{Instrument, info};
use verity_domain::{RunSummary, ScenarioReport};

use crate::error::ApplicationResult;
use crate::ports::ApiClient;
use crate::scenario::ScenarioSession;

/// Drives scenarios one at a time, each against a freshly built session.
///
/// The runner owns a client factory rather than a client: every call to
/// [`run`](Self::run) constructs a new client/handler/extractor bundle by
/// explicit construction and passes it into the steps, so no state survives
/// from one scenario to the next. Teardown is guaranteed — the session is
/// finished whether the steps succeed, fail an assertion, or error out —
/// and one scenario's failure never aborts the run.
pub struct ScenarioRunner<F> {
    build_client: F,
    reports: Vec<ScenarioReport>,
}

impl<F> ScenarioRunner<F> {
    /// Creates a runner around a client factory.
    pub const fn new(build_client: F) -> Self {
        Self {
            build_client,
            reports: Vec::new(),
        }
    }

    /// Runs one scenario: builds a fresh session, executes `steps` inside
    /// the scenario's logging span, records the outcome, and finishes the
    /// session regardless of how the steps ended.
    ///
    /// A step error marks the scenario failed; it is not propagated, so the
    /// caller can go straight on to the next scenario.
    pub async fn run<C, S>(&mut self, title: &str, steps: S) -> ScenarioReport
    where
        C: ApiClient,
        F: FnMut() -> C,
        S: AsyncFnOnce(&mut ScenarioSession<C>) -> ApplicationResult<()>,
    {
        let mut session = ScenarioSession::new(title, (self.build_client)());
        let span = session.span().clone();

        let outcome = steps(&mut session).instrument(span).await;
        if let Err(error) = outcome {
            session.record_step_error(&error);
        }

        let report = session.finish();
        self.reports.push(report.clone());
        report
    }

    /// Every report recorded so far, in run order.
    #[must_use]
    pub fn reports(&self) -> &[ScenarioReport] {
        &self.reports
    }

    /// Aggregates the recorded reports.
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        self.reports
            .iter()
            .fold(RunSummary::default(), |mut acc, report| {
                acc.record(report.passed);
                acc
            })
    }

    /// Consumes the runner, logging and returning the final summary.
    #[must_use]
    pub fn into_summary(self) -> RunSummary {
        let summary = self.summary();
        info!(
            total = summary.total,
            passed = summary.passed,
            failed = summary.failed,
            "scenario run completed"
        );
        summary
    }
}
