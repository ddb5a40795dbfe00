//! Scenario lifecycle and reporting types
//!
//! A scenario walks a fixed state chain and ends in exactly one report.
//! Verification mismatches accumulate as [`AssertionOutcome`] records on
//! the report; they are a separate channel from programming errors, which
//! abort the offending step instead.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle states of one scenario, in order.
///
/// Transitions never skip a state and never move backward; `Completed` is
/// terminal and triggers teardown exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioState {
    /// The session exists but no step has run.
    Created,
    /// Connection settings are being applied.
    Configuring,
    /// Requests are being sent.
    Executing,
    /// Responses are being verified.
    Verifying,
    /// The scenario is finished and its resources released.
    Completed,
}

impl ScenarioState {
    /// Returns the state that follows this one, or `None` for `Completed`.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Created => Some(Self::Configuring),
            Self::Configuring => Some(Self::Executing),
            Self::Executing => Some(Self::Verifying),
            Self::Verifying => Some(Self::Completed),
            Self::Completed => None,
        }
    }

    /// Returns the state as a static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Configuring => "configuring",
            Self::Executing => "executing",
            Self::Verifying => "verifying",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for ScenarioState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of running a single verification against a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionOutcome {
    /// What was checked.
    pub description: String,
    /// Whether the check passed.
    pub passed: bool,
    /// Actual value found, for display.
    pub actual: Option<String>,
    /// Failure message when the check did not pass.
    pub message: Option<String>,
}

impl AssertionOutcome {
    /// Creates a passed outcome.
    #[must_use]
    pub fn pass(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            passed: true,
            actual: None,
            message: None,
        }
    }

    /// Creates a passed outcome recording the observed value.
    #[must_use]
    pub fn pass_with_value(description: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            passed: true,
            actual: Some(actual.into()),
            message: None,
        }
    }

    /// Creates a failed outcome.
    #[must_use]
    pub fn fail(description: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            passed: false,
            actual: None,
            message: Some(message.into()),
        }
    }

    /// Creates a failed outcome recording the observed value.
    #[must_use]
    pub fn fail_with_value(
        description: impl Into<String>,
        actual: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            passed: false,
            actual: Some(actual.into()),
            message: Some(message.into()),
        }
    }
}

/// The recorded outcome of one finished scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioReport {
    /// Unique id of this scenario run.
    pub id: Uuid,
    /// The scenario's identifying title.
    pub title: String,
    /// True iff no assertion failed and no step errored.
    pub passed: bool,
    /// The failure message, when the scenario did not pass.
    pub failure: Option<String>,
    /// Every verification the scenario ran, in order.
    pub checks: Vec<AssertionOutcome>,
    /// Wall-clock time from session start to teardown.
    #[serde(with = "duration_millis")]
    pub duration: Duration,
    /// When the scenario finished.
    pub finished_at: DateTime<Utc>,
}

/// Aggregate counts over a set of scenario reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Scenarios run.
    pub total: usize,
    /// Scenarios that passed.
    pub passed: usize,
    /// Scenarios that failed.
    pub failed: usize,
}

impl RunSummary {
    /// Folds one scenario outcome into the summary.
    pub const fn record(&mut self, passed: bool) {
        self.total += 1;
        if passed {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
    }

    /// True iff no scenario failed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    #[allow(clippy::cast_possible_truncation)]
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
