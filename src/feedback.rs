//! Execution feedback state machine.
//!
//! Interprets inbound `test_results` messages into the one view the UI may
//! render. Every inbound message fully replaces whatever is displayed
//! (last-write-wins — no queue, no merge), and each replacement resets the
//! selected case of a run-mode view back to index 0.
//!
//! Guarantees:
//! - A submit-mode run is summary-only *by construction*: `SubmitSummary`
//!   has no field that could carry per-case data.
//! - A cooldown message never retains case data, even when the payload also
//!   carries `results`.
//! - `selected` is always a valid index into `cases` while in `RunDetail`.

use crate::messages::{ExecutionMode, TestCaseResult, TestResultsData, TestSummary};

/// Shown while the server-enforced rate limit is active and no error text
/// came with the message.
pub const COOLDOWN_NOTICE: &str = "Please wait a moment before running code again.";
/// Shown when a results message carried no usable case data.
pub const UNAVAILABLE_NOTICE: &str = "Test results are unavailable.";

/// The one authoritative execution-feedback view.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FeedbackState {
    /// Nothing to show. Entered initially, on panel close, and on reset.
    #[default]
    Idle,
    /// A results message arrived but carried no cases. An Idle display
    /// variant with a notice.
    Unavailable { notice: String },
    /// The remote side reported a failure with no case data. An Idle display
    /// variant with the error text, shown verbatim and never auto-retried.
    Error { message: String },
    /// Server-enforced rate limit. Not an error.
    Cooldown { message: String },
    /// Run mode: per-case detail with one selectable case.
    RunDetail {
        cases: Vec<TestCaseResult>,
        summary: TestSummary,
        selected: usize,
    },
    /// Submit mode: aggregate-only. Per-case data is structurally absent.
    SubmitSummary { summary: TestSummary, passed: bool },
}

impl FeedbackState {
    /// Short name for logging and replay summaries.
    pub fn name(&self) -> &'static str {
        match self {
            FeedbackState::Idle => "idle",
            FeedbackState::Unavailable { .. } => "unavailable",
            FeedbackState::Error { .. } => "error",
            FeedbackState::Cooldown { .. } => "cooldown",
            FeedbackState::RunDetail { .. } => "run_detail",
            FeedbackState::SubmitSummary { .. } => "submit_summary",
        }
    }
}

/// Reducer over inbound `test_results` messages plus the two local actions
/// (close panel, select case).
#[derive(Debug, Default)]
pub struct FeedbackStore {
    state: FeedbackState,
}

impl FeedbackStore {
    pub fn new() -> Self {
        FeedbackStore::default()
    }

    pub fn state(&self) -> &FeedbackState {
        &self.state
    }

    pub fn is_cooldown(&self) -> bool {
        matches!(self.state, FeedbackState::Cooldown { .. })
    }

    /// Apply one inbound `test_results` message, replacing the current view.
    ///
    /// Precedence: cooldown, then remote error, then submit summary, then
    /// run detail; a run-mode message without cases degrades to an
    /// unavailable notice. A submit verdict is still rendered when the
    /// runner sent no case data — `success` is the authoritative pass/fail
    /// flag in that case.
    pub fn apply(&mut self, data: TestResultsData) {
        if data.cooldown {
            let message = data.error.unwrap_or_else(|| COOLDOWN_NOTICE.to_string());
            self.state = FeedbackState::Cooldown { message };
            return;
        }

        if !data.success && data.results.is_none() {
            if let Some(message) = data.error {
                self.state = FeedbackState::Error { message };
                return;
            }
        }

        let mode = data.mode.unwrap_or(ExecutionMode::Run);
        if mode == ExecutionMode::Submit {
            let (summary, passed) = match data.results {
                Some(body) if body.summary.total > 0 => {
                    let passed = body.summary.passed == body.summary.total;
                    (body.summary, passed)
                }
                Some(body) => (body.summary, data.success),
                None => (TestSummary::default(), data.success),
            };
            self.state = FeedbackState::SubmitSummary { summary, passed };
            return;
        }

        match data.results {
            Some(body) if !body.test_results.is_empty() => {
                self.state = FeedbackState::RunDetail {
                    cases: body.test_results,
                    summary: body.summary,
                    selected: 0,
                };
            }
            _ => {
                self.state = FeedbackState::Unavailable {
                    notice: UNAVAILABLE_NOTICE.to_string(),
                };
            }
        }
    }

    /// Focus a case in a run-detail view, clamped to the valid range.
    /// No-op in every other state.
    pub fn select_case(&mut self, index: usize) {
        if let FeedbackState::RunDetail { cases, selected, .. } = &mut self.state {
            *selected = index.min(cases.len().saturating_sub(1));
        }
    }

    /// Local panel close. Does not wait for the server; the next inbound
    /// message supersedes Idle regardless of how it was entered.
    pub fn close(&mut self) {
        self.state = FeedbackState::Idle;
    }

    /// Back to Idle, as on disconnect.
    pub fn reset(&mut self) {
        self.state = FeedbackState::Idle;
    }

    /// Pass/fail banner text, e.g. `"1/2 Passed"`, or the pass verdict of a
    /// submit run. None for states without a summary.
    pub fn banner(&self) -> Option<String> {
        match &self.state {
            FeedbackState::RunDetail { summary, .. } => {
                Some(format!("{}/{} Passed", summary.passed, summary.total))
            }
            FeedbackState::SubmitSummary { summary, passed } => {
                if *passed {
                    Some(format!("All {} tests passed", summary.total))
                } else {
                    Some("Submission failed".to_string())
                }
            }
            _ => None,
        }
    }
}
