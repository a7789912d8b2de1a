//! Wire payload types for the interview room data channel.
//!
//! Every message on the channel is a UTF-8 JSON object tagged with a topic
//! string. Inbound dispatch is keyed by the pair `(topic, payload.type)`,
//! except for `transcription` (and outbound `code`) which are keyed by topic
//! alone. `Inbound` is the closed union of everything this client consumes;
//! anything it does not recognize collapses into `Inbound::Unknown`, which is
//! the designed extension point for future message kinds — a no-op, never an
//! error.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Topics
// ---------------------------------------------------------------------------

/// Spoken/typed utterances from the remote side.
pub const TOPIC_TRANSCRIPTION: &str = "transcription";
/// Problem statement and starter code pushed by the remote agent.
pub const TOPIC_QUESTION_DATA: &str = "question-data";
/// Execution/test feedback for run and submit requests.
pub const TOPIC_TEST_RESULTS: &str = "test-results";
/// Periodic time-remaining broadcasts.
pub const TOPIC_INTERVIEW_TIME: &str = "interview-time";
/// Outbound editor mirroring and run/submit requests.
pub const TOPIC_CODE: &str = "code";

// ---------------------------------------------------------------------------
// Inbound payloads
// ---------------------------------------------------------------------------

/// One utterance on the `transcription` topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionPayload {
    pub text: String,
    /// Sender-side epoch millis. Absent on older senders; arrival time is
    /// used instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

/// The `data` object of a `question_data` message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionData {
    pub description: String,
    #[serde(default)]
    pub skeleton_code: String,
}

/// Run mode executes the visible subset of test cases; submit mode executes
/// the full suite and reports only an aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    Run,
    Submit,
}

/// One executed test case, as reported by the remote runner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestCaseResult {
    /// Positional inputs passed to the candidate's function. Kept as raw
    /// JSON values — the runner sends whatever the question defines.
    #[serde(default)]
    pub input: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<serde_json::Value>,
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elapsed_seconds: Option<f64>,
}

/// Aggregate counts for one test run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestSummary {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub passed: u32,
    #[serde(default)]
    pub failed: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_time: Option<f64>,
}

/// The `results` object inside a `test_results` message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestResultsBody {
    #[serde(default)]
    pub test_results: Vec<TestCaseResult>,
    #[serde(default)]
    pub summary: TestSummary,
}

/// The `data` object of a `test_results` message. A full replacement value —
/// never merged with a previously displayed run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestResultsData {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<ExecutionMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<TestResultsBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub cooldown: bool,
}

/// `timeLeft` arrives either as a pre-formatted `"HH:MM:SS"` string or a raw
/// seconds count, depending on sender version. Both are accepted and
/// normalized to seconds in the timer store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeLeft {
    Seconds(i64),
    Formatted(String),
}

/// Payload on the `interview-time` topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerPayload {
    #[serde(rename = "timeLeft")]
    pub time_left: TimeLeft,
}

// ---------------------------------------------------------------------------
// Inbound classification
// ---------------------------------------------------------------------------

/// Closed union of inbound messages, keyed by `(topic, payload.type)`.
#[derive(Debug, Clone)]
pub enum Inbound {
    Transcription(TranscriptionPayload),
    QuestionData(QuestionData),
    TestResults(TestResultsData),
    Timer(TimerPayload),
    /// Unrecognized `(topic, type)` pair. Routed nowhere, by design.
    Unknown {
        topic: String,
        msg_type: Option<String>,
    },
}

impl Inbound {
    /// Classify an already-parsed payload for `topic`.
    ///
    /// Returns `Err` only when a *recognized* message fails to match its
    /// declared shape; unrecognized pairs come back as `Inbound::Unknown`.
    pub fn classify(topic: &str, payload: &serde_json::Value) -> Result<Inbound, serde_json::Error> {
        let msg_type = payload.get("type").and_then(|v| v.as_str());

        match (topic, msg_type) {
            // Keyed by topic alone: the payload has no type discriminator.
            (TOPIC_TRANSCRIPTION, _) => {
                let p: TranscriptionPayload = serde_json::from_value(payload.clone())?;
                Ok(Inbound::Transcription(p))
            }
            (TOPIC_INTERVIEW_TIME, None) => {
                let p: TimerPayload = serde_json::from_value(payload.clone())?;
                Ok(Inbound::Timer(p))
            }
            (TOPIC_QUESTION_DATA, Some("question_data")) => {
                let data = payload.get("data").cloned().unwrap_or(serde_json::Value::Null);
                let p: QuestionData = serde_json::from_value(data)?;
                Ok(Inbound::QuestionData(p))
            }
            (TOPIC_TEST_RESULTS, Some("test_results")) => {
                let data = payload.get("data").cloned().unwrap_or(serde_json::Value::Null);
                let p: TestResultsData = serde_json::from_value(data)?;
                Ok(Inbound::TestResults(p))
            }
            _ => Ok(Inbound::Unknown {
                topic: topic.to_string(),
                msg_type: msg_type.map(str::to_string),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Outbound payloads
// ---------------------------------------------------------------------------

/// Messages this client publishes, all on the `code` topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outbound {
    CodeUpdate { code: String, timestamp: u64 },
    RunCode { timestamp: u64 },
    SubmitCode { timestamp: u64 },
}

impl Outbound {
    pub fn topic(&self) -> &'static str {
        TOPIC_CODE
    }
}

/// An outbound message paired with its topic, ready for the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundEnvelope {
    pub topic: &'static str,
    pub payload: Outbound,
}

impl OutboundEnvelope {
    pub fn new(payload: Outbound) -> Self {
        OutboundEnvelope {
            topic: payload.topic(),
            payload,
        }
    }
}
