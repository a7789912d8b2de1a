//! Headless trace replay.
//!
//! Drives a full `Session` from a recorded JSONL trace — one event per line —
//! and produces a JSON summary of what the session did with it. Useful for
//! debugging a captured interview without a live room, and as an end-to-end
//! exerciser of the routing and state machinery.
//!
//! Event lines:
//!
//! ```text
//! {"event": "connection", "state": "connected"}
//! {"event": "message", "topic": "question-data", "payload": {...}}
//! {"event": "edit", "code": "def f(): ..."}
//! {"event": "run"}
//! {"event": "submit"}
//! {"event": "utterance", "text": "thinking out loud"}
//! {"event": "select_case", "index": 2}
//! {"event": "close_feedback"}
//! ```

use std::collections::BTreeMap;
use std::io::BufRead;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::connection::ConnectionState;
use crate::error::CoderoomError;
use crate::messages::Inbound;
use crate::router;
use crate::session::Session;

/// One line of a replay trace.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceEvent {
    /// Transport-reported connection transition.
    Connection { state: ConnectionState },
    /// An inbound data packet.
    Message {
        topic: String,
        payload: serde_json::Value,
    },
    /// A local editor change.
    Edit { code: String },
    /// Run-visible-cases request.
    Run,
    /// Submit-full-suite request.
    Submit,
    /// Local candidate speech.
    Utterance { text: String },
    /// Focus a test case in the run-detail view.
    SelectCase { index: usize },
    /// Close the feedback panel.
    CloseFeedback,
}

/// Final session snapshot at the end of a replay.
#[derive(Debug, Serialize)]
pub struct FinalState {
    pub connection: ConnectionState,
    pub question_loaded: bool,
    pub code: String,
    pub feedback: String,
    pub banner: Option<String>,
    pub time_display: String,
    pub transcript_entries: usize,
}

/// Everything a replay run reports.
#[derive(Debug, Serialize)]
pub struct ReplaySummary {
    pub schema_version: u8,
    /// Total trace events applied.
    pub events: usize,
    /// Inbound messages per topic.
    pub routed: BTreeMap<String, u64>,
    /// Messages dropped as undecodable.
    pub dropped: u64,
    /// Messages ignored as unrecognized (topic, type) pairs.
    pub ignored: u64,
    /// Outbound messages the session emitted, per type tag.
    pub outbound: BTreeMap<String, u64>,
    pub final_state: FinalState,
}

/// Replay a JSONL trace into a fresh session.
///
/// Message decoding failures are counted, not fatal — matching the router's
/// drop-and-log contract. A malformed *trace line* (not a payload) is a
/// hard error: the trace itself is broken.
pub fn replay<R: BufRead>(reader: R) -> Result<ReplaySummary, CoderoomError> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut session = Session::new().with_outbound(tx);

    let mut events = 0usize;
    let mut routed: BTreeMap<String, u64> = BTreeMap::new();
    let mut dropped = 0u64;
    let mut ignored = 0u64;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let event: TraceEvent =
            serde_json::from_str(&line).map_err(|e| CoderoomError::Trace {
                line: idx + 1,
                detail: e.to_string(),
            })?;
        events += 1;

        match event {
            TraceEvent::Connection { state } => session.set_connection_state(state),
            TraceEvent::Message { topic, payload } => {
                let raw = serde_json::to_vec(&payload).unwrap_or_default();
                match router::decode(&topic, &raw) {
                    Ok(Inbound::Unknown { .. }) => ignored += 1,
                    Ok(msg) => {
                        *routed.entry(topic).or_insert(0) += 1;
                        session.apply_inbound(msg);
                    }
                    Err(_) => dropped += 1,
                }
            }
            TraceEvent::Edit { code } => session.on_local_edit(&code),
            TraceEvent::Run => {
                session.request_run();
            }
            TraceEvent::Submit => {
                session.request_submit();
            }
            TraceEvent::Utterance { text } => session.record_local_utterance(&text),
            TraceEvent::SelectCase { index } => session.feedback.select_case(index),
            TraceEvent::CloseFeedback => session.feedback.close(),
        }
    }

    let mut outbound: BTreeMap<String, u64> = BTreeMap::new();
    while let Ok(env) = rx.try_recv() {
        let tag = serde_json::to_value(&env.payload)
            .ok()
            .and_then(|v| v.get("type").and_then(|t| t.as_str()).map(str::to_string))
            .unwrap_or_else(|| "unknown".to_string());
        *outbound.entry(tag).or_insert(0) += 1;
    }

    Ok(ReplaySummary {
        schema_version: 1,
        events,
        routed,
        dropped,
        ignored,
        outbound,
        final_state: FinalState {
            connection: session.connection(),
            question_loaded: session.question.is_loaded(),
            code: session.editor.text().to_string(),
            feedback: session.feedback.state().name().to_string(),
            banner: session.feedback.banner(),
            time_display: session.timer.display(),
            transcript_entries: session.transcript.len(),
        },
    })
}
