//! The session aggregate.
//!
//! `Session` owns one of every store and is the single writer for all of
//! them. All mutation happens on message-arrival or local-input callbacks,
//! serialized by the host runtime — no internal locking. Cross-store
//! coupling is confined to two rules:
//!
//! - entering `Disconnected` runs one ordered `reset()` over every store, so
//!   no partially-reset combination is ever observable;
//! - a `question_data` message updates the question store *and* seeds the
//!   editor buffer in the same callback.
//!
//! Outbound messages go through an optional `tokio` unbounded sender; a
//! session without a sink (e.g. in tests or replay) simply drops them after
//! applying local state.

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::connection::ConnectionState;
use crate::editor::EditorStore;
use crate::feedback::FeedbackStore;
use crate::messages::{Inbound, Outbound, OutboundEnvelope};
use crate::now_ms;
use crate::question::QuestionStore;
use crate::timer::TimerStore;
use crate::transcript::{Speaker, TranscriptLog};

/// Per-connection aggregate of all session state.
#[derive(Debug)]
pub struct Session {
    connection: ConnectionState,
    pub question: QuestionStore,
    pub editor: EditorStore,
    pub feedback: FeedbackStore,
    pub timer: TimerStore,
    pub transcript: TranscriptLog,
    /// When set, outbound messages are sent here for the transport to
    /// publish. When unset, they are dropped after local state is applied.
    outbound_tx: Option<UnboundedSender<OutboundEnvelope>>,
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}

impl Session {
    /// A fresh session in `Disconnected` with every store at its initial
    /// value.
    pub fn new() -> Self {
        Session {
            connection: ConnectionState::Disconnected,
            question: QuestionStore::new(),
            editor: EditorStore::new(),
            feedback: FeedbackStore::new(),
            timer: TimerStore::new(),
            transcript: TranscriptLog::new(),
            outbound_tx: None,
        }
    }

    /// Attach the transport's outbound sink.
    pub fn with_outbound(mut self, tx: UnboundedSender<OutboundEnvelope>) -> Self {
        self.outbound_tx = Some(tx);
        self
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    /// Apply a connection transition reported by the transport.
    ///
    /// The transport is authoritative, so even transitions the state diagram
    /// does not allow are applied (with a warn). Entering `Disconnected`
    /// from any other state triggers the full ordered reset; leaving
    /// `Connected` for any other state clears the execution-feedback view on
    /// its own, so it is never displayed while not connected.
    pub fn set_connection_state(&mut self, next: ConnectionState) {
        if next == self.connection {
            return;
        }
        if !self.connection.can_transition_to(next) {
            warn!(from = %self.connection, to = %next, "unexpected connection transition");
        }
        let was = self.connection;
        self.connection = next;
        info!(from = %was, to = %next, "connection state changed");

        if next == ConnectionState::Disconnected {
            self.reset();
        } else if next != ConnectionState::Connected {
            // Execution feedback is defined only while connected; a stale
            // run/submit view must not stay visible through a reconnect.
            self.feedback.reset();
        }
        // Entering Connected has no resetting side effect: state is rebuilt
        // only by subsequent inbound messages.
    }

    /// The single ordered reset routine. Question, then editor (back to the
    /// placeholder), then feedback, then timer, then transcript.
    pub fn reset(&mut self) {
        self.question.reset();
        self.editor.reset();
        self.feedback.reset();
        self.timer.reset();
        self.transcript.reset();
        debug!("session state reset");
    }

    /// Apply one classified inbound message. Exactly one store is updated
    /// per call, except `question_data` which also seeds the editor.
    pub fn apply_inbound(&mut self, msg: Inbound) {
        match msg {
            Inbound::Transcription(p) => {
                let ts = p.timestamp.unwrap_or_else(now_ms);
                self.transcript.append(Speaker::Remote, p.text, ts);
            }
            Inbound::QuestionData(data) => {
                self.question.apply_question_data(&data);
                self.editor.seed(&data.skeleton_code);
            }
            Inbound::TestResults(data) => {
                // Feedback is defined only while connected; a result that
                // raced a disconnect would otherwise resurrect stale state.
                if self.connection == ConnectionState::Connected {
                    self.feedback.apply(data);
                } else {
                    warn!(state = %self.connection, "dropping test results while not connected");
                }
            }
            Inbound::Timer(p) => {
                self.timer.on_timer_message(&p);
            }
            Inbound::Unknown { topic, msg_type } => {
                debug!(topic = %topic, msg_type = ?msg_type, "ignoring unrecognized message");
            }
        }
    }

    /// Apply a local edit to the code buffer and mirror it outbound.
    ///
    /// The buffer always updates; the `code_update` message is emitted only
    /// while connected.
    pub fn on_local_edit(&mut self, new_text: &str) {
        let timestamp = now_ms();
        self.editor.set_text(new_text.to_string(), timestamp);
        if self.connection == ConnectionState::Connected {
            self.emit(Outbound::CodeUpdate {
                code: new_text.to_string(),
                timestamp,
            });
        }
    }

    /// Ask the remote side to run the visible test cases.
    /// Returns whether the request was sent.
    pub fn request_run(&mut self) -> bool {
        self.request_execution(Outbound::RunCode { timestamp: now_ms() })
    }

    /// Ask the remote side to run the full suite.
    /// Returns whether the request was sent.
    pub fn request_submit(&mut self) -> bool {
        self.request_execution(Outbound::SubmitCode { timestamp: now_ms() })
    }

    fn request_execution(&mut self, msg: Outbound) -> bool {
        if self.connection != ConnectionState::Connected {
            warn!(state = %self.connection, "execution request while not connected");
            return false;
        }
        if self.feedback.is_cooldown() {
            debug!("execution request suppressed during cooldown");
            return false;
        }
        self.emit(msg);
        true
    }

    /// Record an utterance from the local candidate. The wire carries no
    /// speaker field, so local speech enters the transcript here rather than
    /// through the router.
    pub fn record_local_utterance(&mut self, text: &str) {
        self.transcript.append(Speaker::Local, text.to_string(), now_ms());
    }

    fn emit(&mut self, payload: Outbound) {
        if let Some(tx) = &self.outbound_tx {
            if tx.send(OutboundEnvelope::new(payload)).is_err() {
                warn!("outbound sink closed, dropping message");
            }
        }
    }
}
