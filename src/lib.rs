//! coderoom — session message-multiplexing and state-reconciliation layer
//! for live coding-interview rooms.
//!
//! An interview room shares one bidirectional real-time channel between
//! audio/video transcription, problem data, editor mirroring, execution
//! feedback, and a countdown timer, each partitioned by a topic string. This
//! crate is the client-side control plane for that channel: it classifies
//! every inbound `(topic, bytes)` pair, drives the session's state machines,
//! and guarantees the UI never observes an inconsistent combination of
//! states — most importantly that nothing session-scoped survives a
//! disconnect.
//!
//! The transport (room join/leave, packet delivery) is an external
//! collaborator: it delivers already-decoded packets in-order per sender and
//! reports connection transitions. Everything here is synchronous and
//! single-writer; the host runtime serializes callbacks.

pub mod catalog;
pub mod cli;
pub mod connection;
pub mod editor;
pub mod error;
pub mod feedback;
pub mod messages;
pub mod question;
pub mod replay;
pub mod router;
pub mod session;
pub mod timer;
pub mod transcript;

pub use connection::ConnectionState;
pub use error::CoderoomError;
pub use session::Session;

use std::time::{SystemTime, UNIX_EPOCH};

/// Current Unix epoch in milliseconds.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
