//! Connection lifecycle state.
//!
//! Wraps the transport's connection in a four-state enum that gates every
//! other store: outbound code mirroring and inbound test-results both require
//! `Connected`, and the transition into `Disconnected` triggers the session's
//! single ordered reset routine (see `Session::reset`).

use serde::{Deserialize, Serialize};

/// Connection lifecycle:
/// Disconnected → Connecting → Connected → {Disconnected, Reconnecting};
/// Reconnecting → {Connected, Disconnected}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Reconnecting,
}

impl ConnectionState {
    /// Human-readable name for logging.
    pub fn name(self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Reconnecting => "reconnecting",
        }
    }

    /// Whether `next` is a legal transition from this state. The transport
    /// drives transitions; illegal ones are applied anyway (the transport is
    /// authoritative) but logged by the session.
    pub fn can_transition_to(self, next: ConnectionState) -> bool {
        use ConnectionState::*;
        matches!(
            (self, next),
            (Disconnected, Connecting)
                | (Connecting, Connected)
                | (Connecting, Disconnected)
                | (Connected, Disconnected)
                | (Connected, Reconnecting)
                | (Reconnecting, Connected)
                | (Reconnecting, Disconnected)
        )
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
