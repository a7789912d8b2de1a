//! Topic router.
//!
//! Entry point for every inbound data packet: decode the raw bytes as UTF-8
//! JSON, classify by `(topic, payload.type)`, and hand the result to the
//! session. Malformed payloads and unrecognized pairs are logged and dropped
//! — no error ever escapes to the transport callback, and no store is
//! touched on a failed decode.

use tracing::warn;

use crate::error::CoderoomError;
use crate::messages::Inbound;
use crate::session::Session;

/// Route one inbound packet into the session. Never panics, never throws;
/// at most one store is updated.
pub fn route(session: &mut Session, topic: &str, raw_payload: &[u8]) {
    match decode(topic, raw_payload) {
        Ok(msg) => session.apply_inbound(msg),
        Err(err) => warn!(topic = %topic, error = %err, "dropping undecodable payload"),
    }
}

/// Decode raw payload bytes for `topic` into a classified message.
pub fn decode(topic: &str, raw_payload: &[u8]) -> Result<Inbound, CoderoomError> {
    let value: serde_json::Value =
        serde_json::from_slice(raw_payload).map_err(|e| CoderoomError::Decode {
            topic: topic.to_string(),
            detail: e.to_string(),
        })?;
    Inbound::classify(topic, &value).map_err(|e| CoderoomError::Decode {
        topic: topic.to_string(),
        detail: e.to_string(),
    })
}
