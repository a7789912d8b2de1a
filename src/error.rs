//! Crate-level error type.
//!
//! Store mutations are infallible reducers; errors only arise at the seams —
//! payload decoding, the question catalog HTTP client, and trace replay.

use thiserror::Error;

/// Errors surfaced by the coderoom session layer.
///
/// Each variant carries enough context to diagnose the failure without
/// needing to inspect the originating error directly.
#[derive(Debug, Error)]
pub enum CoderoomError {
    /// Payload bytes on a recognized topic were not the expected JSON shape.
    #[error("undecodable payload on topic '{topic}': {detail}")]
    Decode { topic: String, detail: String },

    /// The question catalog has no entry for this id.
    #[error("question '{id}' not found")]
    QuestionNotFound { id: String },

    /// The question catalog replied with a non-2xx HTTP status.
    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    /// A catalog request failed before a response was received.
    #[error("question catalog request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// A replay trace line could not be parsed as an event.
    #[error("trace line {line}: {detail}")]
    Trace { line: usize, detail: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
