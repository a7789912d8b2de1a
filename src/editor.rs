//! Editor synchronization store.
//!
//! The code buffer is owned exclusively by the local client: the remote side
//! consumes it but never writes it. Local edits land synchronously; the
//! session mirrors each edit outbound as a `code_update` while connected.
//! Seeding from a question's starter code overwrites the buffer without
//! counting as a local edit (no outbound mirror — the remote side sent the
//! starter code in the first place).

/// Buffer contents after a reset, before any question is loaded.
pub const PLACEHOLDER_CODE: &str = "# Write your solution here";

/// The author's current code buffer.
#[derive(Debug)]
pub struct EditorStore {
    text: String,
    last_edit_ms: Option<u64>,
}

impl Default for EditorStore {
    fn default() -> Self {
        EditorStore {
            text: PLACEHOLDER_CODE.to_string(),
            last_edit_ms: None,
        }
    }
}

impl EditorStore {
    pub fn new() -> Self {
        EditorStore::default()
    }

    /// Apply a local edit. Synchronous and local-first; outbound mirroring is
    /// the session's concern.
    pub fn set_text(&mut self, text: String, timestamp_ms: u64) {
        self.text = text;
        self.last_edit_ms = Some(timestamp_ms);
    }

    /// Overwrite the buffer with a question's starter code. Not an edit:
    /// the edit timestamp is cleared.
    pub fn seed(&mut self, starter_code: &str) {
        self.text = starter_code.to_string();
        self.last_edit_ms = None;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn last_edit_ms(&self) -> Option<u64> {
        self.last_edit_ms
    }

    /// Back to the placeholder sentinel, as on disconnect.
    pub fn reset(&mut self) {
        self.text = PLACEHOLDER_CODE.to_string();
        self.last_edit_ms = None;
    }
}
