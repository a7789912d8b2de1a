//! Transcript log.
//!
//! Append-only, ordered by arrival (not by sender timestamp), never deduped
//! or reordered. Cleared only on full session reset. Grouping consecutive
//! entries by speaker is a rendering projection, not a data-model change.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who said it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    /// The local candidate.
    #[serde(rename = "self")]
    Local,
    /// The remote interviewer agent.
    Remote,
}

/// One utterance in arrival order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub id: String,
    pub speaker: Speaker,
    pub text: String,
    pub timestamp_ms: u64,
}

/// Append-only transcript of the session.
#[derive(Debug, Default)]
pub struct TranscriptLog {
    entries: Vec<TranscriptEntry>,
}

impl TranscriptLog {
    pub fn new() -> Self {
        TranscriptLog::default()
    }

    pub fn append(&mut self, speaker: Speaker, text: String, timestamp_ms: u64) {
        self.entries.push(TranscriptEntry {
            id: Uuid::new_v4().to_string(),
            speaker,
            text,
            timestamp_ms,
        });
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rendering projection: runs of consecutive entries from one speaker.
    pub fn grouped(&self) -> Vec<(Speaker, Vec<&TranscriptEntry>)> {
        let mut groups: Vec<(Speaker, Vec<&TranscriptEntry>)> = Vec::new();
        for entry in &self.entries {
            let same_run = groups
                .last()
                .map(|(speaker, _)| *speaker == entry.speaker)
                .unwrap_or(false);
            if same_run {
                if let Some((_, run)) = groups.last_mut() {
                    run.push(entry);
                }
            } else {
                groups.push((entry.speaker, vec![entry]));
            }
        }
        groups
    }

    /// Back to empty, as on full session reset.
    pub fn reset(&mut self) {
        self.entries.clear();
    }
}
