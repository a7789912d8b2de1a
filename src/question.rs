//! Question context store.
//!
//! Holds the currently active question. A `question_data` message replaces
//! the active context wholesale — never a field-by-field patch — and the
//! session seeds the editor buffer with the new starter code at the same
//! time. Cleared only on disconnect.

use serde::{Deserialize, Serialize};

use crate::messages::QuestionData;

/// Catalog metadata for a question, fetched out-of-band from the question
/// lookup service (see `catalog`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub difficulty: String,
    pub category: String,
}

/// The problem statement currently in front of the candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionContext {
    pub description: String,
    pub starter_code: String,
}

/// Empty → Loaded → Cleared-on-disconnect.
#[derive(Debug, Default)]
pub struct QuestionStore {
    active: Option<QuestionContext>,
    metadata: Option<QuestionRecord>,
}

impl QuestionStore {
    pub fn new() -> Self {
        QuestionStore::default()
    }

    /// Replace the active question from a `question_data` payload.
    pub fn apply_question_data(&mut self, data: &QuestionData) {
        self.active = Some(QuestionContext {
            description: data.description.clone(),
            starter_code: data.skeleton_code.clone(),
        });
    }

    /// Attach catalog metadata (title, difficulty, category) for display.
    pub fn set_metadata(&mut self, record: QuestionRecord) {
        self.metadata = Some(record);
    }

    pub fn active(&self) -> Option<&QuestionContext> {
        self.active.as_ref()
    }

    pub fn metadata(&self) -> Option<&QuestionRecord> {
        self.metadata.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.active.is_some()
    }

    /// Back to empty, as on disconnect.
    pub fn reset(&mut self) {
        self.active = None;
        self.metadata = None;
    }
}
