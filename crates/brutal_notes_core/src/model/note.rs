//! Note record, partial patch and collection stats.
//!
//! # Responsibility
//! - Define the wire shape of one persisted note.
//! - Apply partial updates without touching identity fields.
//!
//! # Invariants
//! - Serialized field names are `id`, `title`, `text`, `completed`,
//!   `createdAt`, `updatedAt`.
//! - `apply_patch` preserves `id` and `created_at` unconditionally.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque note identifier, stored as text on the wire.
pub type NoteId = String;

/// One persisted note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique within the collection; never reused.
    pub id: NoteId,
    pub title: String,
    pub text: String,
    pub completed: bool,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds. Refreshed on every mutation.
    pub updated_at: i64,
}

impl Note {
    /// Creates an active note with a freshly generated id.
    ///
    /// `title` and `text` are trimmed; both timestamps are set to `now_ms`.
    pub fn new(title: &str, text: &str, now_ms: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.trim().to_string(),
            text: text.trim().to_string(),
            completed: false,
            created_at: now_ms,
            updated_at: now_ms,
        }
    }

    /// Returns a copy with `patch` applied and `updated_at` advanced.
    ///
    /// `updated_at` is clamped so it never drops below the current value,
    /// even if the wall clock stepped backwards.
    pub fn apply_patch(&self, patch: &NotePatch, now_ms: i64) -> Self {
        Self {
            id: self.id.clone(),
            title: patch
                .title
                .as_deref()
                .map_or_else(|| self.title.clone(), |value| value.trim().to_string()),
            text: patch
                .text
                .as_deref()
                .map_or_else(|| self.text.clone(), |value| value.trim().to_string()),
            completed: patch.completed.unwrap_or(self.completed),
            created_at: self.created_at,
            updated_at: now_ms.max(self.updated_at),
        }
    }
}

/// Partial field set for `NoteStore::update`. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub text: Option<String>,
    pub completed: Option<bool>,
}

impl NotePatch {
    pub fn title(value: impl Into<String>) -> Self {
        Self {
            title: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self {
            text: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn completed(value: bool) -> Self {
        Self {
            completed: Some(value),
            ..Self::default()
        }
    }
}

/// Read-only counters computed over a note collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoteStats {
    pub total: usize,
    pub completed: usize,
    pub active: usize,
}

impl NoteStats {
    pub fn from_notes(notes: &[Note]) -> Self {
        let total = notes.len();
        let completed = notes.iter().filter(|note| note.completed).count();
        Self {
            total,
            completed,
            active: total - completed,
        }
    }
}
