//! Note record and timestamp helpers.
//!
//! # Responsibility
//! - Define the canonical `Note` shape persisted in the backing file.
//! - Provide the only constructor that stamps `created`.
//!
//! # Invariants
//! - `created` is Unix epoch milliseconds and immutable after construction.
//! - `modified` is `None` until the first edit and `>= created` afterwards.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// In-memory surrogate key for a stored note.
///
/// Never persisted; reassigned whenever a collection is loaded.
pub type NoteId = Uuid;

/// One title/content record with creation and edit timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawNote")]
pub struct Note {
    /// Free text, may be empty. No uniqueness constraint.
    pub title: String,
    /// Free text, may contain embedded newlines.
    pub content: String,
    /// Unix epoch milliseconds.
    created: i64,
    /// Unix epoch milliseconds of the latest edit.
    modified: Option<i64>,
}

impl Note {
    /// Creates a note stamped with the current time.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self::with_created(title, content, now_epoch_millis())
    }

    /// Creates a never-edited note with a caller-provided creation time.
    ///
    /// Used by decode paths where `created` already exists on disk.
    pub fn with_created(title: impl Into<String>, content: impl Into<String>, created: i64) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            created,
            modified: None,
        }
    }

    /// Restores a note with both timestamps.
    ///
    /// # Errors
    /// - Returns the offending pair when `modified < created`.
    pub fn restore(
        title: impl Into<String>,
        content: impl Into<String>,
        created: i64,
        modified: Option<i64>,
    ) -> Result<Self, TimestampOrderError> {
        if let Some(modified) = modified {
            if modified < created {
                return Err(TimestampOrderError { created, modified });
            }
        }
        let mut note = Self::with_created(title, content, created);
        note.modified = modified;
        Ok(note)
    }

    pub fn created(&self) -> i64 {
        self.created
    }

    pub fn modified(&self) -> Option<i64> {
        self.modified
    }

    /// Stamps `modified` with `at`, clamped so it never precedes `created`.
    pub fn touch(&mut self, at: i64) {
        self.modified = Some(at.max(self.created));
    }
}

/// Unchecked wire shape; converted through `Note::restore`.
#[derive(Deserialize)]
struct RawNote {
    title: String,
    content: String,
    created: i64,
    modified: Option<i64>,
}

impl TryFrom<RawNote> for Note {
    type Error = TimestampOrderError;

    fn try_from(value: RawNote) -> Result<Self, Self::Error> {
        Note::restore(value.title, value.content, value.created, value.modified)
    }
}

/// Rejected timestamp pair where the edit time precedes creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampOrderError {
    pub created: i64,
    pub modified: i64,
}

impl std::fmt::Display for TimestampOrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "modified ({}) must be >= created ({})",
            self.modified, self.created
        )
    }
}

impl std::error::Error for TimestampOrderError {}

/// Current wall-clock time as Unix epoch milliseconds.
///
/// Clocks set before 1970 collapse to `0` rather than failing.
pub fn now_epoch_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
