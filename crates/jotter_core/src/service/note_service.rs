//! Note use-case service.
//!
//! # Responsibility
//! - Provide add/edit/remove/search/list APIs over a borrowed `NoteStore`.
//! - Translate 1-based user positions to store positions.
//!
//! # Invariants
//! - Out-of-range positions fail with `IndexError` and change nothing.
//! - Blank replacement text keeps the current field value.
//! - Every edit that passes the index check stamps `modified`, even when no
//!   field changed.

use crate::model::note::{now_epoch_millis, Note, NoteId};
use crate::search::substring::{search_notes, NoteSearch, SearchQuery};
use crate::store::NoteStore;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// User-supplied note number outside `[1, len]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexError {
    /// Rejected 1-based position.
    pub index: usize,
    /// Collection length at the time of the call.
    pub len: usize,
}

impl Display for IndexError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.len == 0 {
            write!(f, "invalid note number {}: there are no notes", self.index)
        } else {
            write!(
                f,
                "invalid note number {}: expected 1..={}",
                self.index, self.len
            )
        }
    }
}

impl Error for IndexError {}

/// Note operations facade over an explicitly owned store.
pub struct NoteService<'s> {
    store: &'s mut NoteStore,
}

impl<'s> NoteService<'s> {
    pub fn new(store: &'s mut NoteStore) -> Self {
        Self { store }
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Appends a new note stamped with the current time.
    ///
    /// Empty title and content are allowed. Returns a copy of the stored note.
    pub fn add(&mut self, title: impl Into<String>, content: impl Into<String>) -> Note {
        let note = Note::new(title, content);
        self.store.push(note.clone());
        info!(
            "event=note_add module=service status=ok index={}",
            self.store.len()
        );
        note
    }

    /// Gets the note at 1-based `index`.
    pub fn get(&self, index: usize) -> Result<&Note, IndexError> {
        let position = self.position(index)?;
        self.store.get(position).ok_or(IndexError {
            index,
            len: self.store.len(),
        })
    }

    /// Gets the note at 1-based `index` together with its surrogate key.
    pub fn resolve(&self, index: usize) -> Result<(NoteId, &Note), IndexError> {
        let position = self.position(index)?;
        let len = self.store.len();
        match (self.store.id_at(position), self.store.get(position)) {
            (Some(id), Some(note)) => Ok((id, note)),
            _ => Err(IndexError { index, len }),
        }
    }

    /// Current 1-based position of the note with `id`, if still stored.
    pub fn index_of(&self, id: NoteId) -> Option<usize> {
        self.store.position_of(id).map(|position| position + 1)
    }

    /// Edits the note at 1-based `index`.
    ///
    /// `new_title` / `new_content` replace the current value only when they
    /// are non-blank after trimming. The stored replacement keeps the caller's
    /// exact text.
    pub fn edit(
        &mut self,
        index: usize,
        new_title: Option<&str>,
        new_content: Option<&str>,
    ) -> Result<&Note, IndexError> {
        let position = self.position(index)?;
        let len = self.store.len();
        let note = self
            .store
            .get_mut(position)
            .ok_or(IndexError { index, len })?;

        let title_changed = replace_if_present(&mut note.title, new_title);
        let content_changed = replace_if_present(&mut note.content, new_content);
        note.touch(now_epoch_millis());

        info!(
            "event=note_edit module=service status=ok index={} title_changed={} content_changed={}",
            index, title_changed, content_changed
        );
        Ok(&*note)
    }

    /// Removes and returns the note at 1-based `index`.
    pub fn remove(&mut self, index: usize) -> Result<Note, IndexError> {
        let position = self.position(index)?;
        let len = self.store.len();
        let removed = self.store.remove(position).ok_or(IndexError { index, len })?;
        info!(
            "event=note_remove module=service status=ok index={} remaining={}",
            index,
            self.store.len()
        );
        Ok(removed)
    }

    /// Lazily searches title and content, ignoring case.
    ///
    /// Calling this again restarts the scan against current store state.
    pub fn search(&self, query: &str) -> NoteSearch<'_> {
        search_notes(&*self.store, SearchQuery::new(query))
    }

    /// Iterates `(1-based index, note)` pairs in display order.
    pub fn list(&self) -> impl Iterator<Item = (usize, &Note)> + '_ {
        self.store
            .iter()
            .enumerate()
            .map(|(position, note)| (position + 1, note))
    }

    fn position(&self, index: usize) -> Result<usize, IndexError> {
        let len = self.store.len();
        if index == 0 || index > len {
            warn!(
                "event=index_check module=service status=error index={} len={}",
                index, len
            );
            return Err(IndexError { index, len });
        }
        Ok(index - 1)
    }
}

fn replace_if_present(field: &mut String, replacement: Option<&str>) -> bool {
    match replacement {
        Some(value) if !value.trim().is_empty() => {
            *field = value.to_string();
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::replace_if_present;

    #[test]
    fn blank_replacements_keep_existing_value() {
        let mut field = "keep".to_string();
        assert!(!replace_if_present(&mut field, None));
        assert!(!replace_if_present(&mut field, Some("")));
        assert!(!replace_if_present(&mut field, Some(" \t\n")));
        assert_eq!(field, "keep");

        assert!(replace_if_present(&mut field, Some(" new ")));
        assert_eq!(field, " new ");
    }
}
