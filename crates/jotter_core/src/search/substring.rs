//! Case-insensitive substring search over the note collection.
//!
//! # Responsibility
//! - Match a literal query against note title or content.
//! - Yield hits lazily in collection order.
//!
//! # Invariants
//! - Queries are literal text; regex metacharacters never change meaning.
//! - No index is cached; each iteration rescans the store.
//! - Hit positions are 1-based.

use crate::model::note::{Note, NoteId};
use crate::store::NoteStore;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Compiled literal query.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    text: String,
    matcher: Option<Regex>,
}

impl SearchQuery {
    /// Builds a Unicode-aware, case-insensitive literal matcher.
    ///
    /// An empty query matches every note.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        // Escaped literals only fail to compile past the regex size limit;
        // those fall back to lowercase containment.
        let matcher = RegexBuilder::new(&regex::escape(&text))
            .case_insensitive(true)
            .build()
            .ok();
        Self { text, matcher }
    }

    /// True when title or content contains the query, ignoring case.
    pub fn matches(&self, note: &Note) -> bool {
        match &self.matcher {
            Some(matcher) => matcher.is_match(&note.title) || matcher.is_match(&note.content),
            None => {
                let needle = self.text.to_lowercase();
                note.title.to_lowercase().contains(&needle)
                    || note.content.to_lowercase().contains(&needle)
            }
        }
    }
}

/// One matching note with its 1-based position and surrogate key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchHit<'a> {
    pub index: usize,
    pub id: NoteId,
    pub note: &'a Note,
}

/// Lazy iterator over matching notes.
pub struct NoteSearch<'a> {
    store: &'a NoteStore,
    query: SearchQuery,
    next: usize,
}

impl<'a> Iterator for NoteSearch<'a> {
    type Item = SearchHit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next < self.store.len() {
            let position = self.next;
            self.next += 1;
            let note = self.store.get(position)?;
            if self.query.matches(note) {
                return Some(SearchHit {
                    index: position + 1,
                    id: self.store.id_at(position)?,
                    note,
                });
            }
        }
        None
    }
}

/// Starts a fresh scan of `store` for `query`.
pub fn search_notes(store: &NoteStore, query: SearchQuery) -> NoteSearch<'_> {
    NoteSearch {
        store,
        query,
        next: 0,
    }
}

/// First `max_chars` characters of `content` on one line.
///
/// Whitespace runs (including newlines) collapse to a single space.
pub fn snippet(content: &str, max_chars: usize) -> String {
    let normalized = WHITESPACE_RE.replace_all(content.trim(), " ");
    normalized.chars().take(max_chars).collect()
}
