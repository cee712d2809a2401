//! Core domain logic for Jotter, a single-user command-line notebook.
//! This crate is the single source of truth for note invariants and the
//! backing file format.

pub mod config;
pub mod logging;
pub mod model;
pub mod search;
pub mod service;
pub mod store;

pub use config::JotterConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{now_epoch_millis, Note, NoteId, TimestampOrderError};
pub use search::substring::{search_notes, snippet, NoteSearch, SearchHit, SearchQuery};
pub use service::content::{accumulate_lines, read_multiline};
pub use service::note_service::{IndexError, NoteService};
pub use store::codec::{decode_notes, encode_notes, DecodeError, EncodeError};
pub use store::{LoadError, NoteStore, SaveError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
