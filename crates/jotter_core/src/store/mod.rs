//! Record store: the in-memory note collection and its backing file.
//!
//! # Responsibility
//! - Own the ordered note collection for the process lifetime.
//! - Load and save the collection through the binary codec.
//!
//! # Invariants
//! - A missing backing file loads as an empty store.
//! - Corrupt data is discarded, never merged or repaired.
//! - `save` never mutates the in-memory collection.
//! - Positions here are 0-based; the 1-based boundary lives in `service`.

pub mod codec;
mod file;

use crate::model::note::{Note, NoteId};
use codec::{decode_notes, encode_notes, DecodeError, EncodeError};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use uuid::Uuid;

/// Backing file exists but cannot be read or parsed.
#[derive(Debug)]
pub enum LoadError {
    Io(io::Error),
    Decode(DecodeError),
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read notes file: {err}"),
            Self::Decode(err) => write!(f, "notes file is corrupt: {err}"),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Decode(err) => Some(err),
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<DecodeError> for LoadError {
    fn from(value: DecodeError) -> Self {
        Self::Decode(value)
    }
}

/// Collection could not be persisted; the previous file is left intact.
#[derive(Debug)]
pub enum SaveError {
    Encode(EncodeError),
    Io(io::Error),
}

impl Display for SaveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "failed to encode notes: {err}"),
            Self::Io(err) => write!(f, "failed to write notes file: {err}"),
        }
    }
}

impl Error for SaveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Encode(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<EncodeError> for SaveError {
    fn from(value: EncodeError) -> Self {
        Self::Encode(value)
    }
}

impl From<io::Error> for SaveError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

#[derive(Debug, Clone)]
struct Entry {
    id: NoteId,
    note: Note,
}

impl Entry {
    fn new(note: Note) -> Self {
        Self {
            id: Uuid::new_v4(),
            note,
        }
    }
}

/// Ordered note collection bound to one backing file.
#[derive(Debug, Clone)]
pub struct NoteStore {
    path: PathBuf,
    entries: Vec<Entry>,
}

impl NoteStore {
    /// Creates an empty store bound to `path` without touching disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Vec::new(),
        }
    }

    /// Loads the collection stored at `path`.
    ///
    /// A missing file is the first-run state and yields an empty store.
    ///
    /// # Errors
    /// - `LoadError::Io` when the file exists but cannot be read.
    /// - `LoadError::Decode` when the file is truncated or malformed.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, LoadError> {
        let path = path.into();
        let started_at = Instant::now();

        let bytes = match file::read_if_exists(&path) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                info!("event=store_load module=store status=ok notes=0 first_run=true");
                return Ok(Self::new(path));
            }
            Err(err) => {
                error!(
                    "event=store_load module=store status=error error_code=read_failed error={}",
                    err
                );
                return Err(err.into());
            }
        };

        let notes = decode_notes(&bytes).map_err(|err| {
            error!(
                "event=store_load module=store status=error error_code=decode_failed bytes={} error={}",
                bytes.len(),
                err
            );
            LoadError::from(err)
        })?;

        info!(
            "event=store_load module=store status=ok notes={} bytes={} duration_ms={}",
            notes.len(),
            bytes.len(),
            started_at.elapsed().as_millis()
        );
        Ok(Self {
            path,
            entries: notes.into_iter().map(Entry::new).collect(),
        })
    }

    /// Loads `path`, falling back to an empty store on `LoadError`.
    ///
    /// The error is returned alongside so the caller can report it.
    pub fn load_or_empty(path: impl Into<PathBuf>) -> (Self, Option<LoadError>) {
        let path = path.into();
        match Self::load(path.clone()) {
            Ok(store) => (store, None),
            Err(err) => {
                warn!("event=store_load module=store status=fallback notes=0");
                (Self::new(path), Some(err))
            }
        }
    }

    /// Persists the whole collection, replacing the backing file.
    ///
    /// # Errors
    /// - `SaveError::Encode` before any disk access when a field is oversized.
    /// - `SaveError::Io` when the temp write or rename fails.
    pub fn save(&self) -> Result<(), SaveError> {
        let started_at = Instant::now();
        let bytes = encode_notes(self.iter()).map_err(|err| {
            error!(
                "event=store_save module=store status=error error_code=encode_failed error={}",
                err
            );
            SaveError::from(err)
        })?;

        match file::write_atomic(&self.path, &bytes) {
            Ok(()) => {
                info!(
                    "event=store_save module=store status=ok notes={} bytes={} duration_ms={}",
                    self.len(),
                    bytes.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_save module=store status=error error_code=write_failed error={}",
                    err
                );
                Err(err.into())
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates notes in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Note> + '_ {
        self.entries.iter().map(|entry| &entry.note)
    }

    pub fn get(&self, position: usize) -> Option<&Note> {
        self.entries.get(position).map(|entry| &entry.note)
    }

    pub fn get_mut(&mut self, position: usize) -> Option<&mut Note> {
        self.entries.get_mut(position).map(|entry| &mut entry.note)
    }

    pub fn id_at(&self, position: usize) -> Option<NoteId> {
        self.entries.get(position).map(|entry| entry.id)
    }

    /// Current 0-based position of the note with `id`, if still stored.
    pub fn position_of(&self, id: NoteId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    /// Appends `note` and returns its surrogate key.
    pub fn push(&mut self, note: Note) -> NoteId {
        let entry = Entry::new(note);
        let id = entry.id;
        self.entries.push(entry);
        id
    }

    /// Removes the note at `position`, shifting later notes down.
    ///
    /// Returns `None` when `position` is out of range.
    pub fn remove(&mut self, position: usize) -> Option<Note> {
        (position < self.entries.len()).then(|| self.entries.remove(position).note)
    }
}
