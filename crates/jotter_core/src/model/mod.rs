//! Note domain model.
//!
//! # Responsibility
//! - Define the single record type stored by the notebook.
//! - Own timestamp conventions shared by store and service layers.
//!
//! # Invariants
//! - `created` is set exactly once and never mutated.
//! - `modified`, when present, is never earlier than `created`.

pub mod note;
