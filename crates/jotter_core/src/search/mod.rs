//! Note search entry points.
//!
//! # Responsibility
//! - Expose linear-scan substring search over the record store.
//! - Keep result shaping (positions, snippets) inside core.

pub mod substring;
