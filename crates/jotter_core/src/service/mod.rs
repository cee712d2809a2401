//! Core use-case services.
//!
//! # Responsibility
//! - Expose note operations at the 1-based positional boundary.
//! - Keep CLI layers decoupled from store details.

pub mod content;
pub mod note_service;
