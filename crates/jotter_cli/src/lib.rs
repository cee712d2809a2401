//! Interactive menu front-end for `jotter_core`.
//!
//! # Responsibility
//! - Render the six-action menu and read user input line by line.
//! - Call core note operations and render their results as text.
//! - Save the store on exit, reporting failures instead of aborting.
//!
//! # Invariants
//! - All terminal I/O lives here; core never touches stdin/stdout.
//! - End of input behaves like the exit action.

pub mod session;

pub use session::{MenuAction, Session};
