//! Runtime configuration.
//!
//! All paths derive from one base directory; there are no flags or
//! environment overrides.

use crate::logging::default_log_level;
use std::path::{Path, PathBuf};

/// Backing file name inside the base directory.
pub const DATA_FILE_NAME: &str = "notes.dat";
/// Log directory name inside the base directory.
pub const LOG_DIR_NAME: &str = "logs";

/// Resolved locations and log level for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JotterConfig {
    pub data_file: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl JotterConfig {
    /// Defaults rooted at `base`: `base/notes.dat` and `base/logs`.
    pub fn for_dir(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        Self {
            data_file: base.join(DATA_FILE_NAME),
            log_dir: base.join(LOG_DIR_NAME),
            log_level: default_log_level().to_string(),
        }
    }
}
