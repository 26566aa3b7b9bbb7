//! Store configuration.
//!
//! The store lives in a single root directory:
//!
//! ```text
//! <root>/
//! ├─ marks/   # one file per open mark, named <mark name>.<ext>
//! └─ spans/   # one file per span, named <span key>.<ext>
//! ```

use std::path::{Path, PathBuf};

/// Subdirectory holding mark records.
pub const MARKS_DIR: &str = "marks";

/// Subdirectory holding span records.
pub const SPANS_DIR: &str = "spans";

/// Configuration for opening a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root storage directory.
    pub root: PathBuf,

    /// File extension for record files. `None` uses the codec's own extension.
    pub extension: Option<String>,
}

impl Config {
    /// Creates a configuration rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: None,
        }
    }

    /// Sets the file extension for record files.
    #[must_use]
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    /// Returns the root storage directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the directory holding mark records.
    #[must_use]
    pub fn marks_dir(&self) -> PathBuf {
        self.root.join(MARKS_DIR)
    }

    /// Returns the directory holding span records.
    #[must_use]
    pub fn spans_dir(&self) -> PathBuf {
        self.root.join(SPANS_DIR)
    }
}
