//! Persistent record of failed inputs.
//!
//! Every failure is appended as one line to `resizecbz.error.log` in the
//! working directory. The file is opened for each line and closed right
//! after, so the log survives an aborted run.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub const ERROR_LOG_FILENAME: &str = "resizecbz.error.log";

#[derive(Debug, Clone)]
pub struct ErrorLog {
    path: PathBuf,
}

impl ErrorLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `resizecbz.error.log` in the current working directory.
    pub fn in_current_dir() -> Self {
        Self::new(ERROR_LOG_FILENAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `line` plus a newline. Existing content is never truncated.
    pub fn append(&self, line: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")?;
        file.flush()
    }
}
