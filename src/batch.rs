//! Batch driver.
//!
//! Processes each input path independently and sorts failures into two
//! classes:
//!
//! - [`BatchError::Expected`]: the input is rejected before any work starts
//!   (not a file, already resized) or one of its pages does not decode.
//!   Logged, then the batch moves on.
//! - [`BatchError::Fatal`]: anything else the writer runs into: a broken
//!   zip container, a checksum mismatch, disk full, an output that cannot be
//!   written, an encoder failure. Logged, then the whole run stops.
//!
//! Skips are not failures: a wrong extension or an existing output only
//! produces a console warning.

use crate::archive::ArchiveError;
use crate::config::ResizeConfig;
use crate::error_log::ErrorLog;
use crate::events::{BatchEvent, emit};
use crate::imaging::ImageBackend;
use crate::naming::{has_archive_extension, output_path};
use crate::writer::write_atomically;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("{0}")]
    Expected(String),
    #[error("Unexpected {0}")]
    Fatal(ArchiveError),
    #[error("cannot write error log: {0}")]
    ErrorLog(#[source] std::io::Error),
}

impl From<ArchiveError> for BatchError {
    fn from(err: ArchiveError) -> Self {
        if err.is_expected() {
            BatchError::Expected(err.to_string())
        } else {
            BatchError::Fatal(err)
        }
    }
}

/// What happened to one input path.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Written(PathBuf),
    /// The output (carried here) was already there.
    SkippedExists(PathBuf),
    SkippedExtension,
    Failed(String),
}

/// Per-path outcomes of a run, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub entries: Vec<(PathBuf, Outcome)>,
}

impl BatchReport {
    pub fn written(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Written(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::SkippedExists(_) | Outcome::SkippedExtension))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.entries.iter().filter(|(_, o)| pred(o)).count()
    }
}

/// Resize a single archive.
pub fn resize_archive(
    backend: &impl ImageBackend,
    path: &Path,
    config: &ResizeConfig,
    events: Option<&Sender<BatchEvent>>,
) -> Result<Outcome, BatchError> {
    if !path.is_file() {
        return Err(BatchError::Expected("not a regular file".into()));
    }

    if config.strict_extension_check && !has_archive_extension(path) {
        emit(
            events,
            BatchEvent::NotAnArchive {
                path: path.to_path_buf(),
            },
        );
        return Ok(Outcome::SkippedExtension);
    }

    let output = output_path(
        path,
        &config.output_suffix,
        config.output_directory.as_deref(),
    )
    .map_err(BatchError::Expected)?;

    if output.exists() {
        emit(
            events,
            BatchEvent::AlreadyExists {
                output: output.clone(),
            },
        );
        return Ok(Outcome::SkippedExists(output));
    }

    write_atomically(backend, path, &output, config, events)?;
    Ok(Outcome::Written(output))
}

/// Resize every path in order.
///
/// Expected failures are appended to `log` as `<path>: <reason>` and the run
/// continues. A fatal failure is appended as `<path>: Unexpected <cause>` and
/// returned immediately; later paths are not touched.
pub fn run(
    backend: &impl ImageBackend,
    paths: &[PathBuf],
    config: &ResizeConfig,
    log: &ErrorLog,
    events: Option<&Sender<BatchEvent>>,
) -> Result<BatchReport, BatchError> {
    let mut report = BatchReport::default();

    for path in paths {
        let outcome = match resize_archive(backend, path, config, events) {
            Ok(outcome) => outcome,
            Err(BatchError::Expected(reason)) => {
                record_failure(log, path, &reason, events)?;
                Outcome::Failed(reason)
            }
            Err(err @ BatchError::Fatal(_)) => {
                record_failure(log, path, &err.to_string(), events)?;
                return Err(err);
            }
            Err(err @ BatchError::ErrorLog(_)) => return Err(err),
        };
        report.entries.push((path.clone(), outcome));
    }

    Ok(report)
}

fn record_failure(
    log: &ErrorLog,
    path: &Path,
    message: &str,
    events: Option<&Sender<BatchEvent>>,
) -> Result<(), BatchError> {
    log.append(&format!("{}: {}", path.display(), message))
        .map_err(BatchError::ErrorLog)?;
    emit(
        events,
        BatchEvent::Failed {
            path: path.to_path_buf(),
            message: message.to_string(),
        },
    );
    Ok(())
}
