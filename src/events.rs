//! Progress events emitted while a batch runs.
//!
//! The pipeline never prints. It sends [`BatchEvent`]s over an optional
//! channel and the binary formats them with
//! [`output::format_event`](crate::output::format_event).

use crate::imaging::Dimensions;
use image::ImageFormat;
use std::path::PathBuf;
use std::sync::mpsc::Sender;

#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
    /// An archive is about to be transcoded.
    Resizing { input: PathBuf, output: PathBuf },
    /// One image entry was re-encoded. `index` counts images from 1,
    /// `total` counts all entries in the archive.
    PageResized {
        index: usize,
        total: usize,
        format: ImageFormat,
        original: Dimensions,
        resized: Dimensions,
        name: String,
    },
    /// The output already exists; the input was left alone.
    AlreadyExists { output: PathBuf },
    /// Input skipped because it is not `.cbz` / `.zip`.
    NotAnArchive { path: PathBuf },
    /// A failure that was written to the error log.
    Failed { path: PathBuf, message: String },
}

/// Send an event if anyone is listening. A closed channel is not an error.
pub(crate) fn emit(events: Option<&Sender<BatchEvent>>, event: BatchEvent) {
    if let Some(tx) = events {
        let _ = tx.send(event);
    }
}
