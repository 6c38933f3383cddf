//! Atomic archive output.
//!
//! The resized archive is built in a temporary file next to its final path
//! and renamed into place once complete. Either the final path holds a
//! finished archive, or nothing was ever written under that name.
//!
//! ```text
//! resized/.comic.rs.cbz.Ab12Cd.tmp   ← built here (random name)
//! resized/comic.rs.cbz               ← single rename on success
//! ```
//!
//! On failure the temporary file is deleted when it goes out of scope. A
//! process killed mid-write can leave a `.tmp` file behind.

use crate::archive::{ArchiveError, transcode_archive};
use crate::config::ResizeConfig;
use crate::events::{BatchEvent, emit};
use crate::imaging::ImageBackend;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use std::sync::mpsc::Sender;
use zip::{ZipArchive, ZipWriter};

/// Transcode `input_path` into a new archive at `output_path`.
///
/// Creates missing parent directories. `output_path` is only ever touched by
/// the final rename.
pub fn write_atomically(
    backend: &impl ImageBackend,
    input_path: &Path,
    output_path: &Path,
    config: &ResizeConfig,
    events: Option<&Sender<BatchEvent>>,
) -> Result<(), ArchiveError> {
    emit(
        events,
        BatchEvent::Resizing {
            input: input_path.to_path_buf(),
            output: output_path.to_path_buf(),
        },
    );

    let dir = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let reader = BufReader::new(File::open(input_path)?);
    let mut input = ZipArchive::new(reader).map_err(ArchiveError::OpenInput)?;

    let file_name = output_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp = tempfile::Builder::new()
        .prefix(&format!(".{file_name}."))
        .suffix(".tmp")
        .tempfile_in(dir)?;

    let mut output = ZipWriter::new(temp);
    transcode_archive(backend, &mut input, &mut output, config, events)?;
    let temp = output.finish().map_err(ArchiveError::Output)?;
    temp.as_file().sync_all()?;
    temp.persist(output_path).map_err(|e| ArchiveError::Io(e.error))?;
    Ok(())
}
