//! Archive transcoding.
//!
//! Walks every entry of an input zip in directory order and writes a
//! matching entry to the output zip:
//!
//! - image entries (`jpg`, `jpeg`, `png`, `gif`, `webp`) go through
//!   [`transcode_image`] and are written back `Stored` under the same name,
//!   modification time and permissions;
//! - everything else, directories included, is raw-copied: the compressed
//!   bytes and the whole header (comment, extra field, host system, external
//!   attributes) come through untouched.
//!
//! Only one page is held in memory at a time.

use crate::config::ResizeConfig;
use crate::events::{BatchEvent, emit};
use crate::imaging::{BackendError, ImageBackend, transcode_image};
use std::io::{self, Read, Seek, Write};
use std::path::Path;
use std::sync::mpsc::Sender;
use thiserror::Error;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

/// Entry extensions treated as pages, compared case-insensitively.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Upper bound for preallocating a page buffer from its declared size.
const MAX_PREALLOC: u64 = 64 << 20;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("cannot read archive: {0}")]
    OpenInput(#[source] ZipError),
    #[error("cannot read entry {name}: {source}")]
    ReadEntry {
        name: String,
        #[source]
        source: io::Error,
    },
    #[error("{entry}: {source}")]
    Image {
        entry: String,
        #[source]
        source: BackendError,
    },
    #[error("cannot write archive: {0}")]
    Output(#[source] ZipError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl ArchiveError {
    /// Only a page that does not decode is blamed on the input and skipped.
    /// A broken container, a checksum mismatch, the disk or the encoder stop
    /// the run.
    pub fn is_expected(&self) -> bool {
        match self {
            ArchiveError::Image { source, .. } => source.is_bad_input(),
            ArchiveError::OpenInput(_)
            | ArchiveError::ReadEntry { .. }
            | ArchiveError::Output(_)
            | ArchiveError::Io(_) => false,
        }
    }
}

/// True when the entry name has a page extension.
pub fn is_image_entry(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|i| ext.eq_ignore_ascii_case(i)))
}

/// Stored options carrying over the source entry's metadata.
fn page_options(modified: Option<DateTime>, mode: Option<u32>, size: u64) -> SimpleFileOptions {
    let mut options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Stored)
        .large_file(size >= u32::MAX as u64);
    if let Some(modified) = modified {
        options = options.last_modified_time(modified);
    }
    if let Some(mode) = mode {
        options = options.unix_permissions(mode);
    }
    options
}

/// Buffer for a page whose header declares `declared` bytes. The header is
/// only a hint: forged sizes must not turn into huge allocations.
fn page_buffer(declared: u64) -> Vec<u8> {
    Vec::with_capacity(declared.min(MAX_PREALLOC) as usize)
}

/// Copy entry `index` as is, after checking that it decompresses with a
/// matching CRC.
fn copy_entry<R, W>(
    input: &mut ZipArchive<R>,
    output: &mut ZipWriter<W>,
    index: usize,
    name: &str,
) -> Result<(), ArchiveError>
where
    R: Read + Seek,
    W: Write + Seek,
{
    let mut entry = input.by_index(index).map_err(ArchiveError::OpenInput)?;
    io::copy(&mut entry, &mut io::sink()).map_err(|source| ArchiveError::ReadEntry {
        name: name.to_string(),
        source,
    })?;
    drop(entry);

    let raw = input.by_index_raw(index).map_err(ArchiveError::OpenInput)?;
    output.raw_copy_file(raw).map_err(ArchiveError::Output)
}

/// Transcode every entry of `input` into `output`, preserving order.
///
/// The first failing entry aborts the archive; the error is returned as is.
/// `output` is left unfinished on error and must be discarded by the caller.
pub fn transcode_archive<R, W>(
    backend: &impl ImageBackend,
    input: &mut ZipArchive<R>,
    output: &mut ZipWriter<W>,
    config: &ResizeConfig,
    events: Option<&Sender<BatchEvent>>,
) -> Result<(), ArchiveError>
where
    R: Read + Seek,
    W: Write + Seek,
{
    let total = input.len();
    let mut page = 0;

    for i in 0..total {
        let mut entry = input.by_index(i).map_err(ArchiveError::OpenInput)?;
        let name = entry.name().to_string();

        if entry.is_dir() || !is_image_entry(&name) {
            drop(entry);
            copy_entry(input, output, i, &name)?;
            continue;
        }

        let modified = entry.last_modified();
        let mode = entry.unix_mode();
        let mut data = page_buffer(entry.size());
        entry
            .read_to_end(&mut data)
            .map_err(|source| ArchiveError::ReadEntry {
                name: name.clone(),
                source,
            })?;
        drop(entry);

        let resized = transcode_image(backend, &data, config).map_err(|source| {
            ArchiveError::Image {
                entry: name.clone(),
                source,
            }
        })?;
        page += 1;

        let options = page_options(modified, mode, resized.data.len() as u64);
        output
            .start_file(name.as_str(), options)
            .map_err(ArchiveError::Output)?;
        output.write_all(&resized.data)?;

        emit(
            events,
            BatchEvent::PageResized {
                index: page,
                total,
                format: resized.format,
                original: resized.original,
                resized: resized.resized,
                name,
            },
        );
    }

    Ok(())
}
