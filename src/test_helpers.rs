//! Shared test utilities for the resizecbz test suite.
//!
//! Provides an in-memory zip builder for fixture archives, a byte-level
//! builder for headers `ZipWriter` cannot produce (DOS host, raw extra
//! fields), readers that snapshot every entry or central directory record of
//! an output archive, and synthetic page images.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let bytes = ZipFixture::new()
//!     .deflated("ComicInfo.xml", b"<ComicInfo/>")
//!     .stored("001.jpg", &synthetic_page(200, 300, ImageFormat::Jpeg))
//!     .finish();
//!
//! let entries = read_entries(&bytes);
//! assert_eq!(entries[1].name, "001.jpg");
//! ```

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::{Cursor, Read, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

// =========================================================================
// Fixture archives
// =========================================================================

/// Builder for an in-memory zip archive.
pub struct ZipFixture {
    writer: ZipWriter<Cursor<Vec<u8>>>,
}

impl ZipFixture {
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    fn add(mut self, name: &str, data: &[u8], options: SimpleFileOptions) -> Self {
        self.writer.start_file(name, options).unwrap();
        self.writer.write_all(data).unwrap();
        self
    }

    pub fn stored(self, name: &str, data: &[u8]) -> Self {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        self.add(name, data, options)
    }

    pub fn deflated(self, name: &str, data: &[u8]) -> Self {
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        self.add(name, data, options)
    }

    pub fn with_metadata(self, name: &str, data: &[u8], modified: DateTime, mode: u32) -> Self {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(modified)
            .unix_permissions(mode);
        self.add(name, data, options)
    }

    pub fn directory(mut self, name: &str) -> Self {
        self.writer
            .add_directory(name, SimpleFileOptions::default())
            .unwrap();
        self
    }

    pub fn finish(self) -> Vec<u8> {
        self.writer.finish().unwrap().into_inner()
    }

    /// Finish and write the archive to `path`.
    pub fn write_to(self, path: &Path) {
        std::fs::write(path, self.finish()).unwrap();
    }
}

/// Everything the tests compare about one archive entry.
#[derive(Debug, Clone)]
pub struct EntrySnapshot {
    pub name: String,
    pub data: Vec<u8>,
    pub modified: Option<DateTime>,
    pub mode: Option<u32>,
    pub compression: CompressionMethod,
}

/// Read every entry of an archive, in directory order.
pub fn read_entries(bytes: &[u8]) -> Vec<EntrySnapshot> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut entry = archive.by_index(i).unwrap();
            let mut data = Vec::new();
            entry.read_to_end(&mut data).unwrap();
            EntrySnapshot {
                name: entry.name().to_string(),
                data,
                modified: entry.last_modified(),
                mode: entry.unix_mode(),
                compression: entry.compression(),
            }
        })
        .collect()
}

/// Read every entry of an archive file.
pub fn read_entries_from(path: &Path) -> Vec<EntrySnapshot> {
    read_entries(&std::fs::read(path).unwrap())
}

// =========================================================================
// Byte-level archives
// =========================================================================

/// Fixed DOS timestamp used by [`DosZip`]: 2021-06-15 10:30:20.
const DOS_TIME: u16 = (10 << 11) | (30 << 5) | (20 / 2);
const DOS_DATE: u16 = ((2021 - 1980) << 9) | (6 << 5) | 15;

struct DosEntry {
    name: Vec<u8>,
    data: Vec<u8>,
    extra: Vec<u8>,
    comment: Vec<u8>,
    external_attributes: u32,
}

/// Stored archive written byte by byte, every entry made on a DOS host.
#[derive(Default)]
pub struct DosZip {
    entries: Vec<DosEntry>,
}

impl DosZip {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(
        mut self,
        name: &str,
        data: &[u8],
        extra: &[u8],
        comment: &[u8],
        external_attributes: u32,
    ) -> Self {
        self.entries.push(DosEntry {
            name: name.as_bytes().to_vec(),
            data: data.to_vec(),
            extra: extra.to_vec(),
            comment: comment.to_vec(),
            external_attributes,
        });
        self
    }

    pub fn finish(self) -> Vec<u8> {
        let mut out = Vec::new();
        let mut central = Vec::new();
        for e in &self.entries {
            let offset = out.len() as u32;
            let crc = crc32fast::hash(&e.data);
            let size = e.data.len() as u32;

            out.extend_from_slice(&0x04034b50u32.to_le_bytes());
            out.extend_from_slice(&20u16.to_le_bytes()); // version needed
            out.extend_from_slice(&0u16.to_le_bytes()); // flags
            out.extend_from_slice(&0u16.to_le_bytes()); // stored
            out.extend_from_slice(&DOS_TIME.to_le_bytes());
            out.extend_from_slice(&DOS_DATE.to_le_bytes());
            out.extend_from_slice(&crc.to_le_bytes());
            out.extend_from_slice(&size.to_le_bytes());
            out.extend_from_slice(&size.to_le_bytes());
            out.extend_from_slice(&(e.name.len() as u16).to_le_bytes());
            out.extend_from_slice(&(e.extra.len() as u16).to_le_bytes());
            out.extend_from_slice(&e.name);
            out.extend_from_slice(&e.extra);
            out.extend_from_slice(&e.data);

            central.extend_from_slice(&0x02014b50u32.to_le_bytes());
            central.extend_from_slice(&[20, 0]); // made by: 2.0 on MS-DOS
            central.extend_from_slice(&20u16.to_le_bytes());
            central.extend_from_slice(&0u16.to_le_bytes());
            central.extend_from_slice(&0u16.to_le_bytes());
            central.extend_from_slice(&DOS_TIME.to_le_bytes());
            central.extend_from_slice(&DOS_DATE.to_le_bytes());
            central.extend_from_slice(&crc.to_le_bytes());
            central.extend_from_slice(&size.to_le_bytes());
            central.extend_from_slice(&size.to_le_bytes());
            central.extend_from_slice(&(e.name.len() as u16).to_le_bytes());
            central.extend_from_slice(&(e.extra.len() as u16).to_le_bytes());
            central.extend_from_slice(&(e.comment.len() as u16).to_le_bytes());
            central.extend_from_slice(&0u16.to_le_bytes()); // disk
            central.extend_from_slice(&0u16.to_le_bytes()); // internal attributes
            central.extend_from_slice(&e.external_attributes.to_le_bytes());
            central.extend_from_slice(&offset.to_le_bytes());
            central.extend_from_slice(&e.name);
            central.extend_from_slice(&e.extra);
            central.extend_from_slice(&e.comment);
        }

        let cd_offset = out.len() as u32;
        let count = self.entries.len() as u16;
        out.extend_from_slice(&central);
        out.extend_from_slice(&0x06054b50u32.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&count.to_le_bytes());
        out.extend_from_slice(&count.to_le_bytes());
        out.extend_from_slice(&(central.len() as u32).to_le_bytes());
        out.extend_from_slice(&cd_offset.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out
    }
}

/// Central directory fields that `ZipFile` does not expose.
#[derive(Debug, Clone, PartialEq)]
pub struct CentralRecord {
    pub name: String,
    pub host_system: u8,
    pub external_attributes: u32,
    pub extra: Vec<u8>,
    pub comment: Vec<u8>,
}

/// Parse the central directory of a small (non-zip64) archive.
pub fn central_records(bytes: &[u8]) -> Vec<CentralRecord> {
    let u16_at = |p: usize| u16::from_le_bytes([bytes[p], bytes[p + 1]]) as usize;
    let u32_at = |p: usize| {
        u32::from_le_bytes([bytes[p], bytes[p + 1], bytes[p + 2], bytes[p + 3]])
    };

    let eocd = (0..=bytes.len() - 22)
        .rev()
        .find(|&p| bytes[p..p + 4] == [0x50, 0x4b, 0x05, 0x06])
        .unwrap();
    let count = u16_at(eocd + 10);
    let mut pos = u32_at(eocd + 16) as usize;

    let mut records = Vec::with_capacity(count);
    for _ in 0..count {
        assert_eq!(u32_at(pos), 0x02014b50);
        let name_len = u16_at(pos + 28);
        let extra_len = u16_at(pos + 30);
        let comment_len = u16_at(pos + 32);
        let name_start = pos + 46;
        let extra_start = name_start + name_len;
        let comment_start = extra_start + extra_len;
        records.push(CentralRecord {
            name: String::from_utf8_lossy(&bytes[name_start..extra_start]).into_owned(),
            host_system: bytes[pos + 5],
            external_attributes: u32_at(pos + 38),
            extra: bytes[extra_start..comment_start].to_vec(),
            comment: bytes[comment_start..comment_start + comment_len].to_vec(),
        });
        pos = comment_start + comment_len;
    }
    records
}

// =========================================================================
// Synthetic pages
// =========================================================================

/// Encode a gradient page of the given size and format.
pub fn synthetic_page(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = if format == ImageFormat::Jpeg {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        }))
    } else {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
        }))
    };
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, format).unwrap();
    buffer.into_inner()
}
