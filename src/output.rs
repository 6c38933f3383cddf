//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Configuration
//!
//! ```text
//! Using parameters from /home/u/.config/resizecbz/resizecbz.toml:
//!     resize_landscape = 768
//!     resize_portrait = 1024
//!     rotate_landscape = right
//!     resized_file_ext = .rs
//!     ext_zip_or_cbz = true
//!     output_directory = resized
//! ```
//!
//! ## Batch
//!
//! ```text
//! Resizing: comic.cbz -> resized/comic.rs.cbz
//! 2/25 JPEG (2000, 1500)->(768, 1024) 001.jpg
//! 3/25 PNG (1000, 1400)->(731, 1024) 002.png
//! output resized/other.rs.cbz already exists
//! notes.pdf does not have extension .cbz or .zip
//!
//! Done: 1 written, 2 skipped, 0 failed
//! ```
//!
//! # Architecture
//!
//! Each section has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::batch::BatchReport;
use crate::config::{CONFIG_FILENAME, FileConfig};
use crate::events::BatchEvent;
use image::ImageFormat;
use std::path::Path;

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Upper-case codec name, e.g. `JPEG`, `PNG`, `WEBP`.
fn format_name(format: ImageFormat) -> String {
    format!("{format:?}").to_uppercase()
}

// ============================================================================
// Configuration
// ============================================================================

/// Where the parameters came from, followed by one `key = value` per line.
pub fn format_config(source: Option<&Path>, config: &FileConfig) -> Vec<String> {
    let mut lines = vec![match source {
        Some(path) => format!("Using parameters from {}:", path.display()),
        None => "No configuration file found. Using default parameters:".to_string(),
    }];
    for (key, value) in config.entries() {
        lines.push(format!("{}{} = {}", indent(1), key, value));
    }
    lines
}

pub fn print_config(source: Option<&Path>, config: &FileConfig) {
    for line in format_config(source, config) {
        println!("{}", line);
    }
}

/// Tell the user about the sample config written for them.
pub fn format_sample_hint(path: &Path, created: bool) -> Vec<String> {
    let mut lines = Vec::new();
    if created {
        lines.push(format!("Create sample config file {}", path.display()));
    }
    lines.push(format!(
        "Rename {} to {} and edit it to change the defaults.",
        path.display(),
        CONFIG_FILENAME
    ));
    lines.push("Flags always override config file parameters.".to_string());
    lines
}

pub fn print_sample_hint(path: &Path, created: bool) {
    for line in format_sample_hint(path, created) {
        println!("{}", line);
    }
}

// ============================================================================
// Batch
// ============================================================================

/// Format a single batch event as display lines.
pub fn format_event(event: &BatchEvent) -> Vec<String> {
    match event {
        BatchEvent::Resizing { input, output } => {
            vec![format!(
                "Resizing: {} -> {}",
                input.display(),
                output.display()
            )]
        }
        BatchEvent::PageResized {
            index,
            total,
            format,
            original,
            resized,
            name,
        } => vec![format!(
            "{}/{} {} {}->{} {}",
            index,
            total,
            format_name(*format),
            original,
            resized,
            name
        )],
        BatchEvent::AlreadyExists { output } => {
            vec![format!("output {} already exists", output.display())]
        }
        BatchEvent::NotAnArchive { path } => {
            vec![format!(
                "{} does not have extension .cbz or .zip",
                path.display()
            )]
        }
        BatchEvent::Failed { path, message } => {
            vec![format!("{}: {}", path.display(), message)]
        }
    }
}

/// Totals line, plus a pointer to the error log when anything failed.
pub fn format_summary(report: &BatchReport, error_log: &Path) -> Vec<String> {
    let mut lines = vec![format!(
        "Done: {} written, {} skipped, {} failed",
        report.written(),
        report.skipped(),
        report.failed()
    )];
    if report.failed() > 0 {
        lines.push(format!("{}Details in {}", indent(1), error_log.display()));
    }
    lines
}

pub fn print_summary(report: &BatchReport, error_log: &Path) {
    println!();
    for line in format_summary(report, error_log) {
        println!("{}", line);
    }
}
