//! # resizecbz
//!
//! Shrinks comic book archives (`.cbz` / `.zip`) for e-readers and tablets.
//! Every page image is downscaled to fit the target screen, landscape
//! double-pages are optionally rotated, and everything else in the archive
//! is copied untouched.
//!
//! # Architecture
//!
//! ```text
//! paths ─→ batch ─→ writer ─→ archive ─→ imaging
//!           │         │          │          └─ decode, rotate, Lanczos3, re-encode
//!           │         │          └─ entry by entry, order and metadata preserved
//!           │         └─ temp file in the destination dir, rename when complete
//!           └─ naming, skip rules, expected vs fatal failures, error log
//! ```
//!
//! Progress is reported as [`events::BatchEvent`]s over an optional channel;
//! the library itself never prints.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Page geometry and the `ImageBackend` trait with its pure-Rust implementation |
//! | [`archive`] | Rewrites one zip into another, resizing image entries |
//! | [`writer`] | Atomic output: temp file plus rename |
//! | [`batch`] | Per-path rules and the expected/fatal failure split |
//! | [`naming`] | Output file names and wildcard expansion |
//! | [`config`] | `resizecbz.toml` discovery, parsing, command-line overrides |
//! | [`error_log`] | Append-only `resizecbz.error.log` |
//! | [`events`] | Progress events |
//! | [`output`] | Console formatting |
//!
//! # Design Decisions
//!
//! ## Never Upscale
//!
//! A page that already fits its box keeps its pixel size. Upscaling costs
//! space and gains nothing that the reader's own scaler would not do.
//!
//! ## Rotated Pages Use the Portrait Box
//!
//! A landscape double-page that gets rotated ends up portrait, so it is fitted
//! into the portrait box. Only landscape pages kept unrotated use the
//! landscape box.
//!
//! ## Stored Pages, Raw-Copied Everything Else
//!
//! JPEG, PNG, GIF and WebP are already compressed, so resized pages are
//! stored. Every other entry is checksum-verified and then copied raw, with
//! its compressed bytes and header fields untouched.
//!
//! ## Fail Loudly
//!
//! Only a page that does not decode is logged and skipped. A broken zip, a
//! checksum mismatch, a full disk or an encoder failure stops the run with a
//! non-zero exit.

pub mod archive;
pub mod batch;
pub mod config;
pub mod error_log;
pub mod events;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod writer;

#[cfg(test)]
pub(crate) mod test_helpers;
