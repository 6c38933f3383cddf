//! Image codec backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations the transcoder needs
//! from a codec: identify (header-only dimensions) and resize (decode, rotate,
//! fit, re-encode in the source format).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests use the recording `MockBackend` below.

use super::params::ResizeParams;
use image::ImageFormat;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("cannot decode image: {0}")]
    Decode(String),
    #[error("cannot encode image: {0}")]
    Encode(String),
}

impl BackendError {
    /// Bad page data, as opposed to a codec failure on a page that decoded fine.
    pub fn is_bad_input(&self) -> bool {
        matches!(self, BackendError::Decode(_))
    }
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Landscape pages are strictly wider than tall; squares are portrait.
    pub fn is_wide(self) -> bool {
        self.width > self.height
    }

    pub fn as_tuple(self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl From<(u32, u32)> for Dimensions {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.width, self.height)
    }
}

/// A re-encoded page.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizedImage {
    /// Encoded bytes, same format as the source.
    pub data: Vec<u8>,
    pub format: ImageFormat,
    pub original: Dimensions,
    pub resized: Dimensions,
}

/// Trait for image codec backends.
///
/// Backends work on in-memory bytes: pages come straight out of an archive
/// entry and go straight back into another one.
pub trait ImageBackend {
    /// Read page dimensions without decoding pixel data.
    fn identify(&self, data: &[u8]) -> Result<Dimensions, BackendError>;

    /// Decode, rotate (canvas expands), fit into `params.target` and re-encode
    /// in the detected source format.
    fn resize(&self, data: &[u8], params: &ResizeParams) -> Result<ResizedImage, BackendError>;
}
