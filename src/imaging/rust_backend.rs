//! Codec backend on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `ImageReader::into_dimensions` (header only) |
//! | Decode (JPEG, PNG, GIF, WebP) | `ImageReader::decode`, format sniffed from content |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` |
//! | Rotate | `DynamicImage::rotate90` / `rotate270`, after resizing |
//! | Encode JPEG, PNG, GIF | `DynamicImage::write_to` in the detected source format |
//! | Encode WebP | `webp::Encoder` (libwebp), lossy at quality 80 |
//!
//! `image` only writes lossless WebP, which can come out several times larger
//! than a lossy source even after downscaling.

use super::backend::{BackendError, Dimensions, ImageBackend, ResizedImage};
use super::calculations::{fit_within, rotated_dimensions};
use super::params::{ResizeParams, Rotation};
use image::imageops::FilterType;
use image::{ColorType, DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;

/// Lossy WebP quality, 0-100.
const WEBP_QUALITY: f32 = 80.0;

/// Backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Sniff the format from the bytes; the entry name is not trusted.
fn reader_for(data: &[u8]) -> Result<(ImageReader<Cursor<&[u8]>>, ImageFormat), BackendError> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| BackendError::Decode(e.to_string()))?;
    let format = reader
        .format()
        .ok_or_else(|| BackendError::Decode("unrecognized image data".into()))?;
    Ok((reader, format))
}

fn rotate(img: DynamicImage, rotation: Rotation) -> DynamicImage {
    // `image` rotates clockwise; angles here are counter-clockwise.
    match rotation {
        Rotation::None => img,
        Rotation::Left => img.rotate270(),
        Rotation::Right => img.rotate90(),
    }
}

/// Convert to a color layout the target encoder accepts.
fn prepare_for(img: DynamicImage, format: ImageFormat) -> DynamicImage {
    match format {
        ImageFormat::Jpeg => match img.color() {
            ColorType::L8 | ColorType::Rgb8 => img,
            _ => DynamicImage::ImageRgb8(img.to_rgb8()),
        },
        ImageFormat::Gif | ImageFormat::WebP => match img.color() {
            ColorType::Rgb8 | ColorType::Rgba8 => img,
            _ => DynamicImage::ImageRgba8(img.to_rgba8()),
        },
        _ => img,
    }
}

fn encode(img: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>, BackendError> {
    if format == ImageFormat::WebP {
        let encoder = webp::Encoder::from_image(img)
            .map_err(|e| BackendError::Encode(format!("WebP: {e}")))?;
        return Ok(encoder.encode(WEBP_QUALITY).to_vec());
    }
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, format)
        .map_err(|e| BackendError::Encode(format!("{format:?}: {e}")))?;
    Ok(buffer.into_inner())
}

impl ImageBackend for RustBackend {
    fn identify(&self, data: &[u8]) -> Result<Dimensions, BackendError> {
        let (reader, _) = reader_for(data)?;
        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok(Dimensions { width, height })
    }

    fn resize(&self, data: &[u8], params: &ResizeParams) -> Result<ResizedImage, BackendError> {
        let (mut reader, format) = reader_for(data)?;
        // Scanned double pages routinely exceed the default allocation limits.
        reader.no_limits();
        let img = reader
            .decode()
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        let original = Dimensions::new(img.width(), img.height());

        // Fit the page as it will stand after the turn, then scale the
        // unrotated pixels to the matching size. A quarter turn only moves
        // pixels, so rotating the smaller image gives the same result.
        let fitted = fit_within(
            rotated_dimensions(original.as_tuple(), params.rotation),
            params.target,
        );
        let (width, height) = rotated_dimensions(fitted, params.rotation);
        let scaled = if (width, height) == original.as_tuple() {
            img
        } else {
            img.resize_exact(width, height, FilterType::Lanczos3)
        };

        let out = prepare_for(rotate(scaled, params.rotation), format);
        let data = encode(&out, format)?;
        Ok(ResizedImage {
            data,
            format,
            original,
            resized: Dimensions::new(out.width(), out.height()),
        })
    }
}
