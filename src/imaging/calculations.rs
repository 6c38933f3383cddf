//! Pure calculation functions for page dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::{BoundingBox, Rotation};

/// Calculate the largest size with the source aspect ratio that fits `target`.
///
/// Never enlarges: a source that already fits on both axes is returned
/// unchanged. Each resulting side is at least 1 pixel.
///
/// # Arguments
/// * `source` - Original page dimensions (width, height)
/// * `target` - Box the result must fit in
///
/// # Examples
/// ```
/// # use resizecbz::imaging::{BoundingBox, fit_within};
/// // 2000x1500 into 1024x1024 → width is the limiting side
/// assert_eq!(fit_within((2000, 1500), BoundingBox::square(1024)), (1024, 768));
///
/// // Already small enough → untouched
/// assert_eq!(fit_within((600, 800), BoundingBox::square(1024)), (600, 800));
/// ```
pub fn fit_within(source: (u32, u32), target: BoundingBox) -> (u32, u32) {
    let (src_w, src_h) = source;
    if src_w == 0 || src_h == 0 || target.contains(src_w, src_h) {
        return source;
    }

    let scale_w = target.width as f64 / src_w as f64;
    let scale_h = target.height as f64 / src_h as f64;

    if scale_w <= scale_h {
        // Width is the limiting side
        let w = target.width;
        let h = (src_h as f64 * scale_w).round() as u32;
        (w, h.clamp(1, target.height))
    } else {
        // Height is the limiting side
        let h = target.height;
        let w = (src_w as f64 * scale_h).round() as u32;
        (w.clamp(1, target.width), h)
    }
}

/// Dimensions after rotating a page. Quarter turns swap width and height.
pub fn rotated_dimensions(source: (u32, u32), rotation: Rotation) -> (u32, u32) {
    match rotation {
        Rotation::None => source,
        Rotation::Left | Rotation::Right => (source.1, source.0),
    }
}
