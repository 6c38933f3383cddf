//! High-level page operations.
//!
//! Combines the pure calculations with an [`ImageBackend`]: decide from the
//! page's orientation whether it is rotated and which box it must fit, then
//! hand the work to the backend.

use super::backend::{BackendError, Dimensions, ImageBackend, ResizedImage};
use super::params::{ResizeParams, Rotation};
use crate::config::ResizeConfig;

/// Decide rotation and target box for a page of the given size.
///
/// - Wide pages (`width > height`) with a rotation configured are turned
///   and fitted into the portrait box, since they stand upright afterwards.
/// - Wide pages without rotation are fitted into the landscape box.
/// - Portrait and square pages are never rotated and use the portrait box.
pub fn plan_resize(dims: Dimensions, config: &ResizeConfig) -> ResizeParams {
    if !dims.is_wide() {
        return ResizeParams {
            rotation: Rotation::None,
            target: config.portrait_box,
        };
    }
    let target = if config.rotation.is_none() {
        config.landscape_box
    } else {
        config.portrait_box
    };
    ResizeParams {
        rotation: config.rotation,
        target,
    }
}

/// Resize one encoded page according to `config`.
///
/// The result keeps the source format. Decode failures are returned, never
/// swallowed.
pub fn transcode_image(
    backend: &impl ImageBackend,
    data: &[u8],
    config: &ResizeConfig,
) -> Result<ResizedImage, BackendError> {
    let dims = backend.identify(data)?;
    let params = plan_resize(dims, config);
    backend.resize(data, &params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::imaging::params::BoundingBox;

    fn config(rotation: Rotation) -> ResizeConfig {
        ResizeConfig {
            landscape_box: BoundingBox::square(768),
            portrait_box: BoundingBox::square(1024),
            rotation,
            ..ResizeConfig::default()
        }
    }

    #[test]
    fn wide_page_rotated_uses_portrait_box() {
        for rotation in [Rotation::Left, Rotation::Right] {
            let params = plan_resize(Dimensions::new(2000, 1500), &config(rotation));
            assert_eq!(params.rotation, rotation);
            assert_eq!(params.target, BoundingBox::square(1024));
        }
    }

    #[test]
    fn wide_page_unrotated_uses_landscape_box() {
        let params = plan_resize(Dimensions::new(2000, 1500), &config(Rotation::None));
        assert_eq!(params.rotation, Rotation::None);
        assert_eq!(params.target, BoundingBox::square(768));
    }

    #[test]
    fn portrait_page_never_rotates() {
        for rotation in [Rotation::None, Rotation::Left, Rotation::Right] {
            let params = plan_resize(Dimensions::new(1000, 1400), &config(rotation));
            assert_eq!(params.rotation, Rotation::None);
            assert_eq!(params.target, BoundingBox::square(1024));
        }
    }

    #[test]
    fn square_page_takes_portrait_path() {
        let params = plan_resize(Dimensions::new(1500, 1500), &config(Rotation::Left));
        assert_eq!(params.rotation, Rotation::None);
        assert_eq!(params.target, BoundingBox::square(1024));
    }

    #[test]
    fn transcode_identifies_then_resizes() {
        let backend = MockBackend::new();
        let out = transcode_image(&backend, b"2000x1500", &config(Rotation::Right)).unwrap();
        assert_eq!(out.resized, Dimensions::new(768, 1024));

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 2);
        assert!(matches!(&ops[0], RecordedOp::Identify(_)));
        assert!(matches!(
            &ops[1],
            RecordedOp::Resize {
                rotation: Rotation::Right,
                width: 1024,
                height: 1024,
                ..
            }
        ));
    }

    #[test]
    fn transcode_propagates_decode_error() {
        let backend = MockBackend::new();
        let err = transcode_image(&backend, b"", &config(Rotation::Right)).unwrap_err();
        assert!(err.is_bad_input());
        // Nothing was resized
        assert_eq!(backend.resize_count(), 0);
    }
}
