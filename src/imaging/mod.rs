//! Page processing in pure Rust, on the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `ImageReader::into_dimensions` |
//! | **Rotate** | `rotate90` / `rotate270`, canvas grows with the page |
//! | **Resize** | Lanczos3, fit inside a box, never enlarge |
//! | **Encode** | same format as the source |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing page operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: Orientation policy combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend, ResizedImage};
pub use calculations::{fit_within, rotated_dimensions};
pub use operations::{plan_resize, transcode_image};
pub use params::{BoundingBox, ResizeParams, Rotation};
pub use rust_backend::RustBackend;
