//! Parameter types for page operations.
//!
//! These structs describe *what* to do with a page, not *how*. The
//! [`operations`](super::operations) module decides them from the run config
//! and the page's dimensions; the [`backend`](super::backend) does the pixel
//! work.
//!
//! ## Types
//!
//! - [`BoundingBox`]: Maximum `(width, height)` a page may occupy after resizing.
//! - [`Rotation`]: Which way wide pages are turned, if at all.
//! - [`ResizeParams`]: Rotation plus target box for one page.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum dimensions an output page may occupy. Both sides are positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    /// A box with both sides equal to `edge` (clamped to at least 1).
    pub fn square(edge: u32) -> Self {
        Self::new(edge, edge)
    }

    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// True when `(width, height)` fits on both axes.
    pub fn contains(self, width: u32, height: u32) -> bool {
        width <= self.width && height <= self.height
    }
}

/// Rotation applied to landscape pages.
///
/// Angles are counter-clockwise: `Left` turns the page 90°, `Right` turns it
/// 270° (a quarter turn clockwise).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    None,
    Left,
    #[default]
    Right,
}

impl Rotation {
    pub fn is_none(self) -> bool {
        self == Rotation::None
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rotation::None => "none",
            Rotation::Left => "left",
            Rotation::Right => "right",
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rotation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Rotation::None),
            "left" => Ok(Rotation::Left),
            "right" => Ok(Rotation::Right),
            other => Err(format!(
                "invalid rotation '{other}', expected left, right or none"
            )),
        }
    }
}

/// What to do with a single page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeParams {
    /// Applied before fitting; the canvas grows to hold the rotated page.
    pub rotation: Rotation,
    /// Box the (possibly rotated) page must fit in.
    pub target: BoundingBox,
}
