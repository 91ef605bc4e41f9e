//! Frame geometry: extents, fill-crop and 2D affine transforms.
//!
//! # Coordinate System
//!
//! - All extents are in pixels, stored as `f64`
//! - Origin is the top-left corner, y grows downward
//! - Affine transforms use the row-vector convention: a point `(x, y)` maps to
//!   `(a*x + c*y + tx, b*x + d*y + ty)`, so a positive rotation angle turns
//!   clockwise on screen

mod affine;
mod fit;

pub use affine::{AffineTransform2D, QuarterTurn};
pub use fit::fit_crop;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from geometry computations.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeometryError {
    /// Width or height is zero, negative or not finite.
    #[error("Invalid extent: width ({width}) and height ({height}) must be positive and finite")]
    InvalidExtent { width: f64, height: f64 },
}

/// A rectangle in pixel units: the bounds of a source frame or a viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameExtent {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

/// The sub-region of a source extent that gets stretched over the viewport.
pub type DrawRect = FrameExtent;

impl FrameExtent {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// An extent anchored at the origin.
    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Width divided by height.
    #[inline]
    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }

    /// Right edge.
    #[inline]
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    #[inline]
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// Check that the extent can take part in a fit computation.
    pub fn validate(&self) -> Result<(), GeometryError> {
        let usable = |v: f64| v.is_finite() && v > 0.0;
        if usable(self.width) && usable(self.height) {
            Ok(())
        } else {
            Err(GeometryError::InvalidExtent {
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Whether `other` lies entirely inside this extent.
    pub fn contains(&self, other: &FrameExtent) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.max_x() <= self.max_x()
            && other.max_y() <= self.max_y()
    }
}
