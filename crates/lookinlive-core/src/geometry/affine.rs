//! 2D affine transforms for rotating and mirroring the preview.
//!
//! A transform is stored as the matrix
//!
//! ```text
//! | a   b   0 |
//! | c   d   0 |
//! | tx  ty  1 |
//! ```
//!
//! and points are row vectors: `[x y 1] * M`. Concatenation `t1.concat(t2)`
//! therefore applies `t1` first, then `t2`.

use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

/// Tolerance used when snapping matrix entries to exact quarter turns.
const SNAP_EPSILON: f64 = 1e-9;

/// A 2D affine transform (rotation, scale and translation).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform2D {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Default for AffineTransform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A transform expressed as whole clockwise quarter turns followed by an
/// optional horizontal mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuarterTurn {
    /// Clockwise quarter turns (0-3).
    pub turns: u8,
    /// Horizontal mirror applied after the rotation.
    pub mirror: bool,
}

impl QuarterTurn {
    /// Whether the output swaps width and height.
    pub fn swaps_axes(self) -> bool {
        self.turns % 2 == 1
    }
}

impl AffineTransform2D {
    /// The neutral transform.
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    /// Rotation by `radians` about the origin.
    ///
    /// With y pointing down, positive angles turn clockwise on screen.
    pub fn rotation(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// Axis scale about the origin.
    pub fn scale(sx: f64, sy: f64) -> Self {
        Self {
            a: sx,
            d: sy,
            ..Self::IDENTITY
        }
    }

    /// Pure translation.
    pub fn translation(tx: f64, ty: f64) -> Self {
        Self {
            tx,
            ty,
            ..Self::IDENTITY
        }
    }

    /// Horizontal mirror: `scale(-1, 1)`.
    pub fn flip_x() -> Self {
        Self::scale(-1.0, 1.0)
    }

    /// Apply `self`, then `other`.
    pub fn concat(&self, other: &Self) -> Self {
        Self {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            tx: self.tx * other.a + self.ty * other.c + other.tx,
            ty: self.tx * other.b + self.ty * other.d + other.ty,
        }
    }

    /// Map a point through the transform.
    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.tx,
            self.b * x + self.d * y + self.ty,
        )
    }

    /// Determinant of the linear part. Negative means the transform mirrors.
    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Component-wise comparison within `tolerance`.
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        (self.a - other.a).abs() <= tolerance
            && (self.b - other.b).abs() <= tolerance
            && (self.c - other.c).abs() <= tolerance
            && (self.d - other.d).abs() <= tolerance
            && (self.tx - other.tx).abs() <= tolerance
            && (self.ty - other.ty).abs() <= tolerance
    }

    /// Classify the linear part as quarter turns plus an optional mirror.
    ///
    /// Returns `None` when the transform translates, scales by anything other
    /// than ±1, or rotates by a non-multiple of 90°.
    pub fn quarter_turn(&self) -> Option<QuarterTurn> {
        if self.tx.abs() > SNAP_EPSILON || self.ty.abs() > SNAP_EPSILON {
            return None;
        }

        let det = self.determinant();
        if (det.abs() - 1.0).abs() > SNAP_EPSILON {
            return None;
        }

        // Strip a trailing mirror to recover the pure rotation
        let mirror = det < 0.0;
        let rotation = if mirror {
            self.concat(&Self::flip_x())
        } else {
            *self
        };

        let angle = rotation.b.atan2(rotation.a);
        let quarters = angle / FRAC_PI_2;
        let snapped = quarters.round();
        if (quarters - snapped).abs() > SNAP_EPSILON {
            return None;
        }

        Some(QuarterTurn {
            turns: (snapped as i64).rem_euclid(4) as u8,
            mirror,
        })
    }
}
