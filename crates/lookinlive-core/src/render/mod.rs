//! Render sinks: where filtered frames end up.
//!
//! A sink receives the filtered frame, the part of it to show (`DrawRect`),
//! the current preview transform and the viewport it fills. Sinks run on the
//! pipeline's single rendering thread, so they never see concurrent calls.
//!
//! [`SoftwareSink`] is a CPU implementation on top of the `image` crate, used
//! by the demo and by tests. Platform sinks (GPU blits) implement the same
//! trait outside this crate.

mod software;

pub use software::{ScreenHandle, SoftwareSink};

use crate::frame::FrameImage;
use crate::geometry::{AffineTransform2D, DrawRect, FrameExtent};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from drawing a frame.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    /// The sink cannot express this transform.
    #[error("Unsupported preview transform: {0:?}")]
    UnsupportedTransform(AffineTransform2D),

    /// The draw rectangle covers no whole pixel of the frame.
    #[error("Draw rectangle {0:?} selects no pixels")]
    EmptyRegion(DrawRect),

    /// Pixel data does not match the frame dimensions.
    #[error("Invalid frame buffer: {0}")]
    Buffer(String),
}

/// Destination of rendered frames.
pub trait RenderSink: Send {
    /// Size of the drawable surface in pixels, before the preview transform.
    fn drawable_extent(&self) -> FrameExtent;

    /// Draw the `draw_rect` region of `image` over the whole `viewport`,
    /// with `transform` applied to the view.
    fn render(
        &mut self,
        image: &FrameImage,
        draw_rect: DrawRect,
        transform: &AffineTransform2D,
        viewport: FrameExtent,
    ) -> Result<(), RenderError>;
}

/// Filter type for scaling the draw rectangle onto the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    #[default]
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_type_conversion() {
        assert!(matches!(
            FilterType::Nearest.to_image_filter(),
            image::imageops::FilterType::Nearest
        ));
        assert!(matches!(
            FilterType::Bilinear.to_image_filter(),
            image::imageops::FilterType::Triangle
        ));
        assert!(matches!(
            FilterType::Lanczos3.to_image_filter(),
            image::imageops::FilterType::Lanczos3
        ));
    }

    #[test]
    fn test_render_error_display() {
        let err = RenderError::Buffer("short".to_string());
        assert_eq!(err.to_string(), "Invalid frame buffer: short");
    }
}
