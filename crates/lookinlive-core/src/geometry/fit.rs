//! Fill-crop: choose the part of a frame that fills a viewport without borders.
//!
//! The longer source dimension (relative to the viewport's aspect ratio) is
//! cropped symmetrically; the other dimension is kept whole. Stretching the
//! result over the viewport therefore neither distorts nor letterboxes.
//!
//! # Example
//!
//! ```ignore
//! // Landscape 1080p frame shown on a portrait phone screen
//! let source = FrameExtent::from_size(1920.0, 1080.0);
//! let screen = FrameExtent::from_size(750.0, 1334.0);
//! let rect = fit_crop(&source, &screen)?;
//! assert_eq!(rect.height, 1080.0);
//! ```

use super::{DrawRect, FrameExtent, GeometryError};

/// Relative tolerance under which two aspect ratios count as equal.
///
/// Ratios of integer pixel sizes divide exactly, so equal ratios compare
/// equal anyway; the tolerance keeps a crop's own output stable when it is
/// fed back in.
const ASPECT_EPSILON: f64 = 1e-9;

/// Compute the centered sub-rectangle of `source` whose aspect ratio matches
/// `destination`.
///
/// # Arguments
///
/// * `source` - Bounds of the frame being displayed
/// * `destination` - Bounds of the viewport it is stretched over
///
/// # Returns
///
/// A `DrawRect` inside `source`: full height and centered horizontally when
/// the source is relatively wider, otherwise full width and centered
/// vertically. Equal aspect ratios return `source` unchanged.
///
/// # Errors
///
/// `GeometryError::InvalidExtent` if either extent has a non-positive or
/// non-finite width or height.
pub fn fit_crop(source: &FrameExtent, destination: &FrameExtent) -> Result<DrawRect, GeometryError> {
    source.validate()?;
    destination.validate()?;

    let source_aspect = source.aspect();
    let dest_aspect = destination.aspect();

    // Fast path: nothing to crop
    if (source_aspect - dest_aspect).abs() <= ASPECT_EPSILON * dest_aspect {
        return Ok(*source);
    }

    if source_aspect > dest_aspect {
        // Use full height of the frame, center crop the width
        let width = source.height * dest_aspect;
        Ok(FrameExtent {
            x: source.x + (source.width - width) / 2.0,
            y: source.y,
            width,
            height: source.height,
        })
    } else {
        // Use full width of the frame, center crop the height
        let height = source.width / dest_aspect;
        Ok(FrameExtent {
            x: source.x,
            y: source.y + (source.height - height) / 2.0,
            width: source.width,
            height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected} (±{tolerance}), got {actual}"
        );
    }

    #[test]
    fn test_landscape_frame_on_portrait_screen() {
        let source = FrameExtent::from_size(1920.0, 1080.0);
        let screen = FrameExtent::from_size(750.0, 1334.0);
        let rect = fit_crop(&source, &screen).unwrap();

        assert_eq!(rect.height, 1080.0);
        assert_eq!(rect.y, 0.0);
        // 1080 * 750 / 1334
        assert_close(rect.width, 607.2, 0.1);
        assert_close(rect.x, 656.4, 0.1);
    }

    #[test]
    fn test_vga_frame_on_widescreen() {
        let source = FrameExtent::from_size(640.0, 480.0);
        let screen = FrameExtent::from_size(1280.0, 720.0);
        let rect = fit_crop(&source, &screen).unwrap();

        assert_eq!(rect.width, 640.0);
        assert_eq!(rect.x, 0.0);
        assert_close(rect.height, 360.0, 1e-9);
        assert_close(rect.y, 60.0, 1e-9);
    }

    #[test]
    fn test_equal_aspect_is_exact_noop() {
        let source = FrameExtent::from_size(1920.0, 1080.0);
        let screen = FrameExtent::from_size(1280.0, 720.0);
        assert_eq!(fit_crop(&source, &screen).unwrap(), source);
    }

    #[test]
    fn test_equal_aspect_repeated_calls_do_not_drift() {
        let screen = FrameExtent::from_size(640.0, 480.0);
        let mut rect = FrameExtent::new(3.0, 7.0, 1024.0, 768.0);
        for _ in 0..100 {
            rect = fit_crop(&rect, &screen).unwrap();
        }
        assert_eq!(rect, FrameExtent::new(3.0, 7.0, 1024.0, 768.0));
    }

    #[test]
    fn test_offset_source_origin() {
        let source = FrameExtent::new(100.0, 50.0, 400.0, 100.0);
        let square = FrameExtent::from_size(10.0, 10.0);
        let rect = fit_crop(&source, &square).unwrap();

        assert_eq!(rect, FrameExtent::new(250.0, 50.0, 100.0, 100.0));
    }

    #[test]
    fn test_tall_source_on_square_viewport() {
        let source = FrameExtent::from_size(100.0, 400.0);
        let square = FrameExtent::from_size(50.0, 50.0);
        let rect = fit_crop(&source, &square).unwrap();

        assert_eq!(rect, FrameExtent::new(0.0, 150.0, 100.0, 100.0));
    }

    #[test]
    fn test_destination_origin_is_ignored() {
        let source = FrameExtent::from_size(400.0, 100.0);
        let a = fit_crop(&source, &FrameExtent::new(0.0, 0.0, 20.0, 10.0)).unwrap();
        let b = fit_crop(&source, &FrameExtent::new(-30.0, 99.0, 20.0, 10.0)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_degenerate_source() {
        let screen = FrameExtent::from_size(10.0, 10.0);
        let err = fit_crop(&FrameExtent::from_size(0.0, 10.0), &screen).unwrap_err();
        assert_eq!(
            err,
            GeometryError::InvalidExtent {
                width: 0.0,
                height: 10.0
            }
        );
    }

    #[test]
    fn test_rejects_degenerate_destination() {
        let source = FrameExtent::from_size(10.0, 10.0);
        assert!(fit_crop(&source, &FrameExtent::from_size(10.0, -1.0)).is_err());
        assert!(fit_crop(&source, &FrameExtent::from_size(f64::NAN, 1.0)).is_err());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
