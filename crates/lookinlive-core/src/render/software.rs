//! CPU render sink backed by an in-memory RGB screen.
//!
//! Rendering happens in three steps:
//! 1. Crop the draw rectangle out of the frame (rounded to whole pixels)
//! 2. Resize the crop to the viewport
//! 3. Apply the preview transform as quarter turns plus an optional mirror
//!
//! Step 3 rotates the whole screen, so a 90° transform on a 750x1334 viewport
//! leaves a 1334x750 screen, the same way rotating a view swaps its on-screen
//! bounds.

use super::{FilterType, RenderError, RenderSink};
use crate::frame::FrameImage;
use crate::geometry::{AffineTransform2D, DrawRect, FrameExtent, QuarterTurn};
use image::{imageops, Rgb, RgbImage};
use parking_lot::Mutex;
use std::sync::Arc;

/// Grey shown before the first frame arrives.
const CLEAR_COLOR: Rgb<u8> = Rgb([128, 128, 128]);

/// Shared view of the software sink's screen.
///
/// The sink itself moves onto the rendering thread; keep a handle to look at
/// what it drew.
#[derive(Debug, Clone)]
pub struct ScreenHandle {
    screen: Arc<Mutex<RgbImage>>,
}

impl ScreenHandle {
    /// Copy of the current screen contents.
    pub fn snapshot(&self) -> FrameImage {
        FrameImage::from_rgb_image(self.screen.lock().clone())
    }

    /// Current screen size (after the preview transform).
    pub fn dimensions(&self) -> (u32, u32) {
        self.screen.lock().dimensions()
    }

    /// Write the screen to an image file; the format follows the extension.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<(), image::ImageError> {
        self.screen.lock().save(path)
    }
}

/// Render sink that composes frames into an RGB buffer.
pub struct SoftwareSink {
    drawable: FrameExtent,
    filter: FilterType,
    screen: Arc<Mutex<RgbImage>>,
    frames_rendered: u64,
}

impl SoftwareSink {
    /// A sink whose drawable surface is `width` x `height` pixels.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            drawable: FrameExtent::from_size(width as f64, height as f64),
            filter: FilterType::default(),
            screen: Arc::new(Mutex::new(RgbImage::from_pixel(width, height, CLEAR_COLOR))),
            frames_rendered: 0,
        }
    }

    /// Use `filter` when scaling onto the viewport.
    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    /// Handle for reading the screen from other threads.
    pub fn screen(&self) -> ScreenHandle {
        ScreenHandle {
            screen: Arc::clone(&self.screen),
        }
    }

    /// Number of frames drawn so far.
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Resize the drawable surface, e.g. after a layout change.
    pub fn set_drawable_size(&mut self, width: u32, height: u32) {
        self.drawable = FrameExtent::from_size(width as f64, height as f64);
    }
}

impl RenderSink for SoftwareSink {
    fn drawable_extent(&self) -> FrameExtent {
        self.drawable
    }

    fn render(
        &mut self,
        image: &FrameImage,
        draw_rect: DrawRect,
        transform: &AffineTransform2D,
        viewport: FrameExtent,
    ) -> Result<(), RenderError> {
        let turn = transform
            .quarter_turn()
            .ok_or(RenderError::UnsupportedTransform(*transform))?;

        let source = image.to_rgb_image().ok_or_else(|| {
            RenderError::Buffer(format!(
                "expected {} bytes for {}x{}, got {}",
                (image.width as usize) * (image.height as usize) * 3,
                image.width,
                image.height,
                image.pixels.len()
            ))
        })?;

        let (x, y, w, h) = pixel_region(&draw_rect, image.width, image.height)
            .ok_or(RenderError::EmptyRegion(draw_rect))?;
        let region = imageops::crop_imm(&source, x, y, w, h).to_image();

        let out_w = (viewport.width.round() as u32).max(1);
        let out_h = (viewport.height.round() as u32).max(1);
        let scaled = if (w, h) == (out_w, out_h) {
            region
        } else {
            imageops::resize(&region, out_w, out_h, self.filter.to_image_filter())
        };

        *self.screen.lock() = orient(scaled, turn);
        self.frames_rendered += 1;
        Ok(())
    }
}

/// Round a draw rectangle to whole pixels inside a `width` x `height` frame.
///
/// Returns `(x, y, w, h)`, or `None` if nothing is left.
fn pixel_region(rect: &DrawRect, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
    let clamp_x = |v: f64| v.round().clamp(0.0, width as f64) as u32;
    let clamp_y = |v: f64| v.round().clamp(0.0, height as f64) as u32;

    let left = clamp_x(rect.x);
    let right = clamp_x(rect.max_x());
    let top = clamp_y(rect.y);
    let bottom = clamp_y(rect.max_y());

    let w = right.saturating_sub(left);
    let h = bottom.saturating_sub(top);
    if w == 0 || h == 0 {
        return None;
    }
    Some((left, top, w, h))
}

/// Apply quarter turns, then the mirror.
fn orient(img: RgbImage, turn: QuarterTurn) -> RgbImage {
    let rotated = match turn.turns {
        1 => imageops::rotate90(&img),
        2 => imageops::rotate180(&img),
        3 => imageops::rotate270(&img),
        _ => img,
    };
    if turn.mirror {
        imageops::flip_horizontal(&rotated)
    } else {
        rotated
    }
}
