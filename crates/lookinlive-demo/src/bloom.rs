//! Bloom: bright areas bleed a soft glow into their surroundings.
//!
//! The frame is thresholded, blurred, and the blurred highlights are added
//! back on top with saturation at 255.

use image::{imageops, Rgb, RgbImage};
use lookinlive_core::{FrameFilter, FrameImage};

/// Bloom filter for the preview.
#[derive(Debug, Clone, Copy)]
pub struct Bloom {
    /// Strength of the added glow.
    pub intensity: f32,
    /// Gaussian blur sigma in pixels.
    pub radius: f32,
    /// Channel values at or below this do not glow.
    pub threshold: u8,
}

impl Bloom {
    pub fn new(intensity: f32) -> Self {
        Self {
            intensity,
            radius: 8.0,
            threshold: 160,
        }
    }
}

impl FrameFilter for Bloom {
    fn apply(&self, frame: FrameImage) -> Option<FrameImage> {
        let Some(img) = frame.to_rgb_image() else {
            tracing::warn!("Bloom: malformed {}x{} frame", frame.width, frame.height);
            return None;
        };

        let threshold = self.threshold;
        let highlights = RgbImage::from_fn(img.width(), img.height(), |x, y| {
            let Rgb(px) = *img.get_pixel(x, y);
            Rgb(px.map(|c| c.saturating_sub(threshold)))
        });
        let glow = imageops::blur(&highlights, self.radius);

        let mut out = img;
        for (dst, src) in out.pixels_mut().zip(glow.pixels()) {
            for (d, s) in dst.0.iter_mut().zip(src.0) {
                let added = f32::from(*d) + f32::from(s) * self.intensity;
                *d = added.round().min(255.0) as u8;
            }
        }

        Some(FrameImage::from_rgb_image(out))
    }
}
