//! Frame pixel buffers passed through the pipeline.

use crate::geometry::FrameExtent;

/// A video frame with RGB pixel data.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameImage {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGB pixel data in row-major order (3 bytes per pixel).
    /// Length should be width * height * 3.
    pub pixels: Vec<u8>,
}

impl FrameImage {
    /// Create a new FrameImage with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            (width as usize) * (height as usize) * 3,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// A frame filled with a single color.
    pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let pixels = rgb
            .iter()
            .copied()
            .cycle()
            .take((width as usize) * (height as usize) * 3)
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a FrameImage from an image::RgbImage.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img.into_raw();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Convert to an image::RgbImage, or `None` if the buffer length is wrong.
    pub fn to_rgb_image(&self) -> Option<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// Bounds of the frame, anchored at the origin.
    pub fn extent(&self) -> FrameExtent {
        FrameExtent::from_size(self.width as f64, self.height as f64)
    }

    /// The RGB value at (x, y), if inside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + x as usize) * 3;
        self.pixels
            .get(idx..idx + 3)
            .map(|p| [p[0], p[1], p[2]])
    }

    /// Check if this is an empty/invalid frame.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_creation() {
        let frame = FrameImage::new(100, 50, vec![0u8; 100 * 50 * 3]);
        assert_eq!(frame.extent(), FrameExtent::from_size(100.0, 50.0));
        assert!(!frame.is_empty());
    }

    #[test]
    fn test_frame_empty() {
        let frame = FrameImage::new(0, 0, vec![]);
        assert!(frame.is_empty());
    }

    #[test]
    fn test_solid_and_pixel_lookup() {
        let frame = FrameImage::solid(4, 3, [10, 20, 30]);
        assert_eq!(frame.pixels.len(), 36);
        assert_eq!(frame.pixel(3, 2), Some([10, 20, 30]));
        assert_eq!(frame.pixel(4, 0), None);
    }

    #[test]
    fn test_rgb_image_conversion() {
        let mut img = image::RgbImage::new(2, 2);
        img.put_pixel(1, 0, image::Rgb([1, 2, 3]));
        let frame = FrameImage::from_rgb_image(img);
        assert_eq!(frame.pixel(1, 0), Some([1, 2, 3]));

        let back = frame.to_rgb_image().unwrap();
        assert_eq!(back.get_pixel(1, 0).0, [1, 2, 3]);
    }

    #[test]
    fn test_bad_buffer_does_not_convert() {
        let frame = FrameImage {
            width: 4,
            height: 4,
            pixels: vec![0u8; 5],
        };
        assert!(frame.to_rgb_image().is_none());
    }
}
