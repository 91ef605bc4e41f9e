//! Synthetic camera: a device provider with no hardware behind it and a
//! moving test pattern to feed the pipeline.

use lookinlive_core::{CameraFacing, CaptureDevice, CapturePreset, DeviceError, DeviceProvider, FrameImage};
use parking_lot::Mutex;
use std::sync::Arc;

/// Color bars, left to right.
const BARS: [[u8; 3]; 7] = [
    [192, 192, 192],
    [192, 192, 0],
    [0, 192, 192],
    [0, 192, 0],
    [192, 0, 192],
    [192, 0, 0],
    [0, 0, 192],
];

/// Opens synthetic cameras for both facings. Only the back camera has a torch.
#[derive(Default)]
pub struct SyntheticProvider {
    torch: Arc<Mutex<Option<f32>>>,
}

impl SyntheticProvider {
    /// Current torch level, shared by every camera this provider opened.
    pub fn torch_level(&self) -> Arc<Mutex<Option<f32>>> {
        Arc::clone(&self.torch)
    }
}

impl DeviceProvider for SyntheticProvider {
    fn open(&mut self, facing: CameraFacing) -> Option<Box<dyn CaptureDevice>> {
        tracing::info!("Opening synthetic {:?} camera", facing);
        Some(Box::new(SyntheticCamera {
            facing,
            torch: Arc::clone(&self.torch),
        }))
    }
}

struct SyntheticCamera {
    facing: CameraFacing,
    torch: Arc<Mutex<Option<f32>>>,
}

impl CaptureDevice for SyntheticCamera {
    fn facing(&self) -> CameraFacing {
        self.facing
    }

    fn supports_preset(&self, preset: CapturePreset) -> bool {
        // Still-photo capture is not a video format
        preset != CapturePreset::Photo
    }

    fn has_torch(&self) -> bool {
        self.facing == CameraFacing::Back
    }

    fn torch_active(&self) -> bool {
        self.torch.lock().is_some()
    }

    fn set_torch_level(&mut self, level: f32) -> Result<bool, DeviceError> {
        if !self.has_torch() {
            return Err(DeviceError::Configuration("no torch on this camera".to_string()));
        }
        *self.torch.lock() = Some(level);
        Ok(true)
    }

    fn torch_off(&mut self) -> Result<(), DeviceError> {
        self.torch.lock().take();
        Ok(())
    }
}

/// Frame size delivered for `preset`. Quality presets map to 720p.
pub fn frame_size(preset: CapturePreset) -> (u32, u32) {
    preset.nominal_size().unwrap_or((1280, 720))
}

/// Color bars with a white square sweeping across them.
///
/// `tick` advances the square; it wraps around the frame width.
pub fn test_pattern(width: u32, height: u32, tick: u64) -> FrameImage {
    let side = (height / 6).max(1);
    let travel = u64::from(width.saturating_sub(side).max(1));
    let square_x = (tick * 8 % travel) as u32;
    let square_y = (height - side) / 2;

    let img = image::RgbImage::from_fn(width, height, |x, y| {
        let inside = x >= square_x && x < square_x + side && y >= square_y && y < square_y + side;
        if inside {
            image::Rgb([255, 255, 255])
        } else {
            let bar = (x as usize * BARS.len()) / width as usize;
            image::Rgb(BARS[bar.min(BARS.len() - 1)])
        }
    });
    FrameImage::from_rgb_image(img)
}
