//! Camera hardware as seen by the pipeline.
//!
//! Device discovery, session setup and torch hardware live outside this
//! crate. The pipeline only needs to open a camera for a facing, ask whether
//! it supports a preset, and drive the torch. The torch helpers here apply the
//! guards that hold regardless of platform: only the back camera's torch is
//! driven, and levels must be in `(0, 1]`.

use crate::config::CapturePreset;
use crate::orientation::CameraFacing;
use thiserror::Error;

/// Errors reported by a capture device.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    /// The device refused a configuration change.
    #[error("Device configuration failed: {0}")]
    Configuration(String),
}

/// An opened camera.
pub trait CaptureDevice: Send {
    /// Which way this camera faces.
    fn facing(&self) -> CameraFacing;

    /// Whether the camera can deliver frames at `preset`.
    fn supports_preset(&self, preset: CapturePreset) -> bool;

    /// Whether the camera has a torch.
    fn has_torch(&self) -> bool;

    /// Whether the torch is currently on.
    fn torch_active(&self) -> bool;

    /// Turn the torch on at `level`. Returns the device's success flag.
    fn set_torch_level(&mut self, level: f32) -> Result<bool, DeviceError>;

    /// Turn the torch off.
    fn torch_off(&mut self) -> Result<(), DeviceError>;
}

/// Opens cameras by facing.
pub trait DeviceProvider: Send {
    /// Open the first camera facing `facing`, or `None` if there is none.
    fn open(&mut self, facing: CameraFacing) -> Option<Box<dyn CaptureDevice>>;
}

/// The torch is only driven on a back camera that has one.
fn torch_usable(device: &dyn CaptureDevice) -> bool {
    device.has_torch() && device.facing() == CameraFacing::Back
}

/// Flip the torch: off if it is on, otherwise on at `level`.
///
/// Returns whether the torch is on afterwards.
pub fn toggle_torch(device: &mut dyn CaptureDevice, level: f32) -> bool {
    if !torch_usable(device) {
        return false;
    }

    if device.torch_active() {
        if let Err(e) = device.torch_off() {
            tracing::warn!("Failed to turn torch off: {}", e);
        }
        false
    } else {
        device.set_torch_level(level).unwrap_or_else(|e| {
            tracing::warn!("Failed to turn torch on: {}", e);
            false
        })
    }
}

/// Turn the torch on at `level`, which must be in `(0, 1]`.
///
/// Returns the device's result, or `false` when the call is not allowed.
pub fn set_torch_level(device: &mut dyn CaptureDevice, level: f32) -> bool {
    if !torch_usable(device) || !(level > 0.0 && level <= 1.0) {
        return false;
    }

    device.set_torch_level(level).unwrap_or_else(|e| {
        tracing::warn!("Failed to set torch level {}: {}", level, e);
        false
    })
}

/// Turn the torch off if it is on.
pub fn turn_off_torch(device: &mut dyn CaptureDevice) {
    if device.has_torch() && device.torch_active() {
        if let Err(e) = device.torch_off() {
            tracing::warn!("Failed to turn torch off: {}", e);
        }
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Observable state of a mock camera, shared with the test.
    #[derive(Debug, Default)]
    pub struct MockState {
        pub torch_level: Option<f32>,
        pub torch_calls: usize,
    }

    pub struct MockDevice {
        pub facing: CameraFacing,
        pub has_torch: bool,
        pub presets: Vec<CapturePreset>,
        pub fail_torch: bool,
        pub state: Arc<Mutex<MockState>>,
    }

    impl MockDevice {
        pub fn new(facing: CameraFacing) -> Self {
            Self {
                facing,
                has_torch: true,
                presets: vec![CapturePreset::Medium, CapturePreset::Res640x480],
                fail_torch: false,
                state: Arc::new(Mutex::new(MockState::default())),
            }
        }
    }

    impl CaptureDevice for MockDevice {
        fn facing(&self) -> CameraFacing {
            self.facing
        }

        fn supports_preset(&self, preset: CapturePreset) -> bool {
            self.presets.contains(&preset)
        }

        fn has_torch(&self) -> bool {
            self.has_torch
        }

        fn torch_active(&self) -> bool {
            self.state.lock().torch_level.is_some()
        }

        fn set_torch_level(&mut self, level: f32) -> Result<bool, DeviceError> {
            let mut state = self.state.lock();
            state.torch_calls += 1;
            if self.fail_torch {
                return Err(DeviceError::Configuration("locked".to_string()));
            }
            state.torch_level = Some(level);
            Ok(true)
        }

        fn torch_off(&mut self) -> Result<(), DeviceError> {
            let mut state = self.state.lock();
            state.torch_calls += 1;
            state.torch_level = None;
            Ok(())
        }
    }

    /// Provider handing out mock devices; records every open request.
    pub struct MockProvider {
        pub available: Vec<CameraFacing>,
        pub presets: Vec<CapturePreset>,
        pub opened: Arc<Mutex<Vec<CameraFacing>>>,
        pub state: Arc<Mutex<MockState>>,
    }

    impl MockProvider {
        pub fn new() -> Self {
            Self {
                available: vec![CameraFacing::Back, CameraFacing::Front],
                presets: vec![CapturePreset::Medium, CapturePreset::Res640x480],
                opened: Arc::new(Mutex::new(Vec::new())),
                state: Arc::new(Mutex::new(MockState::default())),
            }
        }
    }

    impl DeviceProvider for MockProvider {
        fn open(&mut self, facing: CameraFacing) -> Option<Box<dyn CaptureDevice>> {
            self.opened.lock().push(facing);
            if !self.available.contains(&facing) {
                return None;
            }
            let mut device = MockDevice::new(facing);
            device.presets = self.presets.clone();
            device.state = Arc::clone(&self.state);
            Some(Box::new(device))
        }
    }
}
