//! LookinLive Core - live camera preview pipeline
//!
//! This crate turns camera frames into an on-screen preview: each frame is
//! run through a user filter, fill-cropped to the viewport's aspect ratio and
//! drawn with a transform that follows the device's orientation and the
//! active camera.

pub mod config;
pub mod device;
pub mod frame;
pub mod geometry;
pub mod orientation;
pub mod pipeline;
pub mod render;

pub use config::{CapturePreset, ConfigError, PipelineConfig};
pub use device::{CaptureDevice, DeviceError, DeviceProvider};
pub use frame::FrameImage;
pub use geometry::{fit_crop, AffineTransform2D, DrawRect, FrameExtent, GeometryError};
pub use orientation::{
    resolve_sensor_code, resolve_transform, CameraFacing, DeviceOrientation, InterfaceOrientation,
    SensorCode,
};
pub use pipeline::{Delivery, FrameFilter, FrameSender, OrientationNotifier, Pipeline, PipelineError};
pub use render::{FilterType, RenderError, RenderSink, ScreenHandle, SoftwareSink};
