//! The live preview pipeline.
//!
//! # Architecture
//!
//! Three contexts cooperate, none of them waiting on another:
//!
//! - **Capture delivery**: the camera pushes frames through a
//!   [`FrameSender`]. A worker thread applies the current [`FrameFilter`].
//! - **Rendering**: one long-lived thread owns the [`RenderSink`], the
//!   viewport and the preview transform. It fits each filtered frame to the
//!   viewport and hands it to the sink.
//! - **Notifications**: the platform reports rotations through an
//!   [`OrientationNotifier`]; the new transform is computed on the rendering
//!   thread, so it may apply one frame late.
//!
//! [`RenderSink`]: crate::render::RenderSink

mod capture;
mod manager;
mod render;

pub use capture::{Delivery, FrameSender};
pub use manager::Pipeline;

use crate::config::{CapturePreset, ConfigError};
use crate::frame::FrameImage;
use crate::geometry::GeometryError;
use crate::orientation::{CameraFacing, DeviceOrientation};
use crossbeam_channel::Sender;
use parking_lot::Mutex;
use render::RenderCommand;
use std::sync::Arc;
use thiserror::Error;

/// Errors from building or starting the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No camera faces the requested way.
    #[error("No {0:?} camera available")]
    NoCaptureDevice(CameraFacing),

    /// The camera cannot deliver the requested preset.
    #[error("Capture preset {0:?} not supported by the camera")]
    UnsupportedPreset(CapturePreset),

    /// The sink reported an unusable drawable size.
    #[error("Invalid viewport: {0}")]
    InvalidViewport(#[from] GeometryError),

    /// The configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A pipeline thread could not be started.
    #[error("Failed to spawn pipeline thread: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Image filter applied to every frame before it is rendered.
///
/// Returning `None` drops the frame: nothing is drawn and the previous frame
/// stays on screen.
pub trait FrameFilter: Send + Sync {
    fn apply(&self, frame: FrameImage) -> Option<FrameImage>;
}

impl<F> FrameFilter for F
where
    F: Fn(FrameImage) -> Option<FrameImage> + Send + Sync,
{
    fn apply(&self, frame: FrameImage) -> Option<FrameImage> {
        self(frame)
    }
}

/// Handle for reporting device rotations to a pipeline.
///
/// Notifications only reach the pipeline while it is running; the
/// subscription is made on start and dropped on stop.
#[derive(Clone, Default)]
pub struct OrientationNotifier {
    target: Arc<Mutex<Option<Sender<RenderCommand>>>>,
}

impl OrientationNotifier {
    /// Report a new device orientation. Returns whether it was delivered.
    pub fn notify(&self, orientation: DeviceOrientation) -> bool {
        match self.target.lock().as_ref() {
            Some(tx) => tx.send(RenderCommand::Orientation(orientation)).is_ok(),
            None => {
                tracing::trace!("Pipeline stopped, ignoring orientation {:?}", orientation);
                false
            }
        }
    }

    /// Whether notifications currently reach a running pipeline.
    pub fn is_subscribed(&self) -> bool {
        self.target.lock().is_some()
    }

    fn subscribe(&self, tx: Sender<RenderCommand>) {
        *self.target.lock() = Some(tx);
    }

    fn unsubscribe(&self) {
        self.target.lock().take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    #[test]
    fn test_closure_is_a_filter() {
        let invert = |mut frame: FrameImage| {
            frame.pixels.iter_mut().for_each(|p| *p = 255 - *p);
            Some(frame)
        };
        let out = invert.apply(FrameImage::solid(1, 1, [0, 10, 255])).unwrap();
        assert_eq!(out.pixels, vec![255, 245, 0]);
    }

    #[test]
    fn test_notifier_subscription() {
        let notifier = OrientationNotifier::default();
        assert!(!notifier.notify(DeviceOrientation::Portrait));

        let (tx, rx) = unbounded();
        notifier.subscribe(tx);
        assert!(notifier.is_subscribed());
        assert!(notifier.clone().notify(DeviceOrientation::LandscapeLeft));
        assert!(matches!(
            rx.try_recv(),
            Ok(RenderCommand::Orientation(DeviceOrientation::LandscapeLeft))
        ));

        notifier.unsubscribe();
        assert!(!notifier.notify(DeviceOrientation::Portrait));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_error_display() {
        let err = PipelineError::NoCaptureDevice(CameraFacing::Front);
        assert_eq!(err.to_string(), "No Front camera available");

        let err = PipelineError::UnsupportedPreset(CapturePreset::Photo);
        assert_eq!(err.to_string(), "Capture preset Photo not supported by the camera");
    }
}
