//! The pipeline object the UI layer owns.

use super::capture::{run_capture_worker, FilterSlot, FrameSender};
use super::render::{RenderCommand, RenderContext};
use super::{FrameFilter, OrientationNotifier, PipelineError};
use crate::config::{CapturePreset, PipelineConfig};
use crate::device::{self, CaptureDevice, DeviceProvider};
use crate::orientation::CameraFacing;
use crate::render::RenderSink;
use crossbeam_channel::bounded;
use parking_lot::RwLock;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Live camera preview: capture, filter, fit and render.
///
/// Created stopped. `start` opens a camera and begins accepting frames on the
/// [`FrameSender`]; `stop` closes it again. The rendering thread lives as long
/// as the pipeline, so the last frame stays on screen across restarts.
pub struct Pipeline {
    config: PipelineConfig,
    devices: Box<dyn DeviceProvider>,
    device: Option<Box<dyn CaptureDevice>>,
    filter: FilterSlot,
    frames: FrameSender,
    orientation: OrientationNotifier,
    render: RenderContext,
    capture: Option<JoinHandle<()>>,
}

impl Pipeline {
    /// Build a stopped pipeline drawing into `sink`.
    ///
    /// # Errors
    ///
    /// - `Config` if the configuration fails validation
    /// - `InvalidViewport` if the sink's drawable size is degenerate
    /// - `Spawn` if the rendering thread cannot be started
    pub fn new(
        config: PipelineConfig,
        devices: Box<dyn DeviceProvider>,
        sink: Box<dyn RenderSink>,
    ) -> Result<Self, PipelineError> {
        config.validate()?;

        let viewport = sink.drawable_extent();
        viewport.validate()?;

        let render = RenderContext::spawn(sink, viewport, config.facing)?;

        Ok(Self {
            config,
            devices,
            device: None,
            filter: Arc::new(RwLock::new(None)),
            frames: FrameSender::default(),
            orientation: OrientationNotifier::default(),
            render,
            capture: None,
        })
    }

    pub fn is_running(&self) -> bool {
        self.capture.is_some()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn camera_facing(&self) -> CameraFacing {
        self.config.facing
    }

    pub fn preset(&self) -> CapturePreset {
        self.config.preset
    }

    /// Handle the capture subsystem pushes frames into.
    pub fn frame_sender(&self) -> FrameSender {
        self.frames.clone()
    }

    /// Handle the platform reports rotations through.
    pub fn orientation_notifier(&self) -> OrientationNotifier {
        self.orientation.clone()
    }

    /// Replace the frame filter. Frames already being filtered keep the old
    /// one; the new filter applies from the next frame.
    pub fn set_filter<F>(&self, filter: F)
    where
        F: FrameFilter + 'static,
    {
        let filter: Arc<dyn FrameFilter> = Arc::new(filter);
        *self.filter.write() = Some(filter);
    }

    /// Remove the filter. Without a filter every frame is dropped.
    pub fn clear_filter(&self) {
        self.filter.write().take();
    }

    /// Open the camera and start accepting frames.
    ///
    /// Starting a running pipeline does nothing.
    ///
    /// # Errors
    ///
    /// - `NoCaptureDevice` if no camera has the configured facing
    /// - `UnsupportedPreset` if the camera cannot deliver the configured preset
    /// - `Spawn` if the capture worker cannot be started
    ///
    /// On error the pipeline stays stopped and the screen keeps its last frame.
    pub fn start(&mut self) -> Result<(), PipelineError> {
        if self.is_running() {
            return Ok(());
        }

        let facing = self.config.facing;
        let preset = self.config.preset;

        let Some(device) = self.devices.open(facing) else {
            tracing::warn!("Could not start preview: no {:?} camera", facing);
            return Err(PipelineError::NoCaptureDevice(facing));
        };
        if !device.supports_preset(preset) {
            tracing::warn!("Capture preset {:?} not supported by {:?} camera", preset, facing);
            return Err(PipelineError::UnsupportedPreset(preset));
        }

        let (frame_tx, frame_rx) = bounded(1);
        let filter = Arc::clone(&self.filter);
        let render_tx = self.render.sender();
        let worker = thread::Builder::new()
            .name("lookinlive-capture".to_string())
            .spawn(move || run_capture_worker(frame_rx, filter, render_tx))
            .map_err(PipelineError::Spawn)?;

        self.render.post(RenderCommand::RefreshViewport);
        self.render.post(RenderCommand::Facing(facing));
        self.orientation.subscribe(self.render.sender());
        self.frames.open(frame_tx);

        self.device = Some(device);
        self.capture = Some(worker);
        tracing::debug!("Preview started: {:?} camera, preset {:?}", facing, preset);
        Ok(())
    }

    /// Stop accepting frames and release the camera.
    ///
    /// Waits for the frame being filtered, never for queued render work.
    pub fn stop(&mut self) {
        let Some(worker) = self.capture.take() else {
            return;
        };

        self.frames.close();
        self.orientation.unsubscribe();

        tracing::debug!("Waiting for capture worker to finish");
        if worker.join().is_err() {
            tracing::error!("Capture worker panicked");
        }

        self.device = None;
        tracing::debug!("Preview stopped");
    }

    fn restart(&mut self) -> Result<(), PipelineError> {
        tracing::debug!("Restarting preview");
        self.stop();
        self.start()
    }

    /// Switch cameras. A running pipeline restarts with the new camera.
    pub fn set_camera_facing(&mut self, facing: CameraFacing) -> Result<(), PipelineError> {
        if facing == self.config.facing {
            return Ok(());
        }

        self.config.facing = facing;
        if self.is_running() {
            self.restart()?;
        }
        Ok(())
    }

    /// Switch between the front and back camera.
    pub fn toggle_camera_facing(&mut self) -> Result<(), PipelineError> {
        self.set_camera_facing(self.config.facing.toggled())
    }

    /// Change the capture preset. A running pipeline restarts with it.
    pub fn set_preset(&mut self, preset: CapturePreset) -> Result<(), PipelineError> {
        if preset == self.config.preset {
            return Ok(());
        }

        self.config.preset = preset;
        if self.is_running() {
            self.restart()?;
        }
        Ok(())
    }

    /// Re-read the drawable size from the sink, e.g. after a layout change.
    pub fn refresh_viewport(&self) {
        self.render.post(RenderCommand::RefreshViewport);
    }

    /// Flip the torch at the configured level. Returns whether it is now on.
    ///
    /// Only the back camera's torch is driven.
    pub fn toggle_torch(&mut self) -> bool {
        let level = self.config.torch_level;
        self.device
            .as_deref_mut()
            .is_some_and(|d| device::toggle_torch(d, level))
    }

    /// Turn the torch on at `level` (0 < level <= 1). Returns the device's
    /// result, or `false` when not allowed.
    pub fn set_torch_level(&mut self, level: f32) -> bool {
        self.device
            .as_deref_mut()
            .is_some_and(|d| device::set_torch_level(d, level))
    }

    /// Turn the torch off if it is on.
    pub fn turn_off_torch(&mut self) {
        if let Some(d) = self.device.as_deref_mut() {
            device::turn_off_torch(d);
        }
    }

    /// Tear everything down: drop the filter, stop capture and end the
    /// rendering thread without waiting for queued frames.
    pub fn shutdown(self) {
        self.clear_filter();
        // Drop does the rest
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        self.stop();
        self.render.shutdown();
    }
}
