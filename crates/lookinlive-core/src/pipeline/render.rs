//! The rendering context: one thread that owns the sink, the viewport and the
//! preview transform.
//!
//! Everything that touches render state arrives here as a [`RenderCommand`].
//! Confining that state to a single thread means no locks around it and no
//! torn reads between an orientation change and an in-flight blit.

use super::PipelineError;
use crate::frame::FrameImage;
use crate::geometry::{fit_crop, AffineTransform2D, FrameExtent};
use crate::orientation::{resolve_transform, CameraFacing, DeviceOrientation};
use crate::render::RenderSink;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

/// Work posted to the rendering context.
#[derive(Debug)]
pub(crate) enum RenderCommand {
    /// Fit, transform and blit a filtered frame.
    Draw(FrameImage),
    /// The device was rotated.
    Orientation(DeviceOrientation),
    /// A camera was (re)started with this facing.
    Facing(CameraFacing),
    /// Re-read the drawable size from the sink.
    RefreshViewport,
    /// Leave the render loop.
    Shutdown,
}

/// Handle to the rendering thread. Posting never blocks.
pub(crate) struct RenderContext {
    commands: Sender<RenderCommand>,
    discard: Arc<AtomicBool>,
}

impl RenderContext {
    /// Spawn the rendering thread with the sink and its initial viewport.
    pub(crate) fn spawn(
        sink: Box<dyn RenderSink>,
        viewport: FrameExtent,
        facing: CameraFacing,
    ) -> Result<Self, PipelineError> {
        let (commands, rx) = unbounded();
        let discard = Arc::new(AtomicBool::new(false));

        let orientation = DeviceOrientation::Unknown;
        let state = RenderState {
            sink,
            viewport,
            orientation,
            facing,
            transform: resolve_transform(orientation, facing),
            discard: Arc::clone(&discard),
        };

        thread::Builder::new()
            .name("lookinlive-render".to_string())
            .spawn(move || state.run(rx))
            .map_err(PipelineError::Spawn)?;

        Ok(Self { commands, discard })
    }

    /// Fire-and-forget submission. Returns false once the thread has exited.
    pub(crate) fn post(&self, command: RenderCommand) -> bool {
        self.commands.send(command).is_ok()
    }

    /// A sender for other contexts that feed the render thread.
    pub(crate) fn sender(&self) -> Sender<RenderCommand> {
        self.commands.clone()
    }

    /// Stop the thread without waiting for queued draws; they are discarded.
    pub(crate) fn shutdown(&self) {
        self.discard.store(true, Ordering::Release);
        let _ = self.commands.send(RenderCommand::Shutdown);
    }
}

struct RenderState {
    sink: Box<dyn RenderSink>,
    viewport: FrameExtent,
    orientation: DeviceOrientation,
    facing: CameraFacing,
    transform: AffineTransform2D,
    discard: Arc<AtomicBool>,
}

impl RenderState {
    fn run(mut self, rx: Receiver<RenderCommand>) {
        tracing::debug!("Render context started ({:?})", self.viewport);

        for command in rx.iter() {
            match command {
                RenderCommand::Draw(image) => {
                    if self.discard.load(Ordering::Acquire) {
                        tracing::trace!("Discarding frame queued before shutdown");
                        continue;
                    }
                    self.draw(&image);
                }
                RenderCommand::Orientation(orientation) => {
                    self.update_transform(orientation, self.facing);
                }
                RenderCommand::Facing(facing) => {
                    self.update_transform(self.orientation, facing);
                }
                RenderCommand::RefreshViewport => self.refresh_viewport(),
                RenderCommand::Shutdown => break,
            }
        }

        tracing::debug!("Render context stopped");
    }

    /// Recompute the preview transform if its inputs changed.
    fn update_transform(&mut self, orientation: DeviceOrientation, facing: CameraFacing) {
        if (orientation, facing) == (self.orientation, self.facing) {
            tracing::trace!("Transform unchanged for {:?}/{:?}", orientation, facing);
            return;
        }

        self.orientation = orientation;
        self.facing = facing;
        self.transform = resolve_transform(orientation, facing);
        tracing::debug!(
            "Preview transform for {:?}/{:?}: {:?}",
            orientation,
            facing,
            self.transform
        );
    }

    fn refresh_viewport(&mut self) {
        let extent = self.sink.drawable_extent();
        match extent.validate() {
            Ok(()) => {
                if extent != self.viewport {
                    tracing::debug!("Viewport {:?} -> {:?}", self.viewport, extent);
                }
                self.viewport = extent;
            }
            Err(e) => {
                tracing::warn!("Keeping viewport {:?}: {}", self.viewport, e);
            }
        }
    }

    fn draw(&mut self, image: &FrameImage) {
        let draw_rect = match fit_crop(&image.extent(), &self.viewport) {
            Ok(rect) => rect,
            Err(e) => {
                tracing::error!("Skipping {}x{} frame: {}", image.width, image.height, e);
                return;
            }
        };

        if let Err(e) = self
            .sink
            .render(image, draw_rect, &self.transform, self.viewport)
        {
            tracing::error!("Render failed, keeping previous frame: {}", e);
        }
    }
}
