//! The capture-delivery context: frames in, filtered frames out.
//!
//! A capture worker is spawned on every pipeline start. It receives frames
//! through a single-slot channel, applies the current filter snapshot and
//! posts the result to the rendering context. When the worker is still busy
//! with the previous frame, new frames are dropped rather than queued.

use super::render::RenderCommand;
use super::FrameFilter;
use crate::frame::FrameImage;
use crossbeam_channel::{Receiver, Sender, TrySendError};
use parking_lot::RwLock;
use std::sync::Arc;

/// The filter slot shared between the pipeline and its capture worker.
pub(crate) type FilterSlot = Arc<RwLock<Option<Arc<dyn FrameFilter>>>>;

/// Outcome of handing a frame to the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The frame will be filtered and rendered.
    Accepted,
    /// The pipeline was still busy with an earlier frame; this one was dropped.
    DroppedLate,
    /// The pipeline is not running.
    Stopped,
}

/// Entry point for the capture subsystem to push frames.
///
/// Cloneable and valid across restarts: while the pipeline is stopped every
/// delivery returns [`Delivery::Stopped`].
#[derive(Clone, Default)]
pub struct FrameSender {
    slot: Arc<RwLock<Option<Sender<FrameImage>>>>,
}

impl FrameSender {
    /// Hand a frame to the pipeline without blocking.
    pub fn deliver(&self, frame: FrameImage) -> Delivery {
        let slot = self.slot.read();
        let Some(sender) = slot.as_ref() else {
            return Delivery::Stopped;
        };

        match sender.try_send(frame) {
            Ok(()) => Delivery::Accepted,
            Err(TrySendError::Full(_)) => {
                tracing::trace!("Capture worker busy, dropping late frame");
                Delivery::DroppedLate
            }
            Err(TrySendError::Disconnected(_)) => Delivery::Stopped,
        }
    }

    pub(crate) fn open(&self, sender: Sender<FrameImage>) {
        *self.slot.write() = Some(sender);
    }

    /// Stop accepting frames. The worker drains what was already accepted.
    pub(crate) fn close(&self) {
        self.slot.write().take();
    }
}

/// Body of the capture worker thread.
///
/// Runs until every frame sender is gone or the render context has exited.
pub(crate) fn run_capture_worker(
    frames: Receiver<FrameImage>,
    filter: FilterSlot,
    render: Sender<RenderCommand>,
) {
    tracing::debug!("Capture worker started");

    for frame in frames.iter() {
        // Snapshot: a filter swapped mid-frame takes effect on the next one
        let Some(current) = filter.read().clone() else {
            tracing::trace!("No filter registered, dropping frame");
            continue;
        };

        let Some(filtered) = current.apply(frame) else {
            tracing::trace!("Filter produced no image, dropping frame");
            continue;
        };

        if render.send(RenderCommand::Draw(filtered)).is_err() {
            tracing::debug!("Render context gone, stopping capture worker");
            break;
        }
    }

    tracing::debug!("Capture worker stopped");
}
