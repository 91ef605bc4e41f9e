//! Headless LookinLive preview.
//!
//! Runs the pipeline against a synthetic camera with a bloom filter, rotates
//! the "device" and switches cameras along the way, then writes what ended up
//! on screen to a PNG.
//!
//! Usage: `lookinlive-demo [config.toml] [output.png]`

mod bloom;
mod camera;

use bloom::Bloom;
use camera::{frame_size, test_pattern, SyntheticProvider};
use lookinlive_core::{
    Delivery, DeviceOrientation, FrameSender, Pipeline, PipelineConfig, RenderSink, SoftwareSink,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::info;

/// Screen of the simulated phone, in pixels.
const SCREEN_WIDTH: u32 = 750;
const SCREEN_HEIGHT: u32 = 1334;

/// ~30 fps
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Time spent in each step of the scripted session.
const STEP: Duration = Duration::from_millis(600);

#[derive(Debug, Default)]
struct FrameStats {
    accepted: u64,
    dropped_late: u64,
    stopped: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => {
            info!("Loading config from {}", path);
            PipelineConfig::from_path(&path)?
        }
        None => PipelineConfig::default(),
    };
    let output = args.next().unwrap_or_else(|| "lookinlive-preview.png".to_string());
    info!("Config: {:?}", config);

    let sink = SoftwareSink::new(SCREEN_WIDTH, SCREEN_HEIGHT);
    let screen = sink.screen();
    info!("Screen {:?}", sink.drawable_extent());

    let provider = SyntheticProvider::default();
    let torch = provider.torch_level();
    let (width, height) = frame_size(config.preset);

    let mut pipeline = Pipeline::new(config, Box::new(provider), Box::new(sink))?;
    pipeline.set_filter(Bloom::new(2.0));
    pipeline.start()?;

    let running = Arc::new(AtomicBool::new(true));
    let generator = {
        let sender = pipeline.frame_sender();
        let running = Arc::clone(&running);
        thread::Builder::new()
            .name("synthetic-camera".to_string())
            .spawn(move || generate_frames(sender, width, height, &running))?
    };

    let notifier = pipeline.orientation_notifier();

    thread::sleep(STEP);
    info!("Rotating to landscape");
    notifier.notify(DeviceOrientation::LandscapeLeft);
    thread::sleep(STEP);

    info!("Torch on: {}", pipeline.toggle_torch());
    info!("Torch level {:?}", *torch.lock());

    info!("Switching camera");
    pipeline.toggle_camera_facing()?;
    info!("Torch on front camera: {}", pipeline.toggle_torch());
    thread::sleep(STEP);

    info!("Rotating back to portrait");
    notifier.notify(DeviceOrientation::Portrait);
    thread::sleep(STEP);

    running.store(false, Ordering::Release);
    let stats = generator
        .join()
        .map_err(|_| "synthetic camera thread panicked")?;
    info!(
        "Frames: {} accepted, {} dropped late, {} while stopped",
        stats.accepted, stats.dropped_late, stats.stopped
    );

    pipeline.stop();
    // Let the render thread finish the frames it already has
    thread::sleep(Duration::from_millis(200));

    let (w, h) = screen.dimensions();
    screen.save(&output)?;
    info!("Wrote {}x{} preview to {}", w, h, output);

    pipeline.shutdown();
    Ok(())
}

fn generate_frames(sender: FrameSender, width: u32, height: u32, running: &AtomicBool) -> FrameStats {
    let mut stats = FrameStats::default();
    let mut tick = 0u64;

    while running.load(Ordering::Acquire) {
        match sender.deliver(test_pattern(width, height, tick)) {
            Delivery::Accepted => stats.accepted += 1,
            Delivery::DroppedLate => stats.dropped_late += 1,
            Delivery::Stopped => stats.stopped += 1,
        }
        tick += 1;
        thread::sleep(FRAME_INTERVAL);
    }

    stats
}
