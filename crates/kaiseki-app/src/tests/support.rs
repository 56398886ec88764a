//! Test doubles for the screen, the keyboard and the vision endpoint

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use image::{Rgba, RgbaImage};
use kaiseki_capture::{CaptureError, InputSource, RegionCapturer, ScreenGrabber};
use kaiseki_io::Journal;
use kaiseki_types::{CaptureRegion, Control};
use kaiseki_vision::{ProviderMetadata, QueryResult, VisionError, VisionQuery};
use tokio::time::Instant;

use crate::controller::{LoopTiming, Pipeline};

pub struct SolidGrabber;

impl ScreenGrabber for SolidGrabber {
    fn grab(&self, region: CaptureRegion) -> Result<RgbaImage, CaptureError> {
        Ok(RgbaImage::from_pixel(
            region.width,
            region.height,
            Rgba([10, 20, 30, 255]),
        ))
    }
}

pub struct BrokenGrabber;

impl ScreenGrabber for BrokenGrabber {
    fn grab(&self, region: CaptureRegion) -> Result<RgbaImage, CaptureError> {
        Err(CaptureError::OutOfBounds(region))
    }
}

/// Replies with a fixed result and counts calls
pub struct CannedVision {
    pub reply: QueryResult,
    pub calls: Arc<AtomicUsize>,
}

impl CannedVision {
    pub fn answering(text: &str) -> (Self, Arc<AtomicUsize>) {
        Self::replying(QueryResult::Answer(text.to_string()))
    }

    pub fn replying(reply: QueryResult) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                reply,
                calls: calls.clone(),
            },
            calls,
        )
    }
}

#[async_trait::async_trait]
impl VisionQuery for CannedVision {
    async fn query(&self, _image_b64: &str) -> Result<QueryResult, VisionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            model: "canned".to_string(),
            endpoint: "memory".to_string(),
        }
    }
}

/// Keys driven by the (paused) tokio clock
///
/// Capture is held during `[0, capture_until)`, exit from `exit_from` onwards.
pub struct ScriptedInput {
    start: Instant,
    capture_until: Duration,
    exit_from: Duration,
    pub polls: AtomicUsize,
}

impl ScriptedInput {
    pub fn new(capture_until: Duration, exit_from: Duration) -> Self {
        Self {
            start: Instant::now(),
            capture_until,
            exit_from,
            polls: AtomicUsize::new(0),
        }
    }
}

impl InputSource for ScriptedInput {
    fn is_active(&self, control: Control) -> bool {
        let elapsed = self.start.elapsed();
        match control {
            Control::Capture => {
                self.polls.fetch_add(1, Ordering::SeqCst);
                elapsed < self.capture_until
            }
            Control::Exit => elapsed >= self.exit_from,
        }
    }
}

pub struct Workspace {
    pub root: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            root: std::env::temp_dir().join(format!("kaiseki-app-{}", uuid::Uuid::new_v4())),
        }
    }

    pub fn screenshots(&self) -> PathBuf {
        self.root.join("screenshots")
    }

    pub fn logs(&self) -> PathBuf {
        self.root.join("logs")
    }

    pub fn pipeline(&self, grabber: Box<dyn ScreenGrabber>, vision: Box<dyn VisionQuery>) -> Pipeline {
        let region = CaptureRegion {
            left: 0,
            top: 0,
            width: 100,
            height: 100,
        };
        Pipeline::new(
            RegionCapturer::new(grabber, region, self.screenshots()),
            vision,
            Journal::new(self.logs()),
        )
    }

    /// Concatenated content of every log file
    pub fn log_text(&self) -> String {
        let Ok(entries) = std::fs::read_dir(self.logs()) else {
            return String::new();
        };
        entries
            .map(|e| std::fs::read_to_string(e.unwrap().path()).unwrap())
            .collect()
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

pub fn timing() -> LoopTiming {
    LoopTiming {
        poll_interval: Duration::from_millis(50),
        debounce: Duration::from_millis(500),
    }
}
