use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Local};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, RgbaImage};
use kaiseki_types::{Capture, CaptureRegion};
use xcap::Monitor;

use crate::error::CaptureError;

/// Source of raw screen pixels
pub trait ScreenGrabber: Send + Sync {
    /// Grab `region` as RGBA, exactly `region.width` x `region.height`
    fn grab(&self, region: CaptureRegion) -> Result<RgbaImage, CaptureError>;
}

/// Grabs pixels from the monitor that fully contains the region
pub struct XcapGrabber;

impl ScreenGrabber for XcapGrabber {
    fn grab(&self, region: CaptureRegion) -> Result<RgbaImage, CaptureError> {
        if region.is_empty() {
            return Err(CaptureError::EmptyRegion(region));
        }

        let monitors = Monitor::all().map_err(|e| CaptureError::Backend(e.to_string()))?;
        if monitors.is_empty() {
            return Err(CaptureError::NoMonitor);
        }

        let monitor = monitors
            .iter()
            .find(|m| {
                region.left as i64 >= m.x() as i64
                    && region.top as i64 >= m.y() as i64
                    && region.right() <= m.x() as i64 + m.width() as i64
                    && region.bottom() <= m.y() as i64 + m.height() as i64
            })
            .ok_or(CaptureError::OutOfBounds(region))?;

        let image = monitor
            .capture_image()
            .map_err(|e| CaptureError::Backend(e.to_string()))?;

        let rect = crop_rect(
            region,
            (monitor.x(), monitor.y()),
            monitor.width(),
            image.dimensions(),
        );
        let cropped =
            xcap::image::imageops::crop_imm(&image, rect.x, rect.y, rect.width, rect.height)
                .to_image();

        if cropped.dimensions() == (region.width, region.height) {
            Ok(cropped)
        } else {
            tracing::debug!(
                "Rescaling capture from {}x{} to {}x{}",
                rect.width,
                rect.height,
                region.width,
                region.height
            );
            Ok(image::imageops::resize(
                &cropped,
                region.width,
                region.height,
                FilterType::Triangle,
            ))
        }
    }
}

/// Pixel rectangle to cut out of a monitor capture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Map a region in logical screen coordinates onto the captured image
///
/// HiDPI monitors report logical geometry but capture physical pixels, so the
/// rectangle is scaled by `image width / monitor width` and clamped to the image.
pub(crate) fn crop_rect(
    region: CaptureRegion,
    monitor_origin: (i32, i32),
    monitor_width: u32,
    image_size: (u32, u32),
) -> CropRect {
    let (image_width, image_height) = image_size;
    let scale = image_width as f64 / monitor_width.max(1) as f64;

    let scaled = |v: f64| (v * scale).round().max(0.0) as u32;
    let x = scaled((region.left as i64 - monitor_origin.0 as i64) as f64).min(image_width);
    let y = scaled((region.top as i64 - monitor_origin.1 as i64) as f64).min(image_height);

    CropRect {
        x,
        y,
        width: scaled(region.width as f64).min(image_width - x),
        height: scaled(region.height as f64).min(image_height - y),
    }
}

/// Captures the fixed region and persists it as PNG
pub struct RegionCapturer {
    grabber: Box<dyn ScreenGrabber>,
    region: CaptureRegion,
    dir: PathBuf,
}

impl RegionCapturer {
    pub fn new(grabber: Box<dyn ScreenGrabber>, region: CaptureRegion, dir: PathBuf) -> Self {
        Self {
            grabber,
            region,
            dir,
        }
    }

    pub fn region(&self) -> CaptureRegion {
        self.region
    }

    /// Grab, drop alpha, write `roi_<timestamp>.png`, then base64 the written file
    pub fn capture(&self, at: DateTime<Local>) -> Result<Capture, CaptureError> {
        let pixels = self.grabber.grab(self.region)?;
        let rgb = DynamicImage::ImageRgba8(pixels).to_rgb8();

        fs::create_dir_all(&self.dir)?;
        let path = capture_path(&self.dir, at);
        rgb.save_with_format(&path, ImageFormat::Png)?;

        let bytes = fs::read(&path)?;
        tracing::debug!("Saved {} ({} bytes)", path.display(), bytes.len());

        Ok(Capture {
            image_b64: STANDARD.encode(&bytes),
            width: rgb.width(),
            height: rgb.height(),
            path,
        })
    }
}

/// `<dir>/roi_YYYYMMDD_HHMMSS.png`
pub fn capture_path(dir: &Path, at: DateTime<Local>) -> PathBuf {
    dir.join(format!("roi_{}.png", at.format("%Y%m%d_%H%M%S")))
}
