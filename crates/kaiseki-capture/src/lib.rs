mod capture;
mod error;
mod input;

pub use capture::{RegionCapturer, ScreenGrabber, XcapGrabber, capture_path};
pub use error::{CaptureError, InputError};
pub use input::{InputSource, KeyBinding, KeyboardInput};
