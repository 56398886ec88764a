pub mod types;

pub use types::{Capture, CaptureRegion, Control, LogRecord};
