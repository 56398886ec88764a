use kaiseki_types::CaptureRegion;

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("No monitor found")]
    NoMonitor,

    #[error("Capture region {0} is empty")]
    EmptyRegion(CaptureRegion),

    #[error("Capture region {0} is not inside any monitor")]
    OutOfBounds(CaptureRegion),

    #[error("Screen capture failed: {0}")]
    Backend(String),

    #[error("Failed to encode screenshot: {0}")]
    Encode(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Unknown key '{key}' in binding '{binding}'")]
    UnknownKey { key: String, binding: String },

    #[error("Empty key binding '{0}'")]
    EmptyBinding(String),

    #[error("Keyboard state is unavailable")]
    Unavailable,
}
