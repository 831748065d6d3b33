use crate::frame::Frame;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FrameSourceError {
    #[error("camera unavailable")]
    CameraUnavailable,
    #[error("camera failed: {0}")]
    Camera(String),
    #[error("picker failed: {0}")]
    Picker(String),
}

pub trait FrameSource {
    /// Produces the next frame. `Ok(None)` once the source is stopped or exhausted.
    fn next_frame(&mut self) -> Result<Option<Frame>, FrameSourceError>;
}
