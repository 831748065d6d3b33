use crate::frame::Frame;
use std::error::Error;

/// Live camera preview surface.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Preview {
    /// Most recent camera frame, if one arrived yet.
    pub latest_frame: Option<Frame>,
}

/// The screen the classification session renders into.
pub trait DeviceDisplay: Send + Sync {
    /// Main text, the predicted label or a status message.
    fn set_label(&mut self, text: &str) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Secondary text, the confidence of the shown label.
    fn set_accuracy(&mut self, text: &str) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Still picture shown when no live preview is attached.
    fn set_image(&mut self, frame: Option<&Frame>) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Attaches the live preview surface (`Some`) or removes it (`None`).
    fn set_preview(&mut self, preview: Option<&Preview>) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Number of preview surfaces currently attached.
    fn preview_surface_count(&self) -> usize;
}
