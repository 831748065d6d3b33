use crate::frame::Frame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickSource {
    /// "Take Photo": one picture from the camera.
    Camera,
    /// "Choose Photo": an existing picture.
    Library,
}

pub trait PhotoPicker {
    /// Blocks until the user has chosen a picture. `Ok(None)` means the user cancelled.
    fn pick(&self) -> Result<Option<Frame>, Box<dyn std::error::Error + Send + Sync>>;
}
