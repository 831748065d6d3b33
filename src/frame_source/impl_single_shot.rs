use crate::frame::Frame;
use crate::frame_source::interface::{FrameSource, FrameSourceError};
use crate::photo_picker::interface::PhotoPicker;
use std::sync::Arc;

/// Yields at most one frame from a picker, then nothing.
pub struct SingleShotFrameSource {
    photo_picker: Option<Arc<dyn PhotoPicker + Send + Sync>>,
}

impl SingleShotFrameSource {
    pub fn new(photo_picker: Arc<dyn PhotoPicker + Send + Sync>) -> Self {
        Self {
            photo_picker: Some(photo_picker),
        }
    }
}

impl FrameSource for SingleShotFrameSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, FrameSourceError> {
        match self.photo_picker.take() {
            Some(photo_picker) => photo_picker
                .pick()
                .map_err(|e| FrameSourceError::Picker(e.to_string())),
            None => Ok(None),
        }
    }
}
