use crate::frame::Frame;
use crate::library::logger::interface::Logger;
use crate::photo_picker::interface::PhotoPicker;
use std::sync::Arc;

/// Native "open file" dialog filtered to images.
pub struct PhotoPickerFileDialog {
    logger: Arc<dyn Logger + Send + Sync>,
}

impl PhotoPickerFileDialog {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("photo_picker").with_namespace("file_dialog"),
        }
    }
}

impl PhotoPicker for PhotoPickerFileDialog {
    fn pick(&self) -> Result<Option<Frame>, Box<dyn std::error::Error + Send + Sync>> {
        let path = rfd::FileDialog::new()
            .set_title("Choose Photo")
            .add_filter("Images", &["jpg", "jpeg", "png", "webp", "bmp"])
            .pick_file();

        match path {
            Some(path) => {
                self.logger.info(&format!("Picked {}", path.display()))?;
                Frame::open(&path).map(Some)
            }
            None => {
                self.logger.info("Picker cancelled")?;
                Ok(None)
            }
        }
    }
}
