use crate::classification_session::core::UiState;
use crate::device_display::interface::DeviceDisplay;
use std::error::Error;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Clone)]
pub struct Render {
    device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
}

impl Render {
    pub fn new(device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>) -> Self {
        Self { device_display }
    }

    pub fn render(&self, ui: &UiState) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut device_display = self
            .device_display
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        device_display.set_label(&ui.label)?;
        device_display.set_accuracy(&ui.accuracy)?;
        device_display.set_image(ui.image.as_ref())?;
        device_display.set_preview(ui.preview.as_ref())?;

        Ok(())
    }
}
