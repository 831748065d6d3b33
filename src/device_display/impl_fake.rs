use crate::device_display::interface::{DeviceDisplay, Preview};
use crate::frame::Frame;
use crate::library::logger::interface::Logger;
use std::error::Error;
use std::sync::Arc;

pub struct DeviceDisplayFake {
    logger: Arc<dyn Logger + Send + Sync>,
    pub label: String,
    pub accuracy: String,
    pub image: Option<Frame>,
    pub preview: Option<Preview>,
    pub preview_attach_count: usize,
}

impl DeviceDisplayFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("display").with_namespace("fake"),
            label: String::new(),
            accuracy: String::new(),
            image: None,
            preview: None,
            preview_attach_count: 0,
        }
    }
}

impl DeviceDisplay for DeviceDisplayFake {
    fn set_label(&mut self, text: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        if self.label != text {
            self.logger.info(&format!("set_label({:?})", text))?;
        }
        self.label = text.to_string();
        Ok(())
    }

    fn set_accuracy(&mut self, text: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        if self.accuracy != text {
            self.logger.info(&format!("set_accuracy({:?})", text))?;
        }
        self.accuracy = text.to_string();
        Ok(())
    }

    fn set_image(&mut self, frame: Option<&Frame>) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.image = frame.cloned();
        Ok(())
    }

    fn set_preview(&mut self, preview: Option<&Preview>) -> Result<(), Box<dyn Error + Send + Sync>> {
        if self.preview.is_none() && preview.is_some() {
            self.preview_attach_count += 1;
            self.logger.info("preview attached")?;
        }
        if self.preview.is_some() && preview.is_none() {
            self.logger.info("preview removed")?;
        }
        self.preview = preview.cloned();
        Ok(())
    }

    fn preview_surface_count(&self) -> usize {
        usize::from(self.preview.is_some())
    }
}
