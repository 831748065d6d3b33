use crate::device_camera::interface::DeviceCamera;
use crate::frame::Frame;
use crate::photo_picker::interface::PhotoPicker;
use std::sync::Arc;

/// Takes a single picture with the camera, starting it for the shot and stopping it after.
pub struct PhotoPickerCamera {
    device_camera: Arc<dyn DeviceCamera + Send + Sync>,
}

impl PhotoPickerCamera {
    pub fn new(device_camera: Arc<dyn DeviceCamera + Send + Sync>) -> Self {
        Self { device_camera }
    }
}

impl PhotoPicker for PhotoPickerCamera {
    fn pick(&self) -> Result<Option<Frame>, Box<dyn std::error::Error + Send + Sync>> {
        if !self.device_camera.is_available() {
            return Ok(None);
        }

        self.device_camera.start()?;
        let captured = self.device_camera.capture_frame();
        let stopped = self.device_camera.stop();

        let frame = captured?;
        stopped?;
        Ok(Some(frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device_camera::impl_fake::DeviceCameraFake;
    use crate::library::logger::impl_console::LoggerConsole;
    use chrono::{Offset, Utc};
    use std::time::Duration;

    #[test]
    fn test_shot_starts_and_stops_the_camera() {
        let logger = Arc::new(LoggerConsole::new(Utc.fix()));
        let camera = Arc::new(DeviceCameraFake::new(logger, Duration::from_millis(5)));
        let picker = PhotoPickerCamera::new(camera.clone());

        let frame = picker.pick().unwrap();

        assert!(frame.is_some());
        assert_eq!(camera.starts(), 1);
        assert_eq!(camera.captured(), 1);
        assert!(!camera.is_running());
    }

    #[test]
    fn test_no_camera_picks_nothing() {
        let logger = Arc::new(LoggerConsole::new(Utc.fix()));
        let camera = Arc::new(DeviceCameraFake::unavailable(logger));
        let picker = PhotoPickerCamera::new(camera.clone());

        assert!(picker.pick().unwrap().is_none());
        assert_eq!(camera.starts(), 0);
    }
}
