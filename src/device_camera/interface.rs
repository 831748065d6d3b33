use crate::frame::Frame;
use std::time::Duration;

pub trait DeviceCamera {
    /// Whether a device is present at all.
    fn is_available(&self) -> bool;
    fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    fn stop(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    fn capture_frame(&self) -> Result<Frame, Box<dyn std::error::Error + Send + Sync>>;
    /// Native delay between two consecutive frames.
    fn frame_interval(&self) -> Duration;
}
