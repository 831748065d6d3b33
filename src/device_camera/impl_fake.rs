use crate::device_camera::interface::DeviceCamera;
use crate::frame::Frame;
use crate::library::logger::interface::Logger;
use crate::orientation::{ExifOrientation, ImageOrientation};
use image::{DynamicImage, ImageBuffer, Rgb};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Produces synthetic gradient frames.
pub struct DeviceCameraFake {
    logger: Arc<dyn Logger + Send + Sync>,
    available: bool,
    frame_interval: Duration,
    orientation: ImageOrientation,
    running: AtomicBool,
    starts: AtomicUsize,
    captured: AtomicUsize,
}

impl DeviceCameraFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>, frame_interval: Duration) -> Self {
        Self {
            logger: logger.with_namespace("camera").with_namespace("fake"),
            available: true,
            frame_interval,
            orientation: ImageOrientation::Up,
            running: AtomicBool::new(false),
            starts: AtomicUsize::new(0),
            captured: AtomicUsize::new(0),
        }
    }

    #[allow(dead_code)]
    pub fn unavailable(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            available: false,
            ..Self::new(logger, Duration::from_millis(33))
        }
    }

    pub fn with_orientation(mut self, orientation: ImageOrientation) -> Self {
        self.orientation = orientation;
        self
    }

    #[allow(dead_code)]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    #[allow(dead_code)]
    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    #[allow(dead_code)]
    pub fn captured(&self) -> usize {
        self.captured.load(Ordering::SeqCst)
    }
}

impl DeviceCamera for DeviceCameraFake {
    fn is_available(&self) -> bool {
        self.available
    }

    fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if !self.available {
            return Err("no camera connected".into());
        }
        self.logger.info("Camera started")?;
        self.starts.fetch_add(1, Ordering::SeqCst);
        self.running.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.running.store(false, Ordering::SeqCst);
        self.logger.info("Camera stopped")?;
        Ok(())
    }

    fn capture_frame(&self) -> Result<Frame, Box<dyn std::error::Error + Send + Sync>> {
        if !self.available {
            return Err("no camera connected".into());
        }

        let shift = (self.captured.fetch_add(1, Ordering::SeqCst) % 256) as u8;
        let noise: u8 = rand::random::<u8>() % 16;
        let image = ImageBuffer::from_fn(64, 48, |x, y| {
            Rgb([
                (x as u8).wrapping_mul(4).wrapping_add(shift),
                (y as u8).wrapping_mul(5),
                noise,
            ])
        });

        Ok(Frame::new(
            DynamicImage::ImageRgb8(image),
            ExifOrientation::from(self.orientation),
        ))
    }

    fn frame_interval(&self) -> Duration {
        self.frame_interval
    }
}
