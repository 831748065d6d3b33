use crate::device_camera::interface::DeviceCamera;
use crate::frame::Frame;
use crate::frame_source::interface::{FrameSource, FrameSourceError};
use crate::library::logger::interface::Logger;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

/// Pulls frames from a running camera at its native rate until stopped.
pub struct LiveFrameSource {
    device_camera: Arc<dyn DeviceCamera + Send + Sync>,
    stopped: Arc<AtomicBool>,
    last_frame: Option<Instant>,
}

impl LiveFrameSource {
    pub fn new(device_camera: Arc<dyn DeviceCamera + Send + Sync>, stopped: Arc<AtomicBool>) -> Self {
        Self {
            device_camera,
            stopped,
            last_frame: None,
        }
    }

    fn wait_for_next_slot(&mut self) {
        if let Some(last_frame) = self.last_frame {
            let interval = self.device_camera.frame_interval();
            let elapsed = last_frame.elapsed();
            if elapsed < interval {
                std::thread::sleep(interval - elapsed);
            }
        }
        self.last_frame = Some(Instant::now());
    }
}

impl FrameSource for LiveFrameSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, FrameSourceError> {
        if self.stopped.load(Ordering::SeqCst) {
            return Ok(None);
        }

        self.wait_for_next_slot();

        if self.stopped.load(Ordering::SeqCst) {
            return Ok(None);
        }

        self.device_camera
            .capture_frame()
            .map(Some)
            .map_err(|e| FrameSourceError::Camera(e.to_string()))
    }
}

/// Exclusive hold on a camera that streams frames on a dedicated worker thread.
///
/// Dropping the hold stops the stream and releases the camera.
pub struct LiveCapture {
    device_camera: Arc<dyn DeviceCamera + Send + Sync>,
    logger: Arc<dyn Logger + Send + Sync>,
    stopped: Arc<AtomicBool>,
    running: bool,
    worker: Option<JoinHandle<()>>,
}

impl LiveCapture {
    /// Starts the device. No frame is delivered before [`LiveCapture::stream`].
    pub fn start(
        device_camera: Arc<dyn DeviceCamera + Send + Sync>,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Result<Self, FrameSourceError> {
        if !device_camera.is_available() {
            let _ = logger.info("No camera available, live capture not started");
            return Err(FrameSourceError::CameraUnavailable);
        }

        device_camera
            .start()
            .map_err(|e| FrameSourceError::Camera(e.to_string()))?;

        let _ = logger.info("Live capture started");

        Ok(Self {
            device_camera,
            logger,
            stopped: Arc::new(AtomicBool::new(false)),
            running: true,
            worker: None,
        })
    }

    /// Spawns the worker that hands every frame to `on_frame` until stopped.
    /// Does nothing once streaming or stopped.
    pub fn stream<F>(&mut self, on_frame: F)
    where
        F: Fn(Frame) + Send + 'static,
    {
        if !self.running || self.worker.is_some() {
            return;
        }

        let mut source = LiveFrameSource::new(self.device_camera.clone(), self.stopped.clone());
        let worker_stopped = self.stopped.clone();
        let worker_logger = self.logger.clone();

        self.worker = Some(std::thread::spawn(move || loop {
            match source.next_frame() {
                Ok(Some(frame)) => {
                    if worker_stopped.load(Ordering::SeqCst) {
                        break;
                    }
                    on_frame(frame);
                }
                Ok(None) => break,
                Err(e) => {
                    let _ = worker_logger.error(&format!("Frame capture failed: {}", e));
                }
            }
        }));
    }

    /// Halts frame delivery before returning. Calling it again is a no-op.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;

        self.stopped.store(true, Ordering::SeqCst);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                let _ = self.logger.error("Live capture worker panicked");
            }
        }

        if let Err(e) = self.device_camera.stop() {
            let _ = self.logger.error(&format!("Failed to stop camera: {}", e));
        }
        let _ = self.logger.info("Live capture stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl Drop for LiveCapture {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device_camera::impl_fake::DeviceCameraFake;
    use crate::library::logger::impl_console::LoggerConsole;
    use chrono::{Offset, Utc};
    use std::sync::mpsc;
    use std::time::Duration;

    fn logger() -> Arc<dyn Logger + Send + Sync> {
        Arc::new(LoggerConsole::new(Utc.fix()))
    }

    #[test]
    fn test_unavailable_camera_does_not_start() {
        let camera = Arc::new(DeviceCameraFake::unavailable(logger()));

        let result = LiveCapture::start(camera.clone(), logger());

        assert!(matches!(result, Err(FrameSourceError::CameraUnavailable)));
        assert!(!camera.is_running());
    }

    #[test]
    fn test_stop_halts_delivery_synchronously() {
        let camera = Arc::new(DeviceCameraFake::new(logger(), Duration::from_millis(5)));
        let (tx, rx) = mpsc::channel();

        let mut capture = LiveCapture::start(camera.clone(), logger()).unwrap();
        capture.stream(move |frame| {
            let _ = tx.send(frame);
        });

        rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(camera.is_running());

        capture.stop();
        let captured_at_stop = camera.captured();
        rx.try_iter().for_each(drop);

        std::thread::sleep(Duration::from_millis(50));

        assert!(!capture.is_running());
        assert!(!camera.is_running());
        assert_eq!(camera.captured(), captured_at_stop);
        assert_eq!(rx.try_iter().count(), 0);
    }

    #[test]
    fn test_drop_releases_camera() {
        let camera = Arc::new(DeviceCameraFake::new(logger(), Duration::from_millis(5)));

        {
            let mut capture = LiveCapture::start(camera.clone(), logger()).unwrap();
            capture.stream(|_| {});
            assert!(camera.is_running());
        }

        assert!(!camera.is_running());
    }

    #[test]
    fn test_no_frames_before_streaming() {
        let camera = Arc::new(DeviceCameraFake::new(logger(), Duration::from_millis(1)));

        let mut capture = LiveCapture::start(camera.clone(), logger()).unwrap();
        std::thread::sleep(Duration::from_millis(20));

        assert!(camera.is_running());
        assert_eq!(camera.captured(), 0);

        capture.stop();
        assert!(!capture.is_running());
        assert!(!camera.is_running());
    }

    #[test]
    fn test_live_source_stops_yielding_once_flagged() {
        let camera = Arc::new(DeviceCameraFake::new(logger(), Duration::from_millis(1)));
        let stopped = Arc::new(AtomicBool::new(false));
        let mut source = LiveFrameSource::new(camera, stopped.clone());

        assert!(matches!(source.next_frame(), Ok(Some(_))));
        stopped.store(true, Ordering::SeqCst);
        assert_eq!(source.next_frame(), Ok(None));
    }
}
