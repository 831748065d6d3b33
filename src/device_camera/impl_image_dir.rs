use crate::device_camera::interface::DeviceCamera;
use crate::frame::Frame;
use crate::library::logger::interface::Logger;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "bmp"];

/// Replays the still images of a directory, in file name order, as a looping feed.
///
/// The camera is unavailable when the directory is missing or holds no images.
pub struct DeviceCameraImageDir {
    logger: Arc<dyn Logger + Send + Sync>,
    files: Vec<PathBuf>,
    cursor: AtomicUsize,
    frame_interval: Duration,
}

impl DeviceCameraImageDir {
    pub fn new(dir: &Path, frame_interval: Duration, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        let logger = logger.with_namespace("camera").with_namespace("image_dir");
        let files = list_images(dir);
        let _ = logger.info(&format!(
            "Found {} image(s) in {}",
            files.len(),
            dir.display()
        ));

        Self {
            logger,
            files,
            cursor: AtomicUsize::new(0),
            frame_interval,
        }
    }
}

fn list_images(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return vec![];
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    files
}

impl DeviceCamera for DeviceCameraImageDir {
    fn is_available(&self) -> bool {
        !self.files.is_empty()
    }

    fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.files.is_empty() {
            return Err("no images to replay".into());
        }
        self.cursor.store(0, Ordering::SeqCst);
        self.logger.info("Replay started")?;
        Ok(())
    }

    fn stop(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.logger.info("Replay stopped")?;
        Ok(())
    }

    fn capture_frame(&self) -> Result<Frame, Box<dyn std::error::Error + Send + Sync>> {
        if self.files.is_empty() {
            return Err("no images to replay".into());
        }
        let index = self.cursor.fetch_add(1, Ordering::SeqCst) % self.files.len();
        Frame::open(&self.files[index])
    }

    fn frame_interval(&self) -> Duration {
        self.frame_interval
    }
}
