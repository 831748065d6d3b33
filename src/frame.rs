use crate::orientation::{read_exif_orientation, ExifOrientation};
use image::DynamicImage;
use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_FRAME_ID: AtomicU64 = AtomicU64::new(1);

/// A decoded image together with the orientation it was captured in.
///
/// Clones share the pixel data.
#[derive(Clone)]
pub struct Frame {
    pub id: u64,
    pub image: Arc<DynamicImage>,
    pub orientation: ExifOrientation,
}

impl Frame {
    pub fn new(image: DynamicImage, orientation: ExifOrientation) -> Self {
        Self {
            id: NEXT_FRAME_ID.fetch_add(1, Ordering::Relaxed),
            image: Arc::new(image),
            orientation,
        }
    }

    pub fn open(path: &Path) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let image = image::open(path)?;
        let orientation = read_exif_orientation(path).unwrap_or_default();
        Ok(Self::new(image, orientation))
    }

    pub fn upright(&self) -> DynamicImage {
        self.orientation.apply(&self.image)
    }
}

impl PartialEq for Frame {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Frame#{}({}x{}, {:?})",
            self.id,
            self.image.width(),
            self.image.height(),
            self.orientation
        )
    }
}
