use crate::frame::Frame;
use crate::photo_picker::interface::PhotoPicker;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Hands out the same picture (or the same cancellation) on every pick.
pub struct PhotoPickerFake {
    frame: Option<Frame>,
    picks: AtomicUsize,
}

impl PhotoPickerFake {
    pub fn new(frame: Option<Frame>) -> Self {
        Self {
            frame,
            picks: AtomicUsize::new(0),
        }
    }

    #[allow(dead_code)]
    pub fn picks(&self) -> usize {
        self.picks.load(Ordering::SeqCst)
    }
}

impl PhotoPicker for PhotoPickerFake {
    fn pick(&self) -> Result<Option<Frame>, Box<dyn std::error::Error + Send + Sync>> {
        self.picks.fetch_add(1, Ordering::SeqCst);
        Ok(self.frame.clone())
    }
}
