use crate::classification_session::core::{Effect, Event};
use crate::classification_session::main::{lock, ClassificationSession};
use crate::frame::Frame;
use crate::frame_source::impl_live::LiveCapture;
use crate::frame_source::impl_single_shot::SingleShotFrameSource;
use crate::frame_source::interface::{FrameSource, FrameSourceError};
use crate::photo_picker::impl_camera::PhotoPickerCamera;
use crate::photo_picker::interface::PickSource;
use std::sync::Arc;

impl ClassificationSession {
    pub fn run_effect(&self, effect: Effect) {
        let _ = self.logger.info(&format!("Running effect: {:?}", effect));

        match effect {
            Effect::StartLiveCapture { session } => {
                let mut live_capture = lock(&self.live_capture);
                if let Some((held_by, mut previous)) = live_capture.take() {
                    let _ = self
                        .logger
                        .info(&format!("Releasing camera held by {:?}", held_by));
                    previous.stop();
                }

                let started =
                    LiveCapture::start(self.device_camera.clone(), self.logger.with_namespace("live"));
                match started {
                    Ok(mut capture) => {
                        let _ = self.event_sender.send(Event::CameraStartDone {
                            session,
                            result: Ok(()),
                        });

                        let event_sender = self.event_sender.clone();
                        capture.stream(move |frame| {
                            let _ = event_sender.send(Event::LiveFrame { session, frame });
                        });
                        *live_capture = Some((session, capture));
                    }
                    Err(e) => {
                        let _ = self.event_sender.send(Event::CameraStartDone {
                            session,
                            result: Err(e),
                        });
                    }
                }
            }
            Effect::StopLiveCapture { session } => {
                let mut live_capture = lock(&self.live_capture);
                if live_capture
                    .as_ref()
                    .is_some_and(|(held_by, _)| *held_by == session)
                {
                    if let Some((_, mut capture)) = live_capture.take() {
                        capture.stop();
                    }
                }
            }
            Effect::OpenPicker { session, source } => {
                let result = match source {
                    PickSource::Camera if self.device_camera.is_available() => self.take_photo(),
                    PickSource::Camera | PickSource::Library => {
                        SingleShotFrameSource::new(self.photo_picker.clone()).next_frame()
                    }
                };
                let _ = self
                    .event_sender
                    .send(Event::PickerDone { session, result });
            }
            Effect::ClassifyFrame { ticket, frame } => {
                let result = self.image_classifier.classify(&frame);
                if let Err(e) = &result {
                    let _ = self
                        .logger
                        .error(&format!("Classifying {:?} failed: {}", frame, e));
                }
                let _ = self
                    .event_sender
                    .send(Event::ClassifyDone { ticket, result });
            }
        }
    }

    /// Shoots one picture while holding the camera slot, so a live scan cannot start meanwhile.
    /// A live scan already holding the camera means this pick was abandoned.
    fn take_photo(&self) -> Result<Option<Frame>, FrameSourceError> {
        let live_capture = lock(&self.live_capture);
        if let Some((held_by, _)) = live_capture.as_ref() {
            let _ = self
                .logger
                .info(&format!("Camera held by {:?}, photo not taken", held_by));
            return Ok(None);
        }

        let photo_picker = Arc::new(PhotoPickerCamera::new(self.device_camera.clone()));
        let result = SingleShotFrameSource::new(photo_picker).next_frame();
        drop(live_capture);
        result
    }
}
