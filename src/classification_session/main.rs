use crate::classification_session::core::{init, transition, Effect, Event, SessionId, State};
use crate::classification_session::render::Render;
use crate::config::Config;
use crate::device_camera::interface::DeviceCamera;
use crate::device_display::interface::DeviceDisplay;
use crate::frame_source::impl_live::LiveCapture;
use crate::image_classifier::interface::ImageClassifier;
use crate::library::logger::interface::Logger;
use crate::photo_picker::interface::PhotoPicker;
use std::error::Error;
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Handled,
    TimedOut,
    Finished,
}

#[derive(Clone)]
pub struct ClassificationSession {
    pub state: Arc<Mutex<State>>,
    pub event_sender: Sender<Event>,
    event_receiver: Arc<Mutex<Receiver<Event>>>,
    pub config: Config,
    pub logger: Arc<dyn Logger + Send + Sync>,
    pub device_camera: Arc<dyn DeviceCamera + Send + Sync>,
    pub photo_picker: Arc<dyn PhotoPicker + Send + Sync>,
    pub image_classifier: Arc<dyn ImageClassifier + Send + Sync>,
    pub render: Render,
    pub(super) live_capture: Arc<Mutex<Option<(SessionId, LiveCapture)>>>,
}

impl ClassificationSession {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        device_camera: Arc<dyn DeviceCamera + Send + Sync>,
        photo_picker: Arc<dyn PhotoPicker + Send + Sync>,
        device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
        image_classifier: Arc<dyn ImageClassifier + Send + Sync>,
    ) -> Self {
        let (event_sender, event_receiver) = channel();
        let (initial, _) = init();

        Self {
            state: Arc::new(Mutex::new(initial)),
            event_sender,
            event_receiver: Arc::new(Mutex::new(event_receiver)),
            config,
            logger: logger.with_namespace("session"),
            device_camera,
            photo_picker,
            image_classifier,
            render: Render::new(device_display),
            live_capture: Arc::new(Mutex::new(None)),
        }
    }

    pub fn event_sender(&self) -> Sender<Event> {
        self.event_sender.clone()
    }

    pub fn state(&self) -> State {
        lock(&self.state).clone()
    }

    /// Runs until [`Event::Shutdown`] is handled or the classifier can never work.
    pub fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let (initial, effects) = init();
        *lock(&self.state) = initial.clone();
        self.render.render(&initial.ui)?;
        self.execute_effects(effects);

        loop {
            let event = lock(&self.event_receiver).recv()?;
            if self.handle_event(event)? == Step::Finished {
                return Ok(());
            }
        }
    }

    /// Handles at most one event, waiting up to `timeout` for it.
    pub fn process_next(&self, timeout: Duration) -> Result<Step, Box<dyn Error + Send + Sync>> {
        let received = lock(&self.event_receiver).recv_timeout(timeout);
        match received {
            Ok(event) => self.handle_event(event),
            Err(RecvTimeoutError::Timeout) => Ok(Step::TimedOut),
            Err(e @ RecvTimeoutError::Disconnected) => Err(Box::new(e)),
        }
    }

    fn handle_event(&self, event: Event) -> Result<Step, Box<dyn Error + Send + Sync>> {
        let finished = matches!(event, Event::Shutdown);
        let fatal = match &event {
            Event::ClassifyDone { result: Err(e), .. } if e.is_fatal() => Some(e.clone()),
            _ => None,
        };

        if !matches!(event, Event::LiveFrame { .. }) {
            let _ = self.logger.info(&format!("event: {:?}", event));
        }

        let current = lock(&self.state).clone();
        let (new_state, effects) = transition(&self.config, current, event);

        if !effects.is_empty() {
            let _ = self.logger.info(&format!(
                "mode: {:?}, effects: {:?}",
                new_state.mode, effects
            ));
        }

        *lock(&self.state) = new_state.clone();
        self.render.render(&new_state.ui)?;
        self.execute_effects(effects);

        if let Some(e) = fatal {
            let _ = self.logger.error(&format!("Classifier unusable: {}", e));
            self.release_live_capture();
            return Err(Box::new(e));
        }

        if finished {
            self.release_live_capture();
            return Ok(Step::Finished);
        }

        Ok(Step::Handled)
    }

    fn execute_effects(&self, effects: Vec<Effect>) {
        for effect in effects {
            if effect.runs_on_session_thread() {
                self.run_effect(effect);
                continue;
            }

            let self_clone = self.clone();
            std::thread::spawn(move || self_clone.run_effect(effect));
        }
    }

    pub(super) fn release_live_capture(&self) {
        if let Some((session, mut capture)) = lock(&self.live_capture).take() {
            let _ = self
                .logger
                .info(&format!("Releasing camera held by {:?}", session));
            capture.stop();
        }
    }
}

pub(super) fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
