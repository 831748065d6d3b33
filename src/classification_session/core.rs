use crate::classification_session::text::{
    describe_result, unable_to_classify, CLASSIFYING_LABEL, PLACEHOLDER_ACCURACY,
    PLACEHOLDER_LABEL,
};
use crate::config::Config;
use crate::device_display::interface::Preview;
use crate::frame::Frame;
use crate::frame_source::interface::FrameSourceError;
use crate::image_classifier::interface::{Classification, ImageClassifierError};
use crate::photo_picker::interface::PickSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(pub u64);

/// Tag carried by every dispatched classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub session: SessionId,
    pub seq: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LivePhase {
    Starting,
    Streaming,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiveScan {
    pub session: SessionId,
    pub phase: LivePhase,
    pub next_seq: u64,
    pub in_flight: usize,
    pub last_rendered_seq: Option<u64>,
}

impl LiveScan {
    fn starting(session: SessionId) -> Self {
        Self {
            session,
            phase: LivePhase::Starting,
            next_seq: 0,
            in_flight: 0,
            last_rendered_seq: None,
        }
    }

    fn dispatch(&mut self) -> Ticket {
        let ticket = Ticket {
            session: self.session,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.in_flight += 1;
        ticket
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SingleShotPhase {
    Picking,
    Classifying,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Idle,
    LiveScanning(LiveScan),
    SingleShotPending {
        session: SessionId,
        phase: SingleShotPhase,
    },
}

impl Mode {
    pub fn is_idle(&self) -> bool {
        matches!(self, Mode::Idle)
    }

    fn live_session(&self) -> Option<SessionId> {
        match self {
            Mode::LiveScanning(live) => Some(live.session),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    pub label: String,
    pub accuracy: String,
    pub image: Option<Frame>,
    pub preview: Option<Preview>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            label: PLACEHOLDER_LABEL.to_string(),
            accuracy: PLACEHOLDER_ACCURACY.to_string(),
            image: None,
            preview: None,
        }
    }
}

impl UiState {
    fn reset_text(&mut self) {
        self.label = PLACEHOLDER_LABEL.to_string();
        self.accuracy = PLACEHOLDER_ACCURACY.to_string();
    }

    fn show_result(&mut self, result: &Result<Vec<Classification>, ImageClassifierError>) {
        let (label, accuracy) = describe_result(result);
        self.label = label;
        if let Some(accuracy) = accuracy {
            self.accuracy = accuracy;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub mode: Mode,
    pub ui: UiState,
    next_session: u64,
}

impl Default for State {
    fn default() -> Self {
        Self {
            mode: Mode::Idle,
            ui: UiState::default(),
            next_session: 1,
        }
    }
}

impl State {
    fn begin_session(&mut self) -> SessionId {
        let session = SessionId(self.next_session);
        self.next_session += 1;
        session
    }

    /// Leaves live scanning: the preview goes away and the texts go back to the placeholders.
    fn end_live_scan(&mut self, session: SessionId) -> Effect {
        self.mode = Mode::Idle;
        self.ui.preview = None;
        self.ui.reset_text();
        Effect::StopLiveCapture { session }
    }
}

#[derive(Debug)]
pub enum Event {
    LiveToggled,
    PickRequested(PickSource),
    CameraStartDone {
        session: SessionId,
        result: Result<(), FrameSourceError>,
    },
    LiveFrame {
        session: SessionId,
        frame: Frame,
    },
    PickerDone {
        session: SessionId,
        result: Result<Option<Frame>, FrameSourceError>,
    },
    ClassifyDone {
        ticket: Ticket,
        result: Result<Vec<Classification>, ImageClassifierError>,
    },
    Shutdown,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    StartLiveCapture { session: SessionId },
    StopLiveCapture { session: SessionId },
    OpenPicker { session: SessionId, source: PickSource },
    ClassifyFrame { ticket: Ticket, frame: Frame },
}

impl Effect {
    /// Effects that manage the camera hold run on the session thread, so that a stop
    /// has taken effect before the next event is handled.
    pub fn runs_on_session_thread(&self) -> bool {
        matches!(
            self,
            Effect::StartLiveCapture { .. } | Effect::StopLiveCapture { .. }
        )
    }
}

pub fn init() -> (State, Vec<Effect>) {
    (State::default(), vec![])
}

pub fn transition(config: &Config, state: State, event: Event) -> (State, Vec<Effect>) {
    let mut state = state;

    match (state.mode.clone(), event) {
        // Live scanning
        (Mode::LiveScanning(live), Event::LiveToggled) => {
            let stop = state.end_live_scan(live.session);
            (state, vec![stop])
        }
        (mode, Event::LiveToggled) => {
            if matches!(mode, Mode::SingleShotPending { .. }) {
                state.ui.reset_text();
            }
            let session = state.begin_session();
            state.mode = Mode::LiveScanning(LiveScan::starting(session));
            (state, vec![Effect::StartLiveCapture { session }])
        }
        (Mode::LiveScanning(mut live), Event::CameraStartDone { session, result })
            if live.session == session && live.phase == LivePhase::Starting =>
        {
            match result {
                Ok(()) => {
                    live.phase = LivePhase::Streaming;
                    state.mode = Mode::LiveScanning(live);
                    state.ui.preview = Some(Preview::default());
                }
                Err(_) => {
                    state.mode = Mode::Idle;
                }
            }
            (state, vec![])
        }
        (mode, Event::CameraStartDone { session, result: Ok(()) })
            if mode.live_session() != Some(session) =>
        {
            (state, vec![Effect::StopLiveCapture { session }])
        }
        (Mode::LiveScanning(mut live), Event::LiveFrame { session, frame })
            if live.session == session && live.phase == LivePhase::Streaming =>
        {
            if let Some(preview) = state.ui.preview.as_mut() {
                preview.latest_frame = Some(frame.clone());
            }

            if live.in_flight >= config.live_max_in_flight.max(1) {
                state.mode = Mode::LiveScanning(live);
                return (state, vec![]);
            }

            let ticket = live.dispatch();
            state.mode = Mode::LiveScanning(live);
            (state, vec![Effect::ClassifyFrame { ticket, frame }])
        }
        (Mode::LiveScanning(mut live), Event::ClassifyDone { ticket, result })
            if live.session == ticket.session =>
        {
            live.in_flight = live.in_flight.saturating_sub(1);

            let superseded = config.live_strict_recency
                && live.last_rendered_seq.is_some_and(|last| ticket.seq < last);
            if !superseded {
                state.ui.show_result(&result);
                live.last_rendered_seq = Some(
                    live.last_rendered_seq
                        .map_or(ticket.seq, |last| last.max(ticket.seq)),
                );
            }

            state.mode = Mode::LiveScanning(live);
            (state, vec![])
        }

        // Single shot
        (mode, Event::PickRequested(source)) => {
            let mut effects = vec![];
            if let Some(live_session) = mode.live_session() {
                effects.push(state.end_live_scan(live_session));
            }
            if matches!(mode, Mode::SingleShotPending { .. }) {
                state.ui.reset_text();
            }

            let session = state.begin_session();
            state.mode = Mode::SingleShotPending {
                session,
                phase: SingleShotPhase::Picking,
            };
            effects.push(Effect::OpenPicker { session, source });
            (state, effects)
        }
        (
            Mode::SingleShotPending {
                session: pending,
                phase: SingleShotPhase::Picking,
            },
            Event::PickerDone { session, result },
        ) if pending == session => match result {
            Ok(Some(frame)) => {
                state.mode = Mode::SingleShotPending {
                    session,
                    phase: SingleShotPhase::Classifying,
                };
                state.ui.label = CLASSIFYING_LABEL.to_string();
                state.ui.image = Some(frame.clone());
                let ticket = Ticket { session, seq: 0 };
                (state, vec![Effect::ClassifyFrame { ticket, frame }])
            }
            Ok(None) => {
                state.mode = Mode::Idle;
                (state, vec![])
            }
            Err(e) => {
                state.mode = Mode::Idle;
                state.ui.label = unable_to_classify(&e);
                (state, vec![])
            }
        },
        (
            Mode::SingleShotPending {
                session: pending,
                phase: SingleShotPhase::Classifying,
            },
            Event::ClassifyDone { ticket, result },
        ) if pending == ticket.session => {
            state.ui.show_result(&result);
            state.mode = Mode::Idle;
            (state, vec![])
        }

        (Mode::LiveScanning(live), Event::Shutdown) => {
            let stop = state.end_live_scan(live.session);
            (state, vec![stop])
        }
        (_, Event::Shutdown) => {
            state.mode = Mode::Idle;
            (state, vec![])
        }

        // Stale completions, frames and starts of sessions that are over
        _ => (state, vec![]),
    }
}
