use super::fixture::{classification, photo, Fixture, STEP_TIMEOUT};
use crate::classification_session::core::{Effect, Event, Mode, SessionId};
use crate::classification_session::main::Step;
use crate::device_display::interface::DeviceDisplay;
use crate::image_classifier::interface::ImageClassifierError;
use crate::photo_picker::interface::PickSource;
use std::time::{Duration, Instant};

#[test]
fn test_live_toggle_without_camera() {
    let fixture = Fixture::builder().without_camera().build();

    fixture.send(Event::LiveToggled);
    assert_eq!(fixture.session.process_next(STEP_TIMEOUT).unwrap(), Step::Handled);
    assert_eq!(fixture.session.process_next(STEP_TIMEOUT).unwrap(), Step::Handled);

    assert_eq!(fixture.session.state().mode, Mode::Idle);
    assert!(!fixture.device_camera.is_running());
    fixture.display(|display| {
        assert_eq!(display.preview_surface_count(), 0);
        assert_eq!(display.preview_attach_count, 0);
        assert_eq!(display.label, "What is the image?");
        assert_eq!(display.accuracy, "Accuracy");
    });
}

#[test]
fn test_single_shot_laksa() {
    let fixture = Fixture::builder()
        .picking(Some(photo()))
        .classifying_as(Ok(vec![classification("laksa", 0.9123)]))
        .build();

    fixture.send(Event::PickRequested(PickSource::Library));
    assert_eq!(fixture.session.process_next(STEP_TIMEOUT).unwrap(), Step::Handled);
    assert_eq!(fixture.session.process_next(STEP_TIMEOUT).unwrap(), Step::Handled);

    fixture.display(|display| {
        assert_eq!(display.label, "Classifying...");
        assert!(display.image.is_some());
    });

    fixture.run_until(|f| f.session.state().mode.is_idle());

    assert_eq!(fixture.photo_picker.picks(), 1);
    assert_eq!(fixture.image_classifier.calls(), 1);
    fixture.display(|display| {
        assert_eq!(display.label, "Laksa");
        assert_eq!(display.accuracy, "Accuracy:  91.23%");
        assert_eq!(display.preview_surface_count(), 0);
    });
}

#[test]
fn test_take_photo_without_camera_uses_library() {
    let fixture = Fixture::builder()
        .without_camera()
        .picking(Some(photo()))
        .classifying_as(Ok(vec![classification("satay", 0.5)]))
        .build();

    fixture.send(Event::PickRequested(PickSource::Camera));
    fixture.run_until(|f| f.display(|display| display.label == "Satay"));

    assert_eq!(fixture.photo_picker.picks(), 1);
}

#[test]
fn test_take_photo_with_camera() {
    let fixture = Fixture::builder()
        .classifying_as(Ok(vec![classification("chicken rice", 0.75)]))
        .build();

    fixture.send(Event::PickRequested(PickSource::Camera));
    fixture.run_until(|f| f.display(|display| display.label == "Chicken Rice"));

    assert_eq!(fixture.photo_picker.picks(), 0);
    assert_eq!(fixture.device_camera.captured(), 1);
    assert!(!fixture.device_camera.is_running());
}

#[test]
fn test_live_on_off_on() {
    let fixture = Fixture::builder()
        .classifier_latency(Duration::from_millis(20))
        .build();

    for round in 1..=2 {
        fixture.send(Event::LiveToggled);
        fixture.run_until(|f| {
            f.image_classifier.calls() >= round
                && f.display(|display| {
                    display
                        .preview
                        .as_ref()
                        .is_some_and(|preview| preview.latest_frame.is_some())
                })
        });
        assert!(fixture.device_camera.is_running());
        fixture.display(|display| assert_eq!(display.preview_surface_count(), 1));

        fixture.send(Event::LiveToggled);
        fixture.run_until(|f| f.session.state().mode.is_idle());
        assert!(!fixture.device_camera.is_running());

        fixture.drain(Duration::from_millis(50));
        fixture.display(|display| {
            assert_eq!(display.preview_surface_count(), 0);
            assert_eq!(display.label, "What is the image?");
            assert_eq!(display.accuracy, "Accuracy");
        });
    }

    assert_eq!(fixture.device_camera.starts(), 2);
    fixture.display(|display| assert_eq!(display.preview_attach_count, 2));
}

#[test]
fn test_first_live_frame_is_classified() {
    let frame_interval = Duration::from_secs(1);
    let fixture = Fixture::builder()
        .camera_frame_interval(frame_interval)
        .classifying_as(Ok(vec![classification("laksa", 0.8)]))
        .build();

    let toggled_at = Instant::now();
    fixture.send(Event::LiveToggled);
    fixture.run_until(|f| f.image_classifier.calls() == 1);
    fixture.run_until(|f| f.display(|display| display.label == "Laksa"));

    assert!(toggled_at.elapsed() < frame_interval);
    assert_eq!(fixture.device_camera.captured(), 1);
    fixture.display(|display| {
        assert_eq!(display.accuracy, "Accuracy:  80.00%");
        assert!(display
            .preview
            .as_ref()
            .is_some_and(|preview| preview.latest_frame.is_some()));
    });

    fixture.send(Event::LiveToggled);
    fixture.run_until(|f| f.session.state().mode.is_idle());
    assert!(!fixture.device_camera.is_running());
}

#[test]
fn test_photo_is_not_taken_while_live_scan_holds_camera() {
    let fixture = Fixture::builder().build();

    fixture.send(Event::LiveToggled);
    fixture.run_until(|f| f.device_camera.captured() >= 1);

    fixture.session.run_effect(Effect::OpenPicker {
        session: SessionId(u64::MAX),
        source: PickSource::Camera,
    });

    assert_eq!(fixture.device_camera.starts(), 1);
    assert!(fixture.device_camera.is_running());
    assert_eq!(fixture.photo_picker.picks(), 0);

    fixture.send(Event::LiveToggled);
    fixture.run_until(|f| f.session.state().mode.is_idle());
    assert!(!fixture.device_camera.is_running());
}

#[test]
fn test_model_load_failure_ends_session() {
    let fixture = Fixture::builder()
        .picking(Some(photo()))
        .classifying_as(Err(ImageClassifierError::ModelLoad(
            "no such file".to_string(),
        )))
        .build();

    fixture.send(Event::PickRequested(PickSource::Library));
    let error = fixture.session.run().unwrap_err();

    assert_eq!(
        error.downcast_ref::<ImageClassifierError>(),
        Some(&ImageClassifierError::ModelLoad("no such file".to_string()))
    );
}

#[test]
fn test_shutdown_releases_camera() {
    let fixture = Fixture::builder().build();

    fixture.send(Event::LiveToggled);
    fixture.send(Event::Shutdown);
    fixture.session.run().unwrap();

    assert_eq!(fixture.device_camera.starts(), 1);
    assert!(!fixture.device_camera.is_running());
    assert_eq!(fixture.session.state().mode, Mode::Idle);
}
