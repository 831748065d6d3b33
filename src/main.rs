use classification_session::core::Event;
use classification_session::main::ClassificationSession;
use config::{CameraBackend, ClassifierBackend, Config};
use device_camera::impl_fake::DeviceCameraFake;
use device_camera::impl_image_dir::DeviceCameraImageDir;
use device_camera::interface::DeviceCamera;
use device_display::impl_gui::DeviceDisplayGui;
use eframe::egui;
use image_classifier::impl_fake::ImageClassifierFake;
use image_classifier::impl_tract_onnx::ImageClassifierTractOnnx;
use image_classifier::interface::ImageClassifier;
use library::logger::impl_console::LoggerConsole;
use library::logger::interface::Logger;
use photo_picker::impl_file_dialog::PhotoPickerFileDialog;
use std::sync::{Arc, Mutex};

mod classification_session;
mod config;
mod device_camera;
mod device_display;
mod frame;
mod frame_source;
mod image_classifier;
mod library;
mod orientation;
mod photo_picker;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();

    let logger: Arc<dyn Logger + Send + Sync> =
        Arc::new(LoggerConsole::new(config.logger_timezone));

    let device_camera: Arc<dyn DeviceCamera + Send + Sync> = match &config.camera.backend {
        CameraBackend::ImageDir(dir) => Arc::new(DeviceCameraImageDir::new(
            dir,
            config.camera.frame_interval,
            logger.clone(),
        )),
        CameraBackend::Fake => Arc::new(
            DeviceCameraFake::new(logger.clone(), config.camera.frame_interval)
                .with_orientation(config.camera.orientation),
        ),
    };

    let image_classifier: Arc<dyn ImageClassifier + Send + Sync> = match &config.classifier {
        ClassifierBackend::TractOnnx(model_config) => Arc::new(ImageClassifierTractOnnx::new(
            model_config.clone(),
            logger.clone(),
        )),
        ClassifierBackend::Fake => {
            let _ = logger.info("No model file found, using the demo classifier");
            Arc::new(ImageClassifierFake::new(logger.clone()))
        }
    };

    let photo_picker = Arc::new(PhotoPickerFileDialog::new(logger.clone()));

    let device_display = DeviceDisplayGui::new();

    let session = ClassificationSession::new(
        config.clone(),
        logger.clone(),
        device_camera,
        photo_picker,
        Arc::new(Mutex::new(device_display.clone())),
        image_classifier,
    );
    let event_sender = session.event_sender();
    let window = device_display.window(session.event_sender());

    let session_logger = logger.clone();
    let session_thread = std::thread::spawn(move || {
        if let Err(e) = session.run() {
            let _ = session_logger.error(&format!("Session ended: {}", e));
            std::process::exit(1);
        }
    });

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size(config.window_size),
        ..Default::default()
    };
    eframe::run_native(
        "Image Check",
        native_options,
        Box::new(move |_cc| Box::new(window)),
    )?;

    let _ = event_sender.send(Event::Shutdown);
    if session_thread.join().is_err() {
        let _ = logger.error("Session thread panicked");
    }

    Ok(())
}
