use crate::image_classifier::models::model_config::ModelConfig;
use crate::orientation::ImageOrientation;
use chrono::{Offset, Utc};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierBackend {
    TractOnnx(ModelConfig),
    /// Random food labels, used when the model file is missing.
    Fake,
}

impl ClassifierBackend {
    pub fn detect(model_config: ModelConfig) -> Self {
        if Path::new(&model_config.onnx_model_path).is_file() {
            ClassifierBackend::TractOnnx(model_config)
        } else {
            ClassifierBackend::Fake
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CameraBackend {
    /// Replays the images of a directory as a live feed. An empty directory is no camera.
    ImageDir(PathBuf),
    /// Synthetic frames, used when the directory does not exist.
    Fake,
}

impl CameraBackend {
    pub fn detect(dir: PathBuf) -> Self {
        if dir.is_dir() {
            CameraBackend::ImageDir(dir)
        } else {
            CameraBackend::Fake
        }
    }
}

#[derive(Debug, Clone)]
pub struct CameraConfig {
    pub backend: CameraBackend,
    pub frame_interval: Duration,
    pub orientation: ImageOrientation,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub logger_timezone: chrono::FixedOffset,
    /// Live frames arriving while this many classifications are outstanding are dropped.
    pub live_max_in_flight: usize,
    /// Discard live results older than the last one shown.
    pub live_strict_recency: bool,
    pub classifier: ClassifierBackend,
    pub camera: CameraConfig,
    pub window_size: [f32; 2],
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logger_timezone: singapore_standard_time(),
            live_max_in_flight: 1,
            live_strict_recency: false,
            classifier: ClassifierBackend::detect(ModelConfig::default()),
            camera: CameraConfig {
                backend: CameraBackend::detect(PathBuf::from("./frames")),
                frame_interval: Duration::from_millis(100),
                orientation: ImageOrientation::Up,
            },
            window_size: [420.0, 640.0],
        }
    }
}

fn singapore_standard_time() -> chrono::FixedOffset {
    chrono::FixedOffset::east_opt(8 * 3600).unwrap_or_else(|| Utc.fix())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_model_selects_fake_classifier() {
        let model_config = ModelConfig {
            onnx_model_path: std::env::temp_dir()
                .join("image-check-no-model.onnx")
                .display()
                .to_string(),
            ..ModelConfig::default()
        };

        assert_eq!(ClassifierBackend::detect(model_config), ClassifierBackend::Fake);
    }

    #[test]
    fn test_present_model_selects_tract_onnx() {
        let path = std::env::temp_dir().join("image-check-present-model.onnx");
        std::fs::write(&path, b"onnx").unwrap();
        let model_config = ModelConfig {
            onnx_model_path: path.display().to_string(),
            ..ModelConfig::default()
        };

        let backend = ClassifierBackend::detect(model_config.clone());

        assert_eq!(backend, ClassifierBackend::TractOnnx(model_config));
    }

    #[test]
    fn test_camera_backend_follows_frames_directory() {
        let dir = std::env::temp_dir();
        assert_eq!(
            CameraBackend::detect(dir.clone()),
            CameraBackend::ImageDir(dir.clone())
        );

        let missing = dir.join("image-check-no-frames");
        assert_eq!(CameraBackend::detect(missing), CameraBackend::Fake);
    }
}
