use crate::frame::Frame;

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: String,
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ImageClassifierError {
    /// The bundled model or its labels could not be loaded. Not recoverable.
    #[error("failed to load model: {0}")]
    ModelLoad(String),
    #[error("failed to prepare image: {0}")]
    Preprocess(String),
    #[error("inference failed: {0}")]
    Inference(String),
}

impl ImageClassifierError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, ImageClassifierError::ModelLoad(_))
    }
}

pub trait ImageClassifier {
    /// Classifies one frame. Results are ranked by descending confidence.
    fn classify(&self, frame: &Frame) -> Result<Vec<Classification>, ImageClassifierError>;
}
