use crate::frame::Frame;
use crate::image_classifier::interface::{Classification, ImageClassifier, ImageClassifierError};
use crate::image_classifier::models::model_config::ModelConfig;
use crate::image_classifier::tract::image::center_crop_to_tensor;
use crate::library::logger::interface::Logger;
use std::sync::{Arc, OnceLock};
use tract_onnx::prelude::*;

pub struct LoadedModel {
    plan: SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>,
    labels: Vec<String>,
}

impl LoadedModel {
    fn load(config: &ModelConfig) -> Result<Self, ImageClassifierError> {
        let (height, width) = config.input_shape;
        let plan = tract_onnx::onnx()
            .model_for_path(&config.onnx_model_path)
            .and_then(|model| {
                model.with_input_fact(
                    0,
                    f32::fact([1, 3, height as usize, width as usize]).into(),
                )
            })
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| {
                ImageClassifierError::ModelLoad(format!("{}: {}", config.onnx_model_path, e))
            })?;

        let labels = std::fs::read_to_string(&config.labels_path)
            .map(|contents| parse_labels(&contents))
            .map_err(|e| ImageClassifierError::ModelLoad(format!("{}: {}", config.labels_path, e)))?;

        Ok(Self { plan, labels })
    }
}

pub struct ImageClassifierTractOnnx {
    config: ModelConfig,
    logger: Arc<dyn Logger + Send + Sync>,
    model: OnceLock<Result<LoadedModel, ImageClassifierError>>,
}

impl ImageClassifierTractOnnx {
    pub fn new(config: ModelConfig, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            config,
            logger: logger.with_namespace("image_classifier").with_namespace("tract_onnx"),
            model: OnceLock::new(),
        }
    }

    /// Loads the model on first use. Later calls, from any thread, reuse the first outcome.
    pub fn load_model(&self) -> Result<&LoadedModel, ImageClassifierError> {
        self.model
            .get_or_init(|| {
                let _ = self
                    .logger
                    .info(&format!("Loading model {}", self.config.onnx_model_path));
                let loaded = LoadedModel::load(&self.config);
                if let Err(e) = &loaded {
                    let _ = self.logger.error(&e.to_string());
                }
                loaded
            })
            .as_ref()
            .map_err(Clone::clone)
    }
}

impl ImageClassifier for ImageClassifierTractOnnx {
    fn classify(&self, frame: &Frame) -> Result<Vec<Classification>, ImageClassifierError> {
        let model = self.load_model()?;
        let (height, width) = self.config.input_shape;

        let input = center_crop_to_tensor(
            &frame.upright(),
            width,
            height,
            self.config.mean,
            self.config.std,
        )
        .map_err(|e| ImageClassifierError::Preprocess(e.to_string()))?;

        let outputs = model
            .plan
            .run(tvec!(input.into_tvalue()))
            .map_err(|e| ImageClassifierError::Inference(e.to_string()))?;

        let output = outputs
            .first()
            .ok_or_else(|| ImageClassifierError::Inference("model produced no output".to_string()))?
            .to_array_view::<f32>()
            .map_err(|e| ImageClassifierError::Inference(e.to_string()))?;

        let scores: Vec<f32> = output.iter().copied().collect();
        let scores = if self.config.apply_softmax {
            softmax(&scores)
        } else {
            scores
        };

        Ok(rank(&scores, &model.labels, self.config.top_k))
    }
}

pub fn parse_labels(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum == 0.0 || !sum.is_finite() {
        return scores.to_vec();
    }
    exps.iter().map(|e| e / sum).collect()
}

fn rank(scores: &[f32], labels: &[String], top_k: usize) -> Vec<Classification> {
    let mut predictions: Vec<(usize, f32)> = scores
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, score)| score.is_finite())
        .collect();

    predictions.sort_by(|a, b| b.1.total_cmp(&a.1));
    predictions.truncate(top_k);

    predictions
        .into_iter()
        .map(|(class_idx, confidence)| Classification {
            label: labels
                .get(class_idx)
                .cloned()
                .unwrap_or_else(|| format!("class_{}", class_idx)),
            confidence: confidence.clamp(0.0, 1.0),
        })
        .collect()
}
