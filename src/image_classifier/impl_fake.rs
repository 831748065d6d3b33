use crate::frame::Frame;
use crate::image_classifier::interface::{Classification, ImageClassifier, ImageClassifierError};
use crate::library::logger::interface::Logger;
use rand::distr::{Distribution, Uniform};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const FOODS: [&str; 12] = [
    "laksa",
    "curry noodles",
    "tom yum noodle soup",
    "chicken rice",
    "char kway teow",
    "nasi lemak",
    "satay",
    "roti prata",
    "bak kut teh",
    "hokkien mee",
    "chilli crab",
    "kaya toast",
];

enum Behavior {
    Random,
    Fixed(Result<Vec<Classification>, ImageClassifierError>),
}

pub struct ImageClassifierFake {
    logger: Arc<dyn Logger + Send + Sync>,
    behavior: Behavior,
    latency: Duration,
    calls: AtomicUsize,
}

impl ImageClassifierFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("image_classifier").with_namespace("fake"),
            behavior: Behavior::Random,
            latency: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    #[allow(dead_code)]
    pub fn with_results(
        logger: Arc<dyn Logger + Send + Sync>,
        results: Result<Vec<Classification>, ImageClassifierError>,
    ) -> Self {
        Self {
            behavior: Behavior::Fixed(results),
            ..Self::new(logger)
        }
    }

    #[allow(dead_code)]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    #[allow(dead_code)]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn random_classifications(&self) -> Result<Vec<Classification>, ImageClassifierError> {
        let mut rng = rand::rng();

        let index_dist = Uniform::new(0, FOODS.len())
            .map_err(|e| ImageClassifierError::Inference(e.to_string()))?;
        let confidence_dist =
            Uniform::new(0.0f32, 1.0).map_err(|e| ImageClassifierError::Inference(e.to_string()))?;

        let mut classifications: Vec<Classification> = (0..3)
            .map(|_| Classification {
                label: FOODS[index_dist.sample(&mut rng)].to_string(),
                confidence: confidence_dist.sample(&mut rng),
            })
            .collect();
        classifications.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

        Ok(classifications)
    }
}

impl ImageClassifier for ImageClassifierFake {
    fn classify(&self, frame: &Frame) -> Result<Vec<Classification>, ImageClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _ = self.logger.info(&format!("Classifying {:?}", frame));

        if !self.latency.is_zero() {
            std::thread::sleep(self.latency);
        }

        match &self.behavior {
            Behavior::Random => self.random_classifications(),
            Behavior::Fixed(results) => results.clone(),
        }
    }
}
