use crate::image_classifier::interface::{Classification, ImageClassifierError};
use std::fmt::Display;

pub const PLACEHOLDER_LABEL: &str = "What is the image?";
pub const PLACEHOLDER_ACCURACY: &str = "Accuracy";
pub const CLASSIFYING_LABEL: &str = "Classifying...";
pub const NOTHING_RECOGNIZED_LABEL: &str = "Nothing recognized.";
pub const UNABLE_TO_CLASSIFY_LABEL: &str = "Unable to classify image.";

/// `0.8734` becomes `"Accuracy:  87.34%"`.
pub fn format_accuracy(confidence: f32) -> String {
    format!("Accuracy:  {:.2}%", f64::from(confidence) * 100.0)
}

/// Upper-cases the first letter of every word and lower-cases the rest.
pub fn capitalize_label(label: &str) -> String {
    let mut capitalized = String::with_capacity(label.len());
    let mut at_word_start = true;

    for c in label.chars() {
        if c.is_whitespace() {
            at_word_start = true;
            capitalized.push(c);
        } else if at_word_start {
            at_word_start = false;
            capitalized.extend(c.to_uppercase());
        } else {
            capitalized.extend(c.to_lowercase());
        }
    }

    capitalized
}

pub fn unable_to_classify(error: &impl Display) -> String {
    format!("{}\n{}", UNABLE_TO_CLASSIFY_LABEL, error)
}

pub fn top_classification(classifications: &[Classification]) -> Option<&Classification> {
    classifications
        .iter()
        .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
}

/// Label and accuracy text for a finished classification. `None` accuracy keeps the current text.
pub fn describe_result(
    result: &Result<Vec<Classification>, ImageClassifierError>,
) -> (String, Option<String>) {
    match result {
        Err(e) => (unable_to_classify(e), None),
        Ok(classifications) => match top_classification(classifications) {
            None => (NOTHING_RECOGNIZED_LABEL.to_string(), None),
            Some(top) => (
                capitalize_label(&top.label),
                Some(format_accuracy(top.confidence)),
            ),
        },
    }
}
