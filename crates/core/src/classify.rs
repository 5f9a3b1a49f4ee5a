//! Injected breed-classification capability.
//!
//! The transition engine never calls a classifier: callers run classification
//! on uploaded photos before invoking `create_rescue_report` or animal-update
//! operations, and pass the resulting suggestion as plain field values. This
//! trait exists so the API layer can accept any backing implementation
//! (remote model service, local model, or none) without the engine knowing.

use async_trait::async_trait;

/// A breed suggestion produced from an animal photo.
#[derive(Debug, Clone, PartialEq)]
pub struct BreedPrediction {
    pub species: String,
    pub breed: Option<String>,
    /// Confidence in `[0.0, 1.0]`.
    pub confidence: f32,
}

#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    #[error("Classifier unavailable: {0}")]
    Unavailable(String),

    #[error("Unsupported image: {0}")]
    UnsupportedImage(String),
}

/// Capability interface for breed classification.
#[async_trait]
pub trait BreedClassifier: Send + Sync {
    async fn classify(&self, image: &[u8]) -> Result<BreedPrediction, ClassifyError>;
}

/// Classifier used when no model is configured; always unavailable.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopClassifier;

#[async_trait]
impl BreedClassifier for NoopClassifier {
    async fn classify(&self, _image: &[u8]) -> Result<BreedPrediction, ClassifyError> {
        Err(ClassifyError::Unavailable(
            "no classifier configured".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_classifier_reports_unavailable() {
        let result = NoopClassifier.classify(&[0u8; 4]).await;
        assert!(matches!(result, Err(ClassifyError::Unavailable(_))));
    }
}
