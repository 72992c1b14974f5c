//! Review sentiment: the classifier interface, the HTTP inference client and
//! the service that annotates a whole document.

mod annotator;
mod client;

pub use annotator::{annotate_document, truncate_chars, AnnotationEvent, AnnotationStats};
pub use client::{ClassifierConfig, InferenceClient};

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{SentimentAnnotation, SentimentLabel};

/// A classifier's verdict on one text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sentiment {
    pub label: SentimentLabel,
    /// Confidence in `label`, 0..=1.
    pub score: f64,
}

impl From<Sentiment> for SentimentAnnotation {
    fn from(s: Sentiment) -> Self {
        SentimentAnnotation::new(s.label, s.score)
    }
}

/// Binary sentiment classifier.
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    /// Name for progress output (usually the model id).
    fn name(&self) -> &str;

    async fn classify(&self, text: &str) -> Result<Sentiment, ClassifierError>;
}

/// Errors that can occur while classifying.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// Failed to reach the inference service.
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    /// The response did not have the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unknown sentiment label: {0}")]
    UnknownLabel(String),
}
