//! Review records and their optional sentiment annotation.

use serde::{Deserialize, Serialize};

/// Date value used when a review's text has no separate date line.
pub const NO_DATE: &str = "N/A";

/// Polarity label produced by the sentiment classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "POSITIVE",
            Self::Negative => "NEGATIVE",
        }
    }

    /// Parse a classifier label. Accepts the SST-2 names and the generic
    /// `LABEL_0` / `LABEL_1` ids some endpoints return.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "POSITIVE" | "POS" | "LABEL_1" => Some(Self::Positive),
            "NEGATIVE" | "NEG" | "LABEL_0" => Some(Self::Negative),
            _ => None,
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label and confidence attached to a review by the annotator.
///
/// Both values travel together; a review is either fully annotated or not at
/// all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentAnnotation {
    #[serde(rename = "Sentiment")]
    pub label: SentimentLabel,
    #[serde(rename = "Confidence")]
    pub confidence: f64,
}

impl SentimentAnnotation {
    /// Create an annotation, clamping the confidence into `[0, 1]`.
    pub fn new(label: SentimentLabel, confidence: f64) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self { label, confidence }
    }
}

/// A customer review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Date line as rendered, or [`NO_DATE`].
    pub date: String,
    pub comment: String,
    #[serde(flatten)]
    pub annotation: Option<SentimentAnnotation>,
}

impl Review {
    pub fn new(date: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            comment: comment.into(),
            annotation: None,
        }
    }

    /// Split a review's rendered text into date and comment.
    ///
    /// Only the first line break separates the two; the comment keeps any
    /// further line breaks. Without a line break the whole text is the
    /// comment and the date is [`NO_DATE`].
    pub fn from_text(text: &str) -> Self {
        let text = text.trim();
        match text.split_once('\n') {
            Some((date, comment)) => Self::new(date.trim(), comment.trim()),
            None => Self::new(NO_DATE, text),
        }
    }

    pub fn has_date(&self) -> bool {
        self.date != NO_DATE
    }

    pub fn sentiment(&self) -> Option<SentimentLabel> {
        self.annotation.map(|a| a.label)
    }

    pub fn confidence(&self) -> Option<f64> {
        self.annotation.map(|a| a.confidence)
    }

    pub fn is_annotated(&self) -> bool {
        self.annotation.is_some()
    }

    pub fn annotate(&mut self, annotation: SentimentAnnotation) {
        self.annotation = Some(annotation);
    }
}
