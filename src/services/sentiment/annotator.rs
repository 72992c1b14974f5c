//! Annotating every review of a document with its sentiment.

use tracing::info;

use crate::models::{Document, SentimentAnnotation, SentimentLabel};

use super::{ClassifierError, SentimentClassifier};

/// Progress is logged every this many reviews.
const LOG_EVERY: usize = 10;

/// The first `max_chars` characters of `text` (UTF-8 safe).
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Progress updates from [`annotate_document`].
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationEvent {
    Started { total: usize },
    Classified {
        index: usize,
        total: usize,
        label: SentimentLabel,
        score: f64,
    },
    Finished(AnnotationStats),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationStats {
    pub total: usize,
    pub positive: usize,
    pub negative: usize,
    /// Inputs cut down to the character limit.
    pub truncated: usize,
}

/// Classify every review comment and annotate the document.
///
/// The annotations are collected first and applied only once every review
/// has been classified: on error the document is left exactly as it was.
pub async fn annotate_document<C, F>(
    classifier: &C,
    document: &mut Document,
    max_input_chars: usize,
    mut on_event: F,
) -> Result<AnnotationStats, ClassifierError>
where
    C: SentimentClassifier + ?Sized,
    F: FnMut(AnnotationEvent),
{
    let total = document.reviews.len();
    info!("Classifying {} reviews with {}", total, classifier.name());
    on_event(AnnotationEvent::Started { total });

    let mut stats = AnnotationStats {
        total,
        ..Default::default()
    };
    let mut annotations = Vec::with_capacity(total);
    for (index, review) in document.reviews.iter().enumerate() {
        let input = truncate_chars(&review.comment, max_input_chars);
        if input.len() < review.comment.len() {
            stats.truncated += 1;
        }

        let sentiment = classifier.classify(input).await?;
        match sentiment.label {
            SentimentLabel::Positive => stats.positive += 1,
            SentimentLabel::Negative => stats.negative += 1,
        }
        if index % LOG_EVERY == 0 {
            info!("Classified {}/{}", index, total);
        }
        on_event(AnnotationEvent::Classified {
            index,
            total,
            label: sentiment.label,
            score: sentiment.score,
        });
        annotations.push(SentimentAnnotation::from(sentiment));
    }

    for (review, annotation) in document.reviews.iter_mut().zip(annotations) {
        review.annotate(annotation);
    }
    on_event(AnnotationEvent::Finished(stats.clone()));
    Ok(stats)
}
