//! Helper types and utility functions for handlers.

use serde::{Deserialize, Serialize};

use crate::models::{Review, SentimentLabel};
use crate::utils::{parse_review_date, YearMonth};

/// Query params for the month filter.
#[derive(Debug, Default, Deserialize)]
pub struct MonthParams {
    pub month: Option<String>,
}

/// Resolve the requested month against the selectable ones.
///
/// No month means the first selectable month. A month outside the list is an
/// error message for the caller to show.
pub fn select_month(requested: Option<&str>, months: &[YearMonth]) -> Result<YearMonth, String> {
    match requested.map(str::trim).filter(|m| !m.is_empty()) {
        None => months
            .first()
            .copied()
            .ok_or_else(|| "No months configured".to_string()),
        Some(raw) => {
            let month: YearMonth = raw.parse()?;
            if months.contains(&month) {
                Ok(month)
            } else {
                Err(format!("{} is outside the selectable range", month.label()))
            }
        }
    }
}

/// Reviews whose date falls in `month`. Undated and unparseable reviews are
/// in no month.
pub fn reviews_in_month(reviews: &[Review], month: YearMonth) -> Vec<&Review> {
    reviews
        .iter()
        .filter(|r| parse_review_date(&r.date).is_some_and(|d| month.contains(d)))
        .collect()
}

/// Per-label count and mean confidence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentBucket {
    pub label: SentimentLabel,
    pub count: usize,
    pub mean_confidence: f64,
}

/// Aggregates over one month's reviews.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthSummary {
    pub total: usize,
    pub positive: usize,
    pub negative: usize,
    /// One bucket per label present, positive first.
    pub buckets: Vec<SentimentBucket>,
}

impl MonthSummary {
    pub fn of(reviews: &[&Review]) -> Self {
        let buckets: Vec<SentimentBucket> = [SentimentLabel::Positive, SentimentLabel::Negative]
            .into_iter()
            .filter_map(|label| {
                let confidences: Vec<f64> = reviews
                    .iter()
                    .filter_map(|r| r.annotation)
                    .filter(|a| a.label == label)
                    .map(|a| a.confidence)
                    .collect();
                if confidences.is_empty() {
                    return None;
                }
                Some(SentimentBucket {
                    label,
                    count: confidences.len(),
                    mean_confidence: confidences.iter().sum::<f64>() / confidences.len() as f64,
                })
            })
            .collect();

        let count_of = |label| {
            buckets
                .iter()
                .find(|b| b.label == label)
                .map_or(0, |b| b.count)
        };
        Self {
            total: reviews.len(),
            positive: count_of(SentimentLabel::Positive),
            negative: count_of(SentimentLabel::Negative),
            buckets,
        }
    }
}
