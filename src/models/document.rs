//! The persisted document holding all three record collections.

use serde::{Deserialize, Serialize};

use super::{Product, Review, Testimonial};

/// Everything one scrape run produced, in scrape order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub testimonials: Vec<Testimonial>,
}

/// Record counts for summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DocumentCounts {
    pub products: usize,
    pub reviews: usize,
    pub testimonials: usize,
    pub annotated_reviews: usize,
}

impl Document {
    pub fn counts(&self) -> DocumentCounts {
        DocumentCounts {
            products: self.products.len(),
            reviews: self.reviews.len(),
            testimonials: self.testimonials.len(),
            annotated_reviews: self.reviews.iter().filter(|r| r.is_annotated()).count(),
        }
    }

    /// True when at least one review carries a sentiment annotation.
    pub fn has_annotations(&self) -> bool {
        self.reviews.iter().any(Review::is_annotated)
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty() && self.reviews.is_empty() && self.testimonials.is_empty()
    }
}
