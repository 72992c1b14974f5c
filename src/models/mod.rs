//! Data models for scraped store records.

mod document;
mod product;
mod review;
mod testimonial;

pub use document::{Document, DocumentCounts};
pub use product::Product;
pub use review::{Review, SentimentAnnotation, SentimentLabel, NO_DATE};
pub use testimonial::{Testimonial, TESTIMONIAL_MAX_CHARS, TESTIMONIAL_SUFFIX};
