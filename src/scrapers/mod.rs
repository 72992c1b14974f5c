//! Scrapers for the store's products, reviews and testimonials.

pub mod config;
pub mod extract;
pub mod normalize;
pub mod paginate;
pub mod pipeline;

pub use config::{ScrapeSettings, SelectorConfig, SiteConfig, TimingConfig, DEFAULT_BASE_URL};
pub use extract::{extract_products, extract_reviews, extract_testimonials, PageExtraction, RowOutcome};
pub use normalize::{insert, insert_all, Record};
pub use paginate::{PageState, PhaseStats, StopReason};
pub use pipeline::{run, Phase, PhaseOutcome, PhaseReport, ScrapeReport};
