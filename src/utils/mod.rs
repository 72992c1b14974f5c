//! Shared utility functions.
//!
//! - `html`: HTML escaping for safe rendering
//! - `dates`: review date parsing and calendar months

mod dates;
mod html;

pub use dates::{parse_review_date, YearMonth};
pub use html::html_escape;
