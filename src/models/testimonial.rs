//! Testimonial records.

use serde::{Deserialize, Serialize};

/// Number of characters kept from a testimonial's text.
pub const TESTIMONIAL_MAX_CHARS: usize = 50;

/// Marker appended to every captured testimonial.
pub const TESTIMONIAL_SUFFIX: &str = "...";

/// A customer testimonial, stored in its shortened display form.
///
/// The shortening happens once at capture time and is lossy; the full text is
/// never kept. Serialized as a bare JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Testimonial {
    pub text: String,
}

impl Testimonial {
    /// Capture a testimonial from rendered text.
    ///
    /// Returns `None` for blank text. Otherwise keeps the first
    /// [`TESTIMONIAL_MAX_CHARS`] characters of the trimmed text and appends
    /// [`TESTIMONIAL_SUFFIX`], even when nothing was cut.
    pub fn capture(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let mut text: String = trimmed.chars().take(TESTIMONIAL_MAX_CHARS).collect();
        text.push_str(TESTIMONIAL_SUFFIX);
        Some(Self { text })
    }

    /// Wrap already-captured text (e.g. loaded from disk).
    pub fn from_captured(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_short_text() {
        let t = Testimonial::capture("  Lovely shop!  ").unwrap();
        assert_eq!(t.text, "Lovely shop!...");
    }

    #[test]
    fn test_capture_long_text() {
        let raw = "x".repeat(80);
        let t = Testimonial::capture(&raw).unwrap();
        assert_eq!(t.text, format!("{}...", "x".repeat(50)));
    }

    #[test]
    fn test_capture_exactly_fifty() {
        let raw = "y".repeat(50);
        let t = Testimonial::capture(&raw).unwrap();
        assert_eq!(t.text.chars().count(), 53);
    }

    #[test]
    fn test_capture_counts_characters_not_bytes() {
        let raw = "č".repeat(60);
        let t = Testimonial::capture(&raw).unwrap();
        assert_eq!(t.text, format!("{}...", "č".repeat(50)));
    }

    #[test]
    fn test_capture_blank() {
        assert!(Testimonial::capture("   \n\t ").is_none());
    }

    #[test]
    fn test_serializes_as_string() {
        let t = Testimonial::from_captured("Great...");
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"Great...\"");
    }
}
