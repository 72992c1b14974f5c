//! Element locators.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A CSS selector, optionally narrowed to elements whose rendered text
/// contains a fragment (e.g. a `button` reading "Load More").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    pub css: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_contains: Option<String>,
}

impl Locator {
    pub fn css(css: impl Into<String>) -> Self {
        Self {
            css: css.into(),
            text_contains: None,
        }
    }

    pub fn containing(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.text_contains = if text.is_empty() { None } else { Some(text) };
        self
    }

    /// Whether an element with this rendered text passes the text filter.
    pub fn accepts_text(&self, text: &str) -> bool {
        match self.text_contains {
            Some(ref needle) => text.contains(needle.as_str()),
            None => true,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.text_contains {
            Some(ref text) => write!(f, "`{}` containing {:?}", self.css, text),
            None => write!(f, "`{}`", self.css),
        }
    }
}
