//! Driver error type.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("timed out after {waited:?} waiting for {locator}")]
    Timeout { locator: String, waited: Duration },

    #[error("no element matches {0}")]
    NotFound(String),

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("invalid selector {0:?}")]
    InvalidSelector(String),

    #[error("script failed: {0}")]
    Script(String),

    #[error("browser error: {0}")]
    Browser(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("stale element: {0}")]
    StaleElement(String),

    #[error("driver is closed")]
    Closed,
}

impl DriverError {
    /// Whether this error means "nothing showed up in time" rather than a
    /// broken session.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Whether this error concerns one element only, so the caller can skip
    /// that element and keep going.
    pub fn is_element_level(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::StaleElement(_) | Self::Timeout { .. }
        )
    }
}

pub type DriverResult<T> = Result<T, DriverError>;
