//! Static asset constants.

/// Stylesheet for the dashboard.
pub const CSS: &str = include_str!("styles.css");
