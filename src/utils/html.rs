//! HTML escaping utilities.

/// Escape HTML special characters for safe rendering in text and attributes.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape_basic() {
        assert_eq!(html_escape("Box of Chocolate Candy"), "Box of Chocolate Candy");
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("Salt & Pepper"), "Salt &amp; Pepper");
    }

    #[test]
    fn test_html_escape_quotes() {
        assert_eq!(
            html_escape(r#"It's "great""#),
            "It&#39;s &quot;great&quot;"
        );
    }
}
