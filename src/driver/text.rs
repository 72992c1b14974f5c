//! Rendered-text approximation for static HTML.
//!
//! Browsers report an element's text with line breaks between block-level
//! children and collapsed whitespace inside inline runs. Review splitting
//! depends on that first line break, so the static driver reproduces it.

use scraper::node::Node;
use scraper::ElementRef;

const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "details", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hr", "li", "main", "nav", "ol", "p", "pre", "section", "summary", "table",
    "tbody", "td", "tfoot", "th", "thead", "tr", "ul",
];

const SKIPPED_TAGS: &[&str] = &["script", "style", "template", "noscript", "head"];

/// Text of `element` as a browser would render it.
pub fn rendered_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    collect(element, &mut raw);

    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collect(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                // Source newlines inside inline text are just whitespace.
                out.push_str(&text.replace(['\n', '\r'], " "));
            }
            Node::Element(el) => {
                let name = el.name();
                if SKIPPED_TAGS.contains(&name) {
                    continue;
                }
                if name == "br" {
                    out.push('\n');
                    continue;
                }
                let Some(child_ref) = ElementRef::wrap(child) else {
                    continue;
                };
                let block = BLOCK_TAGS.contains(&name);
                if block {
                    out.push('\n');
                }
                collect(child_ref, out);
                if block {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn text_of(html: &str, css: &str) -> String {
        let doc = Html::parse_fragment(html);
        let sel = Selector::parse(css).unwrap();
        rendered_text(doc.select(&sel).next().unwrap())
    }

    #[test]
    fn test_block_children_become_lines() {
        let html = r#"<div class="review"><span>2023-03-01</span><p>Great   product,
            fast shipping.</p></div>"#;
        assert_eq!(
            text_of(html, ".review"),
            "2023-03-01\nGreat product, fast shipping."
        );
    }

    #[test]
    fn test_inline_children_stay_on_one_line() {
        let html = r#"<h3><a href="/p/1">Box of <b>Chocolate</b> Candy</a></h3>"#;
        assert_eq!(text_of(html, "h3"), "Box of Chocolate Candy");
    }

    #[test]
    fn test_br_and_scripts() {
        let html = r#"<div id="x">one<br>two<script>var a = 1;</script></div>"#;
        assert_eq!(text_of(html, "#x"), "one\ntwo");
    }

    #[test]
    fn test_empty_element() {
        assert_eq!(text_of(r#"<div id="e">  </div>"#, "#e"), "");
    }
}
