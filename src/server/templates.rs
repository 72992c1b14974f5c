//! HTML templates for the dashboard.

use std::path::Path;

use crate::models::{Product, Review, SentimentLabel, Testimonial};
use crate::utils::{html_escape, YearMonth};

use super::handlers::helpers::MonthSummary;

/// Navigation entries: (path, label).
const NAV: &[(&str, &str)] = &[
    ("/reviews", "Reviews"),
    ("/products", "Products"),
    ("/testimonials", "Testimonials"),
];

/// Base HTML page. `banner` is shown above the content as a warning.
pub fn base_template(title: &str, active: &str, banner: Option<&str>, content: &str) -> String {
    let nav: String = NAV
        .iter()
        .map(|(href, label)| {
            let class = if *href == active { " class=\"active\"" } else { "" };
            format!(r#"<a href="{}"{}>{}</a>"#, href, class, label)
        })
        .collect();

    let banner = banner
        .map(|text| format!(r#"<div class="banner warning">{}</div>"#, text))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - storescrape</title>
    <link rel="stylesheet" href="/static/style.css">
</head>
<body>
    <header id="main-header">
        <nav>
            <a href="/" class="logo">storescrape</a>
            {nav}
        </nav>
    </header>
    <main>
        {banner}
        <h1>{title}</h1>
        {content}
    </main>
</body>
</html>"#,
        title = html_escape(title),
        nav = nav,
        banner = banner,
        content = content
    )
}

/// Banner for a dashboard running on unannotated data.
pub fn unannotated_banner(path: &Path) -> String {
    format!(
        "Showing unannotated data from <code>{}</code>. Run <code>storescrape annotate</code> to add sentiment.",
        html_escape(&path.display().to_string())
    )
}

/// Page shown when no document exists yet.
pub fn missing_data_page(annotated: &Path, unannotated: &Path) -> String {
    let content = format!(
        r#"
    <div class="banner error">
        <p>No scraped data found. Looked for:</p>
        <ul>
            <li><code>{}</code></li>
            <li><code>{}</code></li>
        </ul>
        <p>Run <code>storescrape scrape</code> first.</p>
    </div>"#,
        html_escape(&annotated.display().to_string()),
        html_escape(&unannotated.display().to_string())
    );
    base_template("No data", "", None, &content)
}

/// Generic error page body.
pub fn error_page(title: &str, message: &str) -> String {
    base_template(
        title,
        "",
        None,
        &format!(r#"<div class="banner error">{}</div>"#, html_escape(message)),
    )
}

fn month_selector(months: &[YearMonth], selected: YearMonth) -> String {
    let options: String = months
        .iter()
        .map(|m| {
            let sel = if *m == selected { " selected" } else { "" };
            format!(r#"<option value="{}"{}>{}</option>"#, m, sel, m.label())
        })
        .collect();
    format!(
        r#"
    <form class="month-selector" method="get" action="/reviews">
        <label for="month">Period</label>
        <select id="month" name="month" onchange="this.form.submit()">{}</select>
        <noscript><button type="submit">Show</button></noscript>
    </form>"#,
        options
    )
}

fn kpis(summary: &MonthSummary) -> String {
    format!(
        r#"
    <div class="kpis">
        <div class="kpi"><span class="kpi-value">{}</span><span class="kpi-label">Reviews</span></div>
        <div class="kpi positive"><span class="kpi-value">{}</span><span class="kpi-label">Positive</span></div>
        <div class="kpi negative"><span class="kpi-value">{}</span><span class="kpi-label">Negative</span></div>
    </div>"#,
        summary.total, summary.positive, summary.negative
    )
}

fn label_class(label: SentimentLabel) -> &'static str {
    match label {
        SentimentLabel::Positive => "positive",
        SentimentLabel::Negative => "negative",
    }
}

/// Bar chart, one bar per sentiment, height relative to the larger count.
fn sentiment_chart(summary: &MonthSummary) -> String {
    let max = summary.buckets.iter().map(|b| b.count).max().unwrap_or(0).max(1);
    let bars: String = summary
        .buckets
        .iter()
        .map(|b| {
            let height = b.count * 100 / max;
            format!(
                r#"
            <div class="bar-column" title="{label}: {count} reviews, mean confidence {mean:.2}%">
                <span class="bar-count">{count}</span>
                <div class="bar {class}" style="height: {height}%"></div>
                <span class="bar-label">{label}</span>
                <span class="bar-confidence">{mean:.2}%</span>
            </div>"#,
                label = b.label,
                count = b.count,
                mean = b.mean_confidence * 100.0,
                class = label_class(b.label),
                height = height
            )
        })
        .collect();
    format!(
        r#"
    <section class="chart">
        <h2>Sentiment</h2>
        <div class="bars">{}</div>
    </section>"#,
        bars
    )
}

fn status_marker(review: &Review) -> &'static str {
    match review.sentiment() {
        Some(SentimentLabel::Positive) => "🟩",
        Some(SentimentLabel::Negative) => "🟥",
        None => "⬜",
    }
}

fn review_table(reviews: &[&Review], annotated: bool) -> String {
    let mut rows = String::new();
    for review in reviews {
        let row = match review.annotation {
            Some(a) if annotated => format!(
                r#"
            <tr>
                <td>{}</td>
                <td class="{}">{}</td>
                <td><progress max="1" value="{:.4}"></progress> {:.2}</td>
                <td>{}</td>
            </tr>"#,
                status_marker(review),
                label_class(a.label),
                a.label,
                a.confidence,
                a.confidence,
                html_escape(&review.comment)
            ),
            _ => format!(
                r#"
            <tr>
                <td>{}</td>
                <td>{}</td>
                <td>{}</td>
            </tr>"#,
                status_marker(review),
                html_escape(&review.date),
                html_escape(&review.comment)
            ),
        };
        rows.push_str(&row);
    }

    let head = if annotated {
        "<th></th><th>Sentiment</th><th>Confidence</th><th>Comment</th>"
    } else {
        "<th></th><th>Date</th><th>Comment</th>"
    };
    format!(
        r#"
    <section class="details">
        <h2>Details</h2>
        <table class="listing">
            <thead><tr>{}</tr></thead>
            <tbody>{}</tbody>
        </table>
    </section>"#,
        head, rows
    )
}

/// The review analysis page for one month.
pub fn reviews_page(
    months: &[YearMonth],
    selected: YearMonth,
    reviews: &[&Review],
    summary: &MonthSummary,
    annotated: bool,
) -> String {
    let mut content = month_selector(months, selected);

    if !annotated {
        content.push_str(
            r#"<div class="banner warning">Reviews have no sentiment yet, so the chart is not available.</div>"#,
        );
    }

    if reviews.is_empty() {
        content.push_str(&format!(
            r#"<p class="empty">No reviews in {}.</p>"#,
            selected.label()
        ));
        return content;
    }

    content.push_str(&kpis(summary));
    content.push_str(r#"<div class="columns">"#);
    if annotated {
        content.push_str(&sentiment_chart(summary));
    }
    content.push_str(&review_table(reviews, annotated));
    content.push_str("</div>");
    content
}

pub fn products_table(products: &[Product]) -> String {
    if products.is_empty() {
        return r#"<p class="empty">No products scraped.</p>"#.to_string();
    }
    let rows: String = products
        .iter()
        .map(|p| {
            format!(
                "\n            <tr><td>{}</td><td>{}</td></tr>",
                html_escape(&p.name),
                html_escape(&p.price)
            )
        })
        .collect();
    format!(
        r#"
    <table class="listing">
        <thead><tr><th>Name</th><th>Price</th></tr></thead>
        <tbody>{}
        </tbody>
    </table>"#,
        rows
    )
}

pub fn testimonials_table(testimonials: &[Testimonial]) -> String {
    if testimonials.is_empty() {
        return r#"<p class="empty">No testimonials scraped.</p>"#.to_string();
    }
    let rows: String = testimonials
        .iter()
        .map(|t| format!("\n            <tr><td>{}</td></tr>", html_escape(&t.text)))
        .collect();
    format!(
        r#"
    <table class="listing">
        <thead><tr><th>Testimonial</th></tr></thead>
        <tbody>{}
        </tbody>
    </table>"#,
        rows
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_names_are_escaped() {
        let html = products_table(&[Product::new("<b>Bold</b> & Co", "$1")]);
        assert!(html.contains("&lt;b&gt;Bold&lt;/b&gt; &amp; Co"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_active_nav_entry() {
        let html = base_template("Products", "/products", None, "");
        assert!(html.contains(r#"<a href="/products" class="active">Products</a>"#));
        assert!(!html.contains("banner"));
    }

    #[test]
    fn test_empty_month_message() {
        let month = YearMonth::new(2023, 2).unwrap();
        let summary = MonthSummary::of(&[]);
        let html = reviews_page(&[month], month, &[], &summary, true);
        assert!(html.contains("No reviews in February 2023."));
        assert!(!html.contains("class=\"chart\""));
    }
}
