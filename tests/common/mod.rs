//! Shared fixtures: a small in-memory copy of the store.

#![allow(dead_code)]

use storescrape::driver::StaticDomDriver;
use storescrape::scrapers::{ScrapeSettings, SiteConfig, TimingConfig};

pub const BASE: &str = "https://shop.test";

pub fn url(path: &str) -> String {
    format!("{}{}", BASE, path)
}

/// Settings pointed at the fixture site with every wait zeroed.
pub fn settings() -> ScrapeSettings {
    ScrapeSettings {
        site: SiteConfig {
            base_url: BASE.to_string(),
            ..Default::default()
        },
        timing: TimingConfig::immediate(),
        ..Default::default()
    }
}

/// A product listing page. `paging` is the inner HTML of the pager.
pub fn product_page(products: &[(&str, &str)], paging: &str) -> String {
    let rows: String = products
        .iter()
        .map(|(name, price)| {
            format!(
                r#"<div class="row product">
                    <div class="thumbnail"><img src="/img.png"></div>
                    <div class="description"><h3><a href="/product/1">{}</a></h3></div>
                    <div class="price">{}</div>
                </div>"#,
                name, price
            )
        })
        .collect();
    format!(
        r#"<html><body><div class="products">{}</div><div class="paging">{}</div></body></html>"#,
        rows, paging
    )
}

pub fn next_link(href: &str) -> String {
    format!(r#"<a href="{}">1</a><a href="{}">&gt;</a>"#, href, href)
}

/// A reviews page; each entry is `(date, comment)`, `None` date for a
/// review rendered without a date line.
pub fn reviews_page(reviews: &[(Option<&str>, &str)]) -> String {
    let items: String = reviews
        .iter()
        .map(|(date, comment)| match date {
            Some(date) => format!(
                r#"<div class="review"><span>{}</span><p>{}</p></div>"#,
                date, comment
            ),
            None => format!(r#"<div class="review">{}</div>"#, comment),
        })
        .collect();
    format!(
        r#"<html><body>{}<button id="page-load-more">Load More</button></body></html>"#,
        items
    )
}

pub fn testimonials_page(texts: &[&str]) -> String {
    let items: String = texts
        .iter()
        .map(|t| format!(r#"<div class="testimonial"><p class="text">{}</p></div>"#, t))
        .collect();
    format!("<html><body>{}</body></html>", items)
}

/// The whole store: two product pages, reviews and testimonials.
pub fn full_store() -> StaticDomDriver {
    StaticDomDriver::in_memory([
        (
            url("/products"),
            product_page(
                &[("Box of Chocolate", "$24.99"), ("Red Energy Potion", "$4.99")],
                &next_link("/products?page=2"),
            ),
        ),
        (
            url("/products?page=2"),
            product_page(
                &[("Dark Red Energy Potion", "$4.99"), ("Box of Chocolate", "$24.99")],
                r#"<a href="/products?page=1">1</a><a class="disabled" href="/products?page=2">&gt;</a>"#,
            ),
        ),
        (
            url("/reviews"),
            reviews_page(&[
                (Some("2023-03-01"), "Great product, fast shipping."),
                (Some("2023-04-15"), "Arrived broken."),
                (None, "No date on this one"),
            ]),
        ),
        (
            url("/testimonials"),
            testimonials_page(&[
                "We love this shop, the chocolate is the best we ever had in years.",
                "Quick delivery.",
            ]),
        ),
    ])
}
