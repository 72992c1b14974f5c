//! Scraper configuration types.
//!
//! Where the pages live, what to look for on them, and how long to wait.
//! Every field has a default matching web-scraping.dev, so an empty config
//! section is valid.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::driver::Locator;

pub const DEFAULT_BASE_URL: &str = "https://web-scraping.dev";

/// Site to scrape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_products_path")]
    pub products_path: String,
    #[serde(default = "default_reviews_path")]
    pub reviews_path: String,
    #[serde(default = "default_testimonials_path")]
    pub testimonials_path: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_products_path() -> String {
    "/products".to_string()
}

fn default_reviews_path() -> String {
    "/reviews".to_string()
}

fn default_testimonials_path() -> String {
    "/testimonials".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            products_path: default_products_path(),
            reviews_path: default_reviews_path(),
            testimonials_path: default_testimonials_path(),
        }
    }
}

impl SiteConfig {
    pub fn products_url(&self) -> String {
        self.join(&self.products_path)
    }

    pub fn reviews_url(&self) -> String {
        self.join(&self.reviews_path)
    }

    pub fn testimonials_url(&self) -> String {
        self.join(&self.testimonials_path)
    }

    fn join(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// CSS selectors (and text filters) for each record kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectorConfig {
    #[serde(default = "default_product_row")]
    pub product_row: String,
    #[serde(default = "default_product_title")]
    pub product_title: String,
    #[serde(default = "default_product_price")]
    pub product_price: String,
    /// Pagination control, the last link of the paging bar.
    #[serde(default = "default_next_page")]
    pub next_page: String,
    /// Text the next-page control must contain.
    #[serde(default = "default_next_page_marker")]
    pub next_page_marker: String,
    /// Class that marks the next-page control as inactive.
    #[serde(default = "default_disabled_marker")]
    pub disabled_marker: String,
    #[serde(default = "default_review")]
    pub review: String,
    #[serde(default = "default_load_more")]
    pub load_more: String,
    #[serde(default = "default_load_more_text")]
    pub load_more_text: String,
    #[serde(default = "default_testimonial")]
    pub testimonial: String,
}

fn default_product_row() -> String {
    "div.row.product".to_string()
}

fn default_product_title() -> String {
    "h3 a".to_string()
}

fn default_product_price() -> String {
    "div.price".to_string()
}

fn default_next_page() -> String {
    "div.paging a:last-child".to_string()
}

fn default_next_page_marker() -> String {
    ">".to_string()
}

fn default_disabled_marker() -> String {
    "disabled".to_string()
}

fn default_review() -> String {
    ".review".to_string()
}

fn default_load_more() -> String {
    "button".to_string()
}

fn default_load_more_text() -> String {
    "Load More".to_string()
}

fn default_testimonial() -> String {
    ".testimonial-item, .testimonial".to_string()
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            product_row: default_product_row(),
            product_title: default_product_title(),
            product_price: default_product_price(),
            next_page: default_next_page(),
            next_page_marker: default_next_page_marker(),
            disabled_marker: default_disabled_marker(),
            review: default_review(),
            load_more: default_load_more(),
            load_more_text: default_load_more_text(),
            testimonial: default_testimonial(),
        }
    }
}

impl SelectorConfig {
    pub fn product_row(&self) -> Locator {
        Locator::css(&self.product_row)
    }

    pub fn product_title(&self) -> Locator {
        Locator::css(&self.product_title)
    }

    pub fn product_price(&self) -> Locator {
        Locator::css(&self.product_price)
    }

    /// The next-page control. The marker is checked separately so that a
    /// control without it can be told apart from no control at all.
    pub fn next_page(&self) -> Locator {
        Locator::css(&self.next_page)
    }

    pub fn review(&self) -> Locator {
        Locator::css(&self.review)
    }

    pub fn load_more(&self) -> Locator {
        Locator::css(&self.load_more).containing(&self.load_more_text)
    }

    pub fn testimonial(&self) -> Locator {
        Locator::css(&self.testimonial)
    }
}

/// Waits, settle delays and iteration budgets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Bound on every wait for content (seconds).
    #[serde(default = "default_wait_timeout_secs")]
    pub wait_timeout_secs: u64,
    /// Delay after clicking the next-page control.
    #[serde(default = "default_page_settle_ms")]
    pub page_settle_ms: u64,
    /// Delay after clicking "Load More".
    #[serde(default = "default_load_more_settle_ms")]
    pub load_more_settle_ms: u64,
    /// Delay after each scroll to the bottom.
    #[serde(default = "default_scroll_settle_ms")]
    pub scroll_settle_ms: u64,
    /// Maximum number of "Load More" clicks.
    #[serde(default = "default_load_more_budget")]
    pub load_more_budget: u32,
    #[serde(default = "default_scroll_passes")]
    pub scroll_passes: u32,
    /// Product pages to read at most (0 = until the site runs out).
    #[serde(default)]
    pub max_pages: u32,
}

fn default_wait_timeout_secs() -> u64 {
    10
}

fn default_page_settle_ms() -> u64 {
    2000
}

fn default_load_more_settle_ms() -> u64 {
    1500
}

fn default_scroll_settle_ms() -> u64 {
    2000
}

fn default_load_more_budget() -> u32 {
    3
}

fn default_scroll_passes() -> u32 {
    2
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            wait_timeout_secs: default_wait_timeout_secs(),
            page_settle_ms: default_page_settle_ms(),
            load_more_settle_ms: default_load_more_settle_ms(),
            scroll_settle_ms: default_scroll_settle_ms(),
            load_more_budget: default_load_more_budget(),
            scroll_passes: default_scroll_passes(),
            max_pages: 0,
        }
    }
}

impl TimingConfig {
    /// Same budgets without any waiting, for drivers over static pages
    /// where nothing changes while waiting.
    pub fn without_delays(&self) -> Self {
        Self {
            wait_timeout_secs: 0,
            page_settle_ms: 0,
            load_more_settle_ms: 0,
            scroll_settle_ms: 0,
            ..self.clone()
        }
    }

    /// Default budgets, no delays.
    pub fn immediate() -> Self {
        Self::default().without_delays()
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    pub fn page_settle(&self) -> Duration {
        Duration::from_millis(self.page_settle_ms)
    }

    pub fn load_more_settle(&self) -> Duration {
        Duration::from_millis(self.load_more_settle_ms)
    }

    pub fn scroll_settle(&self) -> Duration {
        Duration::from_millis(self.scroll_settle_ms)
    }

    /// Page cap, `None` when unlimited.
    pub fn page_limit(&self) -> Option<u32> {
        (self.max_pages > 0).then_some(self.max_pages)
    }
}

/// Everything one scrape run needs besides the driver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrapeSettings {
    pub site: SiteConfig,
    pub selectors: SelectorConfig,
    pub timing: TimingConfig,
}
