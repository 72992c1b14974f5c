//! Pagination per record kind.
//!
//! Products are spread over numbered pages behind a "next" link, reviews sit
//! behind a "Load More" button, and testimonials appear as the page is
//! scrolled. Running out of content is never an error here: a wait that
//! times out just ends the loop.

use tracing::{debug, info, warn};

use crate::driver::{DriverResult, PageDriver};
use crate::models::{Product, Review, Testimonial};

use super::config::ScrapeSettings;
use super::extract::{extract_products, extract_reviews, extract_testimonials};
use super::normalize::insert_all;

/// Why product pagination ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// No product rows showed up within the wait timeout.
    EmptyPage,
    /// There is no next-page control carrying the marker.
    NoNextControl,
    /// The next-page control is marked disabled.
    NextDisabled,
    /// Clicking next left the URL unchanged.
    UrlUnchanged,
    /// The configured page cap was reached.
    PageLimit,
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyPage => "empty page",
            Self::NoNextControl => "no next page",
            Self::NextDisabled => "next page disabled",
            Self::UrlUnchanged => "url unchanged after next",
            Self::PageLimit => "page limit reached",
        }
    }
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Product pagination state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    /// Reading the given 1-based page.
    Scanning(u32),
    Done(StopReason),
}

/// What one phase did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhaseStats {
    /// Pages that produced rows (products only).
    pub pages: u32,
    /// Clicks on "next" or "Load More".
    pub clicks: u32,
    /// Records appended to the collection.
    pub records: usize,
    /// Rows that could not be read.
    pub skipped: usize,
    /// Why product pagination ended.
    pub stop: Option<StopReason>,
}

/// Read one product page and decide what comes next.
async fn product_step<D: PageDriver>(
    driver: &mut D,
    settings: &ScrapeSettings,
    page: u32,
    products: &mut Vec<Product>,
    stats: &mut PhaseStats,
) -> DriverResult<PageState> {
    let selectors = &settings.selectors;
    let timing = &settings.timing;

    match driver
        .wait_until_present(&selectors.product_row(), timing.wait_timeout())
        .await
    {
        Ok(_) => {}
        Err(e) if e.is_timeout() => {
            debug!("Page {}: {}", page, e);
            return Ok(PageState::Done(StopReason::EmptyPage));
        }
        Err(e) => return Err(e),
    }

    let extraction = extract_products(driver, selectors).await?;
    let found = extraction.records.len();
    let added = insert_all(products, extraction.records);
    stats.pages += 1;
    stats.records += added;
    stats.skipped += extraction.skipped;
    info!(
        "Products page {}: {} rows, {} new, {} skipped",
        page, found, added, extraction.skipped
    );

    if timing.page_limit().is_some_and(|limit| page >= limit) {
        return Ok(PageState::Done(StopReason::PageLimit));
    }

    let marker = &selectors.next_page_marker;
    let next = driver
        .find_all(&selectors.next_page().containing(marker))
        .await?
        .into_iter()
        .next();
    let Some(next) = next else {
        return Ok(PageState::Done(StopReason::NoNextControl));
    };

    let class = driver.attribute(&next, "class").await?.unwrap_or_default();
    if class.contains(selectors.disabled_marker.as_str()) {
        return Ok(PageState::Done(StopReason::NextDisabled));
    }

    let before = driver.current_url().await?;
    driver.click(&next).await?;
    stats.clicks += 1;
    driver.settle(timing.page_settle()).await;
    let after = driver.current_url().await?;
    if after == before {
        return Ok(PageState::Done(StopReason::UrlUnchanged));
    }

    Ok(PageState::Scanning(page + 1))
}

/// Walk the product pages starting from the current one.
///
/// Products are inserted into `products` as each page is read, so whatever
/// was collected survives an error on a later page.
pub async fn paginate_products<D: PageDriver>(
    driver: &mut D,
    settings: &ScrapeSettings,
    products: &mut Vec<Product>,
) -> DriverResult<PhaseStats> {
    let mut stats = PhaseStats::default();
    let mut state = PageState::Scanning(1);
    while let PageState::Scanning(page) = state {
        state = product_step(driver, settings, page, products, &mut stats).await?;
    }
    if let PageState::Done(reason) = state {
        info!("Product pagination finished: {}", reason);
        stats.stop = Some(reason);
    }
    Ok(stats)
}

/// Click "Load More" up to the configured budget, then read the reviews.
///
/// A failing wait or click ends the expansion early; the reviews rendered so
/// far are still read.
pub async fn load_reviews<D: PageDriver>(
    driver: &mut D,
    settings: &ScrapeSettings,
    reviews: &mut Vec<Review>,
) -> DriverResult<PhaseStats> {
    let selectors = &settings.selectors;
    let timing = &settings.timing;
    let mut stats = PhaseStats::default();

    let load_more = selectors.load_more();
    for attempt in 1..=timing.load_more_budget {
        let button = match driver
            .wait_until_clickable(&load_more, timing.wait_timeout())
            .await
        {
            Ok(button) => button,
            Err(e) if e.is_timeout() => {
                debug!("Load More attempt {}: {}", attempt, e);
                break;
            }
            Err(e) => {
                warn!("Load More attempt {}: {}, reading what is loaded", attempt, e);
                break;
            }
        };
        if let Err(e) = driver.click(&button).await {
            warn!("Load More click {} failed: {}, reading what is loaded", attempt, e);
            break;
        }
        stats.clicks += 1;
        driver.settle(timing.load_more_settle()).await;
    }

    let extraction = extract_reviews(driver, selectors).await?;
    stats.skipped = extraction.skipped;
    stats.records = insert_all(reviews, extraction.records);
    info!(
        "Reviews: {} read after {} Load More clicks",
        stats.records, stats.clicks
    );
    Ok(stats)
}

/// Scroll to the bottom a few times, then read the testimonials.
pub async fn scroll_testimonials<D: PageDriver>(
    driver: &mut D,
    settings: &ScrapeSettings,
    testimonials: &mut Vec<Testimonial>,
) -> DriverResult<PhaseStats> {
    let selectors = &settings.selectors;
    let timing = &settings.timing;
    let mut stats = PhaseStats::default();

    for _ in 0..timing.scroll_passes {
        driver.scroll_to_bottom().await?;
        driver.settle(timing.scroll_settle()).await;
    }

    match driver
        .wait_until_present(&selectors.testimonial(), timing.wait_timeout())
        .await
    {
        Ok(_) => {}
        Err(e) if e.is_timeout() => {
            info!("No testimonials found: {}", e);
            return Ok(stats);
        }
        Err(e) => return Err(e),
    }

    let extraction = extract_testimonials(driver, selectors).await?;
    stats.skipped = extraction.skipped;
    stats.records = insert_all(testimonials, extraction.records);
    info!("Testimonials: {} read", stats.records);
    Ok(stats)
}
