//! Page drivers: the narrow browser capability the scrapers are written
//! against.
//!
//! - `ChromiumDriver`: a live Chromium session over CDP (feature `browser`)
//! - `StaticDomDriver`: pre-rendered HTML, from memory or plain HTTP GETs

mod browser;
mod error;
mod locator;
mod static_dom;
mod text;

pub use browser::{BrowserEngineConfig, BrowserEngineType, BrowserOwnership, ChromiumDriver};
pub use error::{DriverError, DriverResult};
pub use locator::Locator;
pub use static_dom::{PageSource, StaticDomDriver, StaticElement};
pub use text::rendered_text;

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::debug;

/// How often the default wait implementations re-query the page.
pub const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Script used by the default `scroll_to_bottom`.
pub const SCROLL_TO_BOTTOM_SCRIPT: &str = "window.scrollTo(0, document.body.scrollHeight);";

/// Browser operations needed to scrape a rendered page.
///
/// A driver owns one page (tab) at a time. All operations act on the page that
/// the last `navigate` or navigating `click` left behind.
#[async_trait]
pub trait PageDriver: Send {
    /// Handle to an element on the current page.
    type Element: Clone + Send + Sync + std::fmt::Debug;

    /// Load `url` in the current page.
    async fn navigate(&mut self, url: &str) -> DriverResult<()>;

    /// All elements currently matching `locator`, in document order.
    async fn find_all(&mut self, locator: &Locator) -> DriverResult<Vec<Self::Element>>;

    /// First descendant of `parent` matching `locator`.
    ///
    /// Returns `DriverError::NotFound` when there is none.
    async fn find_within(
        &mut self,
        parent: &Self::Element,
        locator: &Locator,
    ) -> DriverResult<Self::Element>;

    /// Rendered text of an element, line breaks between block content.
    async fn text(&mut self, element: &Self::Element) -> DriverResult<String>;

    /// Attribute value, `None` when the attribute is absent.
    async fn attribute(
        &mut self,
        element: &Self::Element,
        name: &str,
    ) -> DriverResult<Option<String>>;

    /// Whether the element is visible and enabled.
    async fn is_clickable(&mut self, element: &Self::Element) -> DriverResult<bool>;

    /// Scripted click on the element.
    async fn click(&mut self, element: &Self::Element) -> DriverResult<()>;

    /// Run a script in the page and return its JSON result (`Null` if none).
    async fn execute_script(&mut self, script: &str) -> DriverResult<serde_json::Value>;

    /// URL of the current page.
    async fn current_url(&mut self) -> DriverResult<String>;

    /// Release the page and the browser behind it.
    async fn close(&mut self) -> DriverResult<()>;

    async fn scroll_to_bottom(&mut self) -> DriverResult<()> {
        self.execute_script(SCROLL_TO_BOTTOM_SCRIPT).await?;
        Ok(())
    }

    /// Give the page time to settle after a click or scroll.
    async fn settle(&mut self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    /// Wait until at least one element matches, returning all matches.
    async fn wait_until_present(
        &mut self,
        locator: &Locator,
        timeout: Duration,
    ) -> DriverResult<Vec<Self::Element>> {
        let started = Instant::now();
        loop {
            let found = self.find_all(locator).await?;
            if !found.is_empty() {
                return Ok(found);
            }
            if started.elapsed() >= timeout {
                debug!("Timed out after {:?} waiting for {}", timeout, locator);
                return Err(DriverError::Timeout {
                    locator: locator.to_string(),
                    waited: timeout,
                });
            }
            tokio::time::sleep(POLL_INTERVAL.min(timeout)).await;
        }
    }

    /// Wait until a matching element is clickable and return it.
    async fn wait_until_clickable(
        &mut self,
        locator: &Locator,
        timeout: Duration,
    ) -> DriverResult<Self::Element> {
        let started = Instant::now();
        loop {
            for element in self.find_all(locator).await? {
                if self.is_clickable(&element).await? {
                    return Ok(element);
                }
            }
            if started.elapsed() >= timeout {
                debug!("Timed out after {:?} waiting for clickable {}", timeout, locator);
                return Err(DriverError::Timeout {
                    locator: locator.to_string(),
                    waited: timeout,
                });
            }
            tokio::time::sleep(POLL_INTERVAL.min(timeout)).await;
        }
    }
}
