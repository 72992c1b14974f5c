//! Driver over static HTML.
//!
//! Pages come either from an in-memory map (fixtures, tests) or from plain
//! HTTP GETs. There is no JavaScript: the DOM only changes by navigation, and
//! clicking an element navigates to its `href` when it has one.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};
use url::Url;

use super::text::rendered_text;
use super::{DriverError, DriverResult, Locator, PageDriver};

/// Where a `StaticDomDriver` gets its HTML from.
#[derive(Debug, Clone)]
pub enum PageSource {
    /// Fixed pages keyed by absolute URL.
    InMemory(HashMap<String, String>),
    /// Live pages fetched over HTTP.
    Http(reqwest::Client),
}

impl PageSource {
    /// Build an HTTP page source with the given user agent and timeout.
    pub fn http(user_agent: &str, timeout: Duration) -> DriverResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self::Http(client))
    }
}

/// Element handle: the chain of (locator, index) lookups that reached it.
///
/// Handles are resolved against the page they were created on; after a
/// navigation they fail with `DriverError::StaleElement`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticElement {
    generation: u64,
    path: Vec<(Locator, usize)>,
}

/// Scraper-backed page driver.
pub struct StaticDomDriver {
    source: PageSource,
    current_url: Option<Url>,
    html: String,
    generation: u64,
    closed: bool,
    clicks: usize,
}

impl StaticDomDriver {
    pub fn new(source: PageSource) -> Self {
        Self {
            source,
            current_url: None,
            html: String::new(),
            generation: 0,
            closed: false,
            clicks: 0,
        }
    }

    /// Driver serving the given `(url, html)` pages.
    pub fn in_memory<I, U, H>(pages: I) -> Self
    where
        I: IntoIterator<Item = (U, H)>,
        U: Into<String>,
        H: Into<String>,
    {
        let pages = pages
            .into_iter()
            .map(|(url, html)| (normalize_url(&url.into()), html.into()))
            .collect();
        Self::new(PageSource::InMemory(pages))
    }

    /// Number of clicks performed so far.
    pub fn click_count(&self) -> usize {
        self.clicks
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn ensure_open(&self) -> DriverResult<()> {
        if self.closed {
            Err(DriverError::Closed)
        } else {
            Ok(())
        }
    }

    fn selector(locator: &Locator) -> DriverResult<Selector> {
        Selector::parse(&locator.css).map_err(|_| DriverError::InvalidSelector(locator.css.clone()))
    }

    /// Matches for `locator` below `scope` (or the whole page).
    fn matches<'a>(
        doc: &'a Html,
        scope: Option<ElementRef<'a>>,
        locator: &Locator,
    ) -> DriverResult<Vec<ElementRef<'a>>> {
        let selector = Self::selector(locator)?;
        let candidates: Vec<ElementRef<'a>> = match scope {
            Some(el) => el.select(&selector).collect(),
            None => doc.select(&selector).collect(),
        };
        Ok(candidates
            .into_iter()
            .filter(|el| locator.accepts_text(&rendered_text(*el)))
            .collect())
    }

    /// Walk an element's lookup path on the current page and apply `f` to it.
    fn with_element<T>(
        &self,
        element: &StaticElement,
        f: impl FnOnce(ElementRef<'_>) -> T,
    ) -> DriverResult<T> {
        self.ensure_open()?;
        if element.generation != self.generation {
            return Err(DriverError::StaleElement(describe_path(&element.path)));
        }
        let doc = Html::parse_document(&self.html);
        let mut current: Option<ElementRef<'_>> = None;
        for (locator, index) in &element.path {
            let found = Self::matches(&doc, current, locator)?;
            current = Some(
                found
                    .get(*index)
                    .copied()
                    .ok_or_else(|| DriverError::StaleElement(describe_path(&element.path)))?,
            );
        }
        let el = current.ok_or_else(|| DriverError::StaleElement("empty path".to_string()))?;
        Ok(f(el))
    }

    async fn load(&self, url: &Url) -> DriverResult<String> {
        match self.source {
            PageSource::InMemory(ref pages) => pages
                .get(&normalize_url(url.as_str()))
                .cloned()
                .ok_or_else(|| DriverError::Navigation {
                    url: url.to_string(),
                    reason: "no such page".to_string(),
                }),
            PageSource::Http(ref client) => {
                info!("Fetching {}", url);
                let response = client.get(url.clone()).send().await?;
                let status = response.status();
                if !status.is_success() {
                    debug!("{} answered {}", url, status);
                }
                Ok(response.text().await?)
            }
        }
    }
}

#[async_trait]
impl PageDriver for StaticDomDriver {
    type Element = StaticElement;

    async fn navigate(&mut self, url: &str) -> DriverResult<()> {
        self.ensure_open()?;
        let target = match self.current_url {
            Some(ref base) => base.join(url),
            None => Url::parse(url),
        }
        .map_err(|e| DriverError::Navigation {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let html = self.load(&target).await?;
        debug!("Loaded {} ({} bytes)", target, html.len());
        self.html = html;
        self.current_url = Some(target);
        self.generation += 1;
        Ok(())
    }

    async fn find_all(&mut self, locator: &Locator) -> DriverResult<Vec<StaticElement>> {
        self.ensure_open()?;
        let doc = Html::parse_document(&self.html);
        let count = Self::matches(&doc, None, locator)?.len();
        Ok((0..count)
            .map(|i| StaticElement {
                generation: self.generation,
                path: vec![(locator.clone(), i)],
            })
            .collect())
    }

    async fn find_within(
        &mut self,
        parent: &StaticElement,
        locator: &Locator,
    ) -> DriverResult<StaticElement> {
        let found = self.with_element(parent, |el| -> DriverResult<usize> {
            let selector = Self::selector(locator)?;
            Ok(el
                .select(&selector)
                .filter(|child| locator.accepts_text(&rendered_text(*child)))
                .count())
        })??;
        if found == 0 {
            return Err(DriverError::NotFound(locator.to_string()));
        }
        let mut path = parent.path.clone();
        path.push((locator.clone(), 0));
        Ok(StaticElement {
            generation: parent.generation,
            path,
        })
    }

    async fn text(&mut self, element: &StaticElement) -> DriverResult<String> {
        self.with_element(element, rendered_text)
    }

    async fn attribute(
        &mut self,
        element: &StaticElement,
        name: &str,
    ) -> DriverResult<Option<String>> {
        self.with_element(element, |el| el.value().attr(name).map(str::to_string))
    }

    async fn is_clickable(&mut self, element: &StaticElement) -> DriverResult<bool> {
        self.with_element(element, |el| {
            let attrs = el.value();
            attrs.attr("disabled").is_none() && attrs.attr("hidden").is_none()
        })
    }

    async fn click(&mut self, element: &StaticElement) -> DriverResult<()> {
        let href = self.with_element(element, |el| el.value().attr("href").map(str::to_string))?;
        self.clicks += 1;
        match href {
            Some(href) if !href.starts_with('#') && !href.starts_with("javascript:") => {
                self.navigate(&href).await
            }
            _ => {
                debug!("Click without navigation target");
                Ok(())
            }
        }
    }

    async fn execute_script(&mut self, script: &str) -> DriverResult<serde_json::Value> {
        self.ensure_open()?;
        Err(DriverError::Script(format!(
            "static pages cannot run scripts ({} bytes)",
            script.len()
        )))
    }

    async fn current_url(&mut self) -> DriverResult<String> {
        self.ensure_open()?;
        Ok(self
            .current_url
            .as_ref()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "about:blank".to_string()))
    }

    async fn close(&mut self) -> DriverResult<()> {
        self.closed = true;
        Ok(())
    }

    async fn scroll_to_bottom(&mut self) -> DriverResult<()> {
        // Everything is already loaded.
        self.ensure_open()
    }

    async fn wait_until_present(
        &mut self,
        locator: &Locator,
        timeout: Duration,
    ) -> DriverResult<Vec<StaticElement>> {
        // The DOM cannot change while waiting, so one look is enough.
        let found = self.find_all(locator).await?;
        if found.is_empty() {
            return Err(DriverError::Timeout {
                locator: locator.to_string(),
                waited: timeout,
            });
        }
        Ok(found)
    }

    async fn wait_until_clickable(
        &mut self,
        locator: &Locator,
        timeout: Duration,
    ) -> DriverResult<StaticElement> {
        for element in self.find_all(locator).await? {
            if self.is_clickable(&element).await? {
                return Ok(element);
            }
        }
        Err(DriverError::Timeout {
            locator: locator.to_string(),
            waited: timeout,
        })
    }
}

fn normalize_url(url: &str) -> String {
    Url::parse(url)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| url.to_string())
}

fn describe_path(path: &[(Locator, usize)]) -> String {
    path.iter()
        .map(|(loc, i)| format!("{}[{}]", loc, i))
        .collect::<Vec<_>>()
        .join(" > ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body>
        <div class="item"><h3><a href="/p/1">One</a></h3><span class="price">$1</span></div>
        <div class="item"><h3><a href="/p/2">Two</a></h3></div>
        <a class="next" href="/list?page=2">Next</a>
        <button disabled>Load More</button>
    </body></html>"#;

    fn driver() -> StaticDomDriver {
        StaticDomDriver::in_memory([
            ("https://shop.test/list", PAGE),
            ("https://shop.test/list?page=2", "<html><body><p>second</p></body></html>"),
        ])
    }

    #[tokio::test]
    async fn test_find_and_read() {
        let mut d = driver();
        d.navigate("https://shop.test/list").await.unwrap();
        let items = d.find_all(&Locator::css("div.item")).await.unwrap();
        assert_eq!(items.len(), 2);

        let title = d.find_within(&items[1], &Locator::css("h3 a")).await.unwrap();
        assert_eq!(d.text(&title).await.unwrap(), "Two");
        assert_eq!(
            d.attribute(&title, "href").await.unwrap().as_deref(),
            Some("/p/2")
        );

        let missing = d.find_within(&items[1], &Locator::css(".price")).await;
        assert!(matches!(missing, Err(DriverError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_click_follows_href() {
        let mut d = driver();
        d.navigate("https://shop.test/list").await.unwrap();
        let next = d.find_all(&Locator::css("a.next")).await.unwrap();
        d.click(&next[0]).await.unwrap();
        assert_eq!(d.current_url().await.unwrap(), "https://shop.test/list?page=2");
        assert_eq!(d.click_count(), 1);

        // Handles from the previous page are stale now.
        assert!(matches!(
            d.text(&next[0]).await,
            Err(DriverError::StaleElement(_))
        ));
    }

    #[tokio::test]
    async fn test_disabled_button_is_not_clickable() {
        let mut d = driver();
        d.navigate("https://shop.test/list").await.unwrap();
        let result = d
            .wait_until_clickable(
                &Locator::css("button").containing("Load More"),
                Duration::from_secs(10),
            )
            .await;
        assert!(matches!(result, Err(DriverError::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_wait_until_present_times_out_immediately() {
        let mut d = driver();
        d.navigate("https://shop.test/list?page=2").await.unwrap();
        let err = d
            .wait_until_present(&Locator::css("div.item"), Duration::from_secs(10))
            .await
            .unwrap_err();
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn test_unknown_page_and_closed() {
        let mut d = driver();
        assert!(matches!(
            d.navigate("https://shop.test/missing").await,
            Err(DriverError::Navigation { .. })
        ));
        d.close().await.unwrap();
        assert!(matches!(
            d.current_url().await,
            Err(DriverError::Closed)
        ));
    }

    #[tokio::test]
    async fn test_invalid_selector() {
        let mut d = driver();
        d.navigate("https://shop.test/list").await.unwrap();
        assert!(matches!(
            d.find_all(&Locator::css("div[")).await,
            Err(DriverError::InvalidSelector(_))
        ));
    }
}
