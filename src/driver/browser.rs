//! Chromium page driver over the DevTools protocol.
//!
//! One browser, one tab, kept for the whole scrape run so later phases see
//! the session state earlier phases left behind.

use std::path::PathBuf;
#[cfg(feature = "browser")]
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
#[cfg(feature = "browser")]
use tracing::{debug, info, warn};

#[cfg(feature = "browser")]
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
#[cfg(feature = "browser")]
use chromiumoxide::element::Element;
#[cfg(feature = "browser")]
use chromiumoxide::error::CdpError;
#[cfg(feature = "browser")]
use chromiumoxide::{Browser, BrowserConfig, Page};
#[cfg(feature = "browser")]
use futures::StreamExt;

use super::{DriverError, DriverResult, Locator, PageDriver};

/// Browser engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserEngineConfig {
    /// Which driver to scrape with.
    #[serde(default)]
    pub engine: BrowserEngineType,

    /// Run in headless mode (default: true).
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Explicit Chrome/Chromium executable.
    #[serde(default)]
    pub chrome_path: Option<PathBuf>,

    /// Remote Chrome DevTools URL (e.g., "ws://localhost:9222").
    /// If set, connects to an existing browser instead of launching one.
    #[serde(default)]
    pub remote_url: Option<String>,

    /// Additional Chrome arguments.
    #[serde(default)]
    pub chrome_args: Vec<String>,

    /// User agent for both engines.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds: HTTP fetches for the http engine, CDP
    /// commands for a launched Chromium. A remote browser keeps its own.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

fn default_headless() -> bool {
    true
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

impl Default for BrowserEngineConfig {
    fn default() -> Self {
        Self {
            engine: BrowserEngineType::default(),
            headless: default_headless(),
            chrome_path: None,
            remote_url: None,
            chrome_args: Vec::new(),
            user_agent: default_user_agent(),
            timeout: default_timeout(),
        }
    }
}

impl BrowserEngineConfig {
    /// Apply environment overrides (`BROWSER_URL` selects a remote browser).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("BROWSER_URL") {
            if !url.is_empty() {
                self.remote_url = Some(url);
            }
        }
        self
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout)
    }

    /// Whether a Chromium session from this config is ours to shut down.
    pub fn ownership(&self) -> BrowserOwnership {
        match self.remote_url {
            Some(_) => BrowserOwnership::Connected,
            None => BrowserOwnership::Launched,
        }
    }
}

/// How the Chromium session was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserOwnership {
    /// Started by us; closing the driver shuts the browser down.
    Launched,
    /// An existing browser reached through `remote_url`; only our tab is
    /// closed and the connection dropped.
    Connected,
}

impl BrowserOwnership {
    pub fn shuts_down_browser(&self) -> bool {
        matches!(self, Self::Launched)
    }
}

/// Browser engine types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum BrowserEngineType {
    /// Headless Chromium over CDP (renders JavaScript).
    #[default]
    Chromium,
    /// Plain HTTP GETs parsed as static HTML (no JavaScript).
    Http,
}

/// Chromium-backed driver.
#[cfg(feature = "browser")]
pub struct ChromiumDriver {
    browser: Option<Browser>,
    page: Option<Page>,
    handler_task: Option<tokio::task::JoinHandle<()>>,
    ownership: BrowserOwnership,
}

#[cfg(feature = "browser")]
impl ChromiumDriver {
    /// Common Chrome executable paths to check.
    const CHROME_PATHS: &'static [&'static str] = &[
        // Linux
        "/usr/bin/google-chrome",
        "/usr/bin/google-chrome-stable",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/snap/bin/chromium",
        // macOS
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
        // Common install locations
        "/opt/google/chrome/google-chrome",
    ];

    /// Launch (or connect to) a browser and open the single working tab.
    pub async fn launch(config: &BrowserEngineConfig) -> DriverResult<Self> {
        let (browser, mut handler) = match config.remote_url {
            Some(ref remote_url) => Self::connect_remote(remote_url).await?,
            None => {
                info!("Launching browser (headless={})", config.headless);
                let chrome_path = match config.chrome_path {
                    Some(ref path) => path.clone(),
                    None => Self::find_chrome()?,
                };

                let mut builder = BrowserConfig::builder().chrome_executable(chrome_path);
                // with_head means NOT headless
                if !config.headless {
                    builder = builder.with_head();
                }
                builder = builder
                    .arg("--disable-blink-features=AutomationControlled")
                    .arg("--disable-dev-shm-usage")
                    .arg("--no-first-run")
                    .arg("--no-default-browser-check")
                    .arg("--no-sandbox")
                    .arg("--disable-gpu")
                    .arg("--window-size=1920,1080");
                for arg in &config.chrome_args {
                    builder = builder.arg(arg);
                }

                builder = builder.request_timeout(config.timeout());
                let browser_config = builder.build().map_err(DriverError::Browser)?;
                Browser::launch(browser_config).await?
            }
        };

        let handler_task = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        let page = browser.new_page("about:blank").await?;
        page.execute(SetUserAgentOverrideParams::new(config.user_agent.clone()))
            .await?;

        Ok(Self {
            browser: Some(browser),
            page: Some(page),
            handler_task: Some(handler_task),
            ownership: config.ownership(),
        })
    }

    fn find_chrome() -> DriverResult<PathBuf> {
        for path in Self::CHROME_PATHS {
            let p = std::path::Path::new(path);
            if p.exists() {
                info!("Found Chrome at: {}", path);
                return Ok(p.to_path_buf());
            }
        }

        for cmd in &[
            "google-chrome",
            "google-chrome-stable",
            "chromium",
            "chromium-browser",
        ] {
            if let Ok(output) = std::process::Command::new("which").arg(cmd).output() {
                if output.status.success() {
                    let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
                    if !path.is_empty() {
                        info!("Found Chrome in PATH: {}", path);
                        return Ok(PathBuf::from(path));
                    }
                }
            }
        }

        Err(DriverError::Browser(
            "Chrome/Chromium not found. Install it, set browser.chrome_path, \
             or scrape with --engine http"
                .to_string(),
        ))
    }

    /// Connect to a remote Chrome instance.
    async fn connect_remote(url: &str) -> DriverResult<(Browser, chromiumoxide::Handler)> {
        info!("Connecting to remote browser at {}", url);

        // Get WebSocket URL from the /json/version endpoint
        let http_url = url
            .replace("ws://", "http://")
            .replace("wss://", "https://");
        let version_url = format!("{}/json/version", http_url.trim_end_matches('/'));

        let resp: serde_json::Value = reqwest::Client::new()
            .get(&version_url)
            .send()
            .await?
            .json()
            .await?;

        let ws_url = resp
            .get("webSocketDebuggerUrl")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                DriverError::Browser("No webSocketDebuggerUrl in response".to_string())
            })?;

        info!("Connecting to WebSocket: {}", ws_url);
        Ok(Browser::connect(ws_url).await?)
    }

    fn page(&self) -> DriverResult<&Page> {
        self.page.as_ref().ok_or(DriverError::Closed)
    }

    /// Keep only elements whose rendered text passes the locator's filter.
    async fn filter_by_text(
        locator: &Locator,
        elements: Vec<Element>,
    ) -> DriverResult<Vec<Arc<Element>>> {
        let mut kept = Vec::with_capacity(elements.len());
        for element in elements {
            if locator.text_contains.is_some() {
                let text = element.inner_text().await?.unwrap_or_default();
                if !locator.accepts_text(&text) {
                    continue;
                }
            }
            kept.push(Arc::new(element));
        }
        Ok(kept)
    }
}

#[cfg(feature = "browser")]
impl From<CdpError> for DriverError {
    fn from(e: CdpError) -> Self {
        DriverError::Browser(e.to_string())
    }
}

#[cfg(feature = "browser")]
#[async_trait]
impl PageDriver for ChromiumDriver {
    type Element = Arc<Element>;

    async fn navigate(&mut self, url: &str) -> DriverResult<()> {
        info!("Navigating to {}", url);
        self.page()?
            .goto(url)
            .await
            .map_err(|e| DriverError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        Ok(())
    }

    async fn find_all(&mut self, locator: &Locator) -> DriverResult<Vec<Arc<Element>>> {
        let elements = match self.page()?.find_elements(locator.css.as_str()).await {
            Ok(found) => found,
            Err(CdpError::NotFound) => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        Self::filter_by_text(locator, elements).await
    }

    async fn find_within(
        &mut self,
        parent: &Arc<Element>,
        locator: &Locator,
    ) -> DriverResult<Arc<Element>> {
        let candidates = parent
            .find_elements(locator.css.as_str())
            .await
            .map_err(|_| DriverError::NotFound(locator.to_string()))?;
        Self::filter_by_text(locator, candidates)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DriverError::NotFound(locator.to_string()))
    }

    async fn text(&mut self, element: &Arc<Element>) -> DriverResult<String> {
        Ok(element.inner_text().await?.unwrap_or_default())
    }

    async fn attribute(
        &mut self,
        element: &Arc<Element>,
        name: &str,
    ) -> DriverResult<Option<String>> {
        Ok(element.attribute(name).await?)
    }

    async fn is_clickable(&mut self, element: &Arc<Element>) -> DriverResult<bool> {
        let returns = element
            .call_js_fn(
                "function() { const r = this.getBoundingClientRect(); \
                 return !this.disabled && r.width > 0 && r.height > 0; }",
                false,
            )
            .await?;
        Ok(returns
            .result
            .value
            .and_then(|v| v.as_bool())
            .unwrap_or(false))
    }

    async fn click(&mut self, element: &Arc<Element>) -> DriverResult<()> {
        // Scripted click: not blocked by overlays the way a synthetic mouse
        // event is.
        element
            .call_js_fn("function() { this.click(); }", false)
            .await?;
        Ok(())
    }

    async fn execute_script(&mut self, script: &str) -> DriverResult<serde_json::Value> {
        let result = self
            .page()?
            .evaluate(script)
            .await
            .map_err(|e| DriverError::Script(e.to_string()))?;
        Ok(result.value().cloned().unwrap_or(serde_json::Value::Null))
    }

    async fn current_url(&mut self) -> DriverResult<String> {
        Ok(self.page()?.url().await?.unwrap_or_default())
    }

    async fn close(&mut self) -> DriverResult<()> {
        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                debug!("Closing page failed: {}", e);
            }
        }
        if let Some(mut browser) = self.browser.take() {
            if self.ownership.shuts_down_browser() {
                if let Err(e) = browser.close().await {
                    warn!("Closing browser failed: {}", e);
                }
                let _ = browser.wait().await;
            } else {
                debug!("Leaving remote browser running");
                drop(browser);
            }
        }
        if let Some(task) = self.handler_task.take() {
            task.abort();
        }
        Ok(())
    }
}

// Stub for when browser feature is disabled
#[cfg(not(feature = "browser"))]
pub struct ChromiumDriver {
    _private: (),
}

#[cfg(not(feature = "browser"))]
impl ChromiumDriver {
    pub async fn launch(_config: &BrowserEngineConfig) -> DriverResult<Self> {
        Err(not_compiled())
    }
}

#[cfg(not(feature = "browser"))]
fn not_compiled() -> DriverError {
    DriverError::Browser(
        "Browser support not compiled. Rebuild with: cargo build --features browser".to_string(),
    )
}

#[cfg(not(feature = "browser"))]
#[async_trait]
impl PageDriver for ChromiumDriver {
    type Element = ();

    async fn navigate(&mut self, _url: &str) -> DriverResult<()> {
        Err(not_compiled())
    }

    async fn find_all(&mut self, _locator: &Locator) -> DriverResult<Vec<()>> {
        Err(not_compiled())
    }

    async fn find_within(&mut self, _parent: &(), _locator: &Locator) -> DriverResult<()> {
        Err(not_compiled())
    }

    async fn text(&mut self, _element: &()) -> DriverResult<String> {
        Err(not_compiled())
    }

    async fn attribute(&mut self, _element: &(), _name: &str) -> DriverResult<Option<String>> {
        Err(not_compiled())
    }

    async fn is_clickable(&mut self, _element: &()) -> DriverResult<bool> {
        Err(not_compiled())
    }

    async fn click(&mut self, _element: &()) -> DriverResult<()> {
        Err(not_compiled())
    }

    async fn execute_script(&mut self, _script: &str) -> DriverResult<serde_json::Value> {
        Err(not_compiled())
    }

    async fn current_url(&mut self) -> DriverResult<String> {
        Err(not_compiled())
    }

    async fn close(&mut self) -> DriverResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_config_defaults() {
        let config: BrowserEngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.engine, BrowserEngineType::Chromium);
        assert!(config.headless);
        assert_eq!(config.timeout, 30);
        assert!(config.user_agent.contains("Chrome"));
    }

    #[test]
    fn test_remote_browser_is_not_shut_down() {
        let mut config = BrowserEngineConfig::default();
        assert_eq!(config.ownership(), BrowserOwnership::Launched);
        assert!(config.ownership().shuts_down_browser());

        config.remote_url = Some("http://chrome:9222".to_string());
        assert_eq!(config.ownership(), BrowserOwnership::Connected);
        assert!(!config.ownership().shuts_down_browser());
    }

    #[test]
    fn test_timeout_duration() {
        let config = BrowserEngineConfig {
            timeout: 5,
            ..Default::default()
        };
        assert_eq!(config.timeout(), std::time::Duration::from_secs(5));
    }

    #[test]
    fn test_engine_type_names() {
        let engine: BrowserEngineType = serde_json::from_str("\"http\"").unwrap();
        assert_eq!(engine, BrowserEngineType::Http);
    }
}
