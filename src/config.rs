//! Configuration management for storescrape using the prefer crate.
//!
//! The config file is optional: every section has defaults that scrape
//! web-scraping.dev and serve the dashboard locally.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::driver::BrowserEngineConfig;
use crate::scrapers::{ScrapeSettings, SelectorConfig, SiteConfig, TimingConfig};
use crate::services::sentiment::ClassifierConfig;
use crate::utils::YearMonth;

/// Where scrape results are written and read back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Unannotated document.
    #[serde(default = "default_data_file")]
    pub data_file: String,
    /// Document with review sentiment.
    #[serde(default = "default_annotated_file")]
    pub annotated_file: String,
}

fn default_data_file() -> String {
    "data.json".to_string()
}

fn default_annotated_file() -> String {
    "data_annotated.json".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            annotated_file: default_annotated_file(),
        }
    }
}

/// Months the review filter offers, both ends included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthRange {
    #[serde(default = "default_start_month")]
    pub start: YearMonth,
    #[serde(default = "default_end_month")]
    pub end: YearMonth,
}

fn default_start_month() -> YearMonth {
    YearMonth::january(2023)
}

fn default_end_month() -> YearMonth {
    YearMonth::december(2023)
}

impl Default for MonthRange {
    fn default() -> Self {
        Self {
            start: default_start_month(),
            end: default_end_month(),
        }
    }
}

impl MonthRange {
    pub fn months(&self) -> Vec<YearMonth> {
        YearMonth::range(self.start, self.end)
    }
}

/// Dashboard server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Address to listen on.
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default)]
    pub months: MonthRange,
}

fn default_bind() -> String {
    "127.0.0.1:8501".to_string()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            months: MonthRange::default(),
        }
    }
}

/// Configuration file contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub browser: BrowserEngineConfig,
    #[serde(default)]
    pub output: OutputConfig,
    /// Sentiment classifier used by `annotate`.
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer crate for discovery.
    /// Automatically discovers storescrape config files in standard locations.
    pub async fn load() -> Self {
        // Use prefer for file discovery, then parse with serde
        match prefer::load("storescrape").await {
            Ok(pref_config) => {
                if let Some(path) = pref_config.source_path() {
                    match Self::load_from_path(path).await {
                        Ok(config) => config,
                        Err(e) => {
                            tracing::warn!("Ignoring {}: {}", path.display(), e);
                            Self::default_with_env()
                        }
                    }
                } else {
                    Self::default_with_env()
                }
            }
            Err(_) => {
                // No config file found, use defaults with env overrides
                Self::default_with_env()
            }
        }
    }

    /// Create a default config with environment variable overrides applied.
    pub fn default_with_env() -> Self {
        let mut config = Self::default();
        config.browser = config.browser.with_env_overrides();
        config
    }

    /// Load configuration from a specific file path.
    /// Supports JSON, TOML and YAML based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, String> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

        let mut config = Self::parse(&contents, ext)?;
        config.source_path = Some(path.to_path_buf());
        config.browser = config.browser.with_env_overrides();
        Ok(config)
    }

    /// Parse config text in the format named by `ext`.
    pub fn parse(contents: &str, ext: &str) -> Result<Self, String> {
        match ext {
            "toml" => toml::from_str(contents)
                .map_err(|e| format!("Failed to parse TOML config: {}", e)),
            "yaml" | "yml" => serde_yaml::from_str(contents)
                .map_err(|e| format!("Failed to parse YAML config: {}", e)),
            _ => serde_json::from_str(contents)
                .map_err(|e| format!("Failed to parse JSON config: {}", e)),
        }
    }

    /// Get the base directory for resolving relative paths.
    /// Returns the config file's parent directory if available, otherwise None.
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Resolve a path that may be relative to the config file.
    /// - Absolute paths are returned as-is
    /// - Paths starting with ~ are expanded
    /// - Relative paths are resolved relative to the config file's directory,
    ///   or kept relative to the working directory when there is no file
    pub fn resolve_path(&self, path_str: &str) -> PathBuf {
        let expanded = shellexpand::tilde(path_str);
        let path = Path::new(expanded.as_ref());

        if path.is_absolute() {
            return path.to_path_buf();
        }
        match self.base_dir() {
            Some(base) => base.join(path),
            None => path.to_path_buf(),
        }
    }

    /// Where `scrape` writes and `annotate` reads.
    pub fn data_path(&self) -> PathBuf {
        self.resolve_path(&self.output.data_file)
    }

    /// Where `annotate` writes and the dashboard looks first.
    pub fn annotated_path(&self) -> PathBuf {
        self.resolve_path(&self.output.annotated_file)
    }

    /// The parts of the config a scrape run needs.
    pub fn scrape_settings(&self) -> ScrapeSettings {
        ScrapeSettings {
            site: self.site.clone(),
            selectors: self.selectors.clone(),
            timing: self.timing.clone(),
        }
    }

    /// Effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Options for loading the configuration.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file path (overrides auto-discovery).
    pub config_path: Option<PathBuf>,
}

/// Load the configuration, from `--config` when given, else by discovery.
///
/// An explicit file that cannot be read is an error; a discovered one that
/// cannot be read is skipped with a warning.
pub async fn load_config(options: &LoadOptions) -> Result<Config, String> {
    match options.config_path {
        Some(ref path) => Config::load_from_path(path).await,
        None => Ok(Config::load().await),
    }
}
