//! Scrape command.

use std::path::PathBuf;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::Config;
use crate::driver::{BrowserEngineType, ChromiumDriver, PageDriver, PageSource, StaticDomDriver};
use crate::scrapers::{self, PhaseOutcome, ScrapeReport, ScrapeSettings};
use crate::storage;

/// Command-line overrides for a scrape run.
#[derive(Debug, Default)]
pub struct ScrapeArgs {
    pub engine: Option<BrowserEngineType>,
    pub base_url: Option<String>,
    pub output: Option<PathBuf>,
    pub max_pages: Option<u32>,
    pub headed: bool,
}

impl ScrapeArgs {
    /// Apply the overrides on top of the loaded config.
    fn apply_to_config(&self, config: &mut Config) {
        if let Some(engine) = self.engine {
            config.browser.engine = engine;
        }
        if let Some(ref base_url) = self.base_url {
            config.site.base_url = base_url.clone();
        }
        if let Some(max_pages) = self.max_pages {
            config.timing.max_pages = max_pages;
        }
        if self.headed {
            config.browser.headless = false;
        }
    }
}

async fn scrape_with<D: PageDriver>(mut driver: D, settings: &ScrapeSettings) -> ScrapeReport {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(spinner);
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Scraping {}...", settings.site.base_url));

    let report = scrapers::run(&mut driver, settings).await;
    pb.finish_and_clear();
    report
}

fn print_report(report: &ScrapeReport) {
    for phase in &report.phases {
        match phase.outcome {
            PhaseOutcome::Completed(ref stats) => {
                let mut detail = format!("{} new", stats.records);
                if stats.skipped > 0 {
                    detail.push_str(&format!(", {} skipped", stats.skipped));
                }
                if let Some(stop) = stats.stop {
                    detail.push_str(&format!(", {} pages, stopped: {}", stats.pages, stop));
                }
                println!("  {} {:<13} {}", style("✓").green(), phase.phase.as_str(), detail);
            }
            PhaseOutcome::Failed(ref error) => {
                println!("  {} {:<13} {}", style("✗").red(), phase.phase.as_str(), error);
            }
        }
    }

    let counts = report.document.counts();
    let elapsed = report.finished_at - report.started_at;
    println!(
        "{} {} products, {} reviews, {} testimonials in {}s",
        style("→").cyan(),
        counts.products,
        counts.reviews,
        counts.testimonials,
        elapsed.num_seconds()
    );
}

/// Scrape the site and save the document.
///
/// Phase and save failures are reported but do not fail the command.
pub async fn cmd_scrape(mut config: Config, args: ScrapeArgs) -> anyhow::Result<()> {
    args.apply_to_config(&mut config);
    let output = args.output.clone().unwrap_or_else(|| config.data_path());
    let mut settings = config.scrape_settings();

    println!(
        "{} Scraping {} with {:?} engine",
        style("→").cyan(),
        settings.site.base_url,
        config.browser.engine
    );

    let report = match config.browser.engine {
        BrowserEngineType::Chromium => {
            let driver = ChromiumDriver::launch(&config.browser).await?;
            scrape_with(driver, &settings).await
        }
        BrowserEngineType::Http => {
            settings.timing = settings.timing.without_delays();
            let source = PageSource::http(&config.browser.user_agent, config.browser.timeout())?;
            scrape_with(StaticDomDriver::new(source), &settings).await
        }
    };

    print_report(&report);
    if report.failed_phases().next().is_some() {
        println!(
            "{} Some phases failed; the document holds what they collected",
            style("!").yellow()
        );
    }

    match storage::save(&report.document, &output) {
        Ok(()) => println!("{} Saved to {}", style("✓").green(), output.display()),
        Err(e) => eprintln!("{} Failed to save document: {}", style("✗").red(), e),
    }

    Ok(())
}
