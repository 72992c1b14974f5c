//! The scrape run: products, then reviews, then testimonials, on one driver
//! session.

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::driver::{DriverResult, PageDriver};
use crate::models::Document;

use super::config::ScrapeSettings;
use super::paginate::{load_reviews, paginate_products, scroll_testimonials, PhaseStats};

/// One extraction pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Products,
    Reviews,
    Testimonials,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Products, Phase::Reviews, Phase::Testimonials];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Reviews => "reviews",
            Self::Testimonials => "testimonials",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a phase ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseOutcome {
    Completed(PhaseStats),
    /// The phase hit an unexpected error. Records it collected before the
    /// error are kept in the document.
    Failed(String),
}

impl PhaseOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseReport {
    pub phase: Phase,
    pub outcome: PhaseOutcome,
}

/// Result of a scrape run.
#[derive(Debug, Clone)]
pub struct ScrapeReport {
    pub document: Document,
    pub phases: Vec<PhaseReport>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ScrapeReport {
    pub fn outcome(&self, phase: Phase) -> Option<&PhaseOutcome> {
        self.phases
            .iter()
            .find(|r| r.phase == phase)
            .map(|r| &r.outcome)
    }

    pub fn failed_phases(&self) -> impl Iterator<Item = Phase> + '_ {
        self.phases
            .iter()
            .filter(|r| r.outcome.is_failed())
            .map(|r| r.phase)
    }
}

async fn run_phase<D: PageDriver>(
    driver: &mut D,
    settings: &ScrapeSettings,
    phase: Phase,
    document: &mut Document,
) -> DriverResult<PhaseStats> {
    let site = &settings.site;
    match phase {
        Phase::Products => {
            driver.navigate(&site.products_url()).await?;
            paginate_products(driver, settings, &mut document.products).await
        }
        Phase::Reviews => {
            driver.navigate(&site.reviews_url()).await?;
            load_reviews(driver, settings, &mut document.reviews).await
        }
        Phase::Testimonials => {
            driver.navigate(&site.testimonials_url()).await?;
            scroll_testimonials(driver, settings, &mut document.testimonials).await
        }
    }
}

/// Run every phase in order and close the driver afterwards.
///
/// A failing phase is recorded in the report and does not stop the phases
/// after it. The driver is closed whether the phases succeeded or not.
pub async fn run<D: PageDriver>(driver: &mut D, settings: &ScrapeSettings) -> ScrapeReport {
    let started_at = Utc::now();
    let mut document = Document::default();
    let mut phases = Vec::with_capacity(Phase::ALL.len());

    for phase in Phase::ALL {
        info!("Starting {} phase", phase);
        let outcome = match run_phase(driver, settings, phase, &mut document).await {
            Ok(stats) => PhaseOutcome::Completed(stats),
            Err(e) => {
                error!("{} phase failed: {}", phase, e);
                PhaseOutcome::Failed(e.to_string())
            }
        };
        phases.push(PhaseReport { phase, outcome });
    }

    if let Err(e) = driver.close().await {
        warn!("Failed to close driver: {}", e);
    }

    let counts = document.counts();
    info!(
        "Scrape finished: {} products, {} reviews, {} testimonials",
        counts.products, counts.reviews, counts.testimonials
    );

    ScrapeReport {
        document,
        phases,
        started_at,
        finished_at: Utc::now(),
    }
}
