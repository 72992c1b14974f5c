//! Annotate command: add review sentiment to a scraped document.

use std::path::PathBuf;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::Config;
use crate::services::sentiment::{annotate_document, AnnotationEvent, InferenceClient};
use crate::storage::{self, StorageError};

/// Command-line overrides for annotation.
#[derive(Debug, Default)]
pub struct AnnotateArgs {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub endpoint: Option<String>,
    pub model: Option<String>,
}

/// Classify every review of the input document and write the annotated copy.
///
/// Nothing is written unless every review was classified.
pub async fn cmd_annotate(config: Config, args: AnnotateArgs) -> anyhow::Result<()> {
    let input = args.input.clone().unwrap_or_else(|| config.data_path());
    let output = args.output.clone().unwrap_or_else(|| config.annotated_path());

    let mut document = match storage::load(&input) {
        Ok(document) => document,
        Err(StorageError::NotFound(path)) => {
            anyhow::bail!(
                "{} does not exist. Run `storescrape scrape` first or pass --input.",
                path.display()
            );
        }
        Err(e) => return Err(e.into()),
    };

    let mut classifier_config = config.classifier.clone();
    if let Some(ref endpoint) = args.endpoint {
        classifier_config = classifier_config.with_endpoint(endpoint);
    }
    if let Some(ref model) = args.model {
        classifier_config = classifier_config.with_model(model);
    }
    let max_chars = classifier_config.max_input_chars;

    println!(
        "{} Classifying {} reviews from {} with {}",
        style("→").cyan(),
        document.reviews.len(),
        input.display(),
        classifier_config.model
    );
    if classifier_config.token().is_none() {
        println!(
            "  {} No API token set (classifier.api_token or HF_API_TOKEN)",
            style("!").yellow()
        );
    }

    let classifier = InferenceClient::new(classifier_config)?;

    let pb = ProgressBar::new(document.reviews.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}")?
            .progress_chars("█▓░"),
    );
    pb.set_message("Classifying...");

    let result = annotate_document(&classifier, &mut document, max_chars, |event| match event {
        AnnotationEvent::Started { .. } => {}
        AnnotationEvent::Classified { label, score, .. } => {
            pb.set_message(format!("{} ({:.2})", label, score));
            pb.inc(1);
        }
        AnnotationEvent::Finished(_) => pb.finish_and_clear(),
    })
    .await;

    let stats = match result {
        Ok(stats) => stats,
        Err(e) => {
            pb.abandon();
            eprintln!(
                "{} Classification failed, {} left unchanged",
                style("✗").red(),
                output.display()
            );
            return Err(e.into());
        }
    };

    storage::save(&document, &output)?;

    println!(
        "{} Annotated {} reviews: {} positive, {} negative",
        style("✓").green(),
        stats.total,
        stats.positive,
        stats.negative
    );
    if stats.truncated > 0 {
        println!(
            "  {} {} comments were cut to {} characters for the model",
            style("→").dim(),
            stats.truncated,
            max_chars
        );
    }
    println!("  {} Saved to {}", style("→").dim(), output.display());
    Ok(())
}
