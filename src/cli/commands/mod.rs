//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod annotate;
mod config_cmd;
mod scrape;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{load_config, LoadOptions};
use crate::driver::BrowserEngineType;

#[derive(Parser)]
#[command(name = "storescrape")]
#[command(about = "Scrape store products, reviews and testimonials, score review sentiment, and browse the results")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape products, reviews and testimonials and save them as JSON
    Scrape {
        /// Page driver: chromium renders JavaScript, http only fetches HTML
        #[arg(long, value_enum)]
        engine: Option<BrowserEngineType>,
        /// Site to scrape (default: https://web-scraping.dev)
        #[arg(long)]
        base_url: Option<String>,
        /// Output file (default: output.data_file from config)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Stop after this many product pages (0 = unlimited)
        #[arg(long)]
        max_pages: Option<u32>,
        /// Show the browser window
        #[arg(long)]
        headed: bool,
    },

    /// Add review sentiment to a scraped document
    Annotate {
        /// Document to annotate (default: output.data_file)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Where to write the annotated document (default: output.annotated_file)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Inference API base URL
        #[arg(long, env = "STORESCRAPE_CLASSIFIER_ENDPOINT")]
        endpoint: Option<String>,
        /// Model id
        #[arg(long)]
        model: Option<String>,
    },

    /// Start the dashboard web server
    Serve {
        /// Address to bind to: PORT, HOST, or HOST:PORT (default: dashboard.bind)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,
    /// Print the config file in use
    Path,
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config,
    };
    let config = load_config(&options).await.map_err(|e| anyhow::anyhow!(e))?;

    match cli.command {
        Commands::Scrape {
            engine,
            base_url,
            output,
            max_pages,
            headed,
        } => {
            let args = scrape::ScrapeArgs {
                engine,
                base_url,
                output,
                max_pages,
                headed,
            };
            scrape::cmd_scrape(config, args).await
        }
        Commands::Annotate {
            input,
            output,
            endpoint,
            model,
        } => {
            let args = annotate::AnnotateArgs {
                input,
                output,
                endpoint,
                model,
            };
            annotate::cmd_annotate(config, args).await
        }
        Commands::Serve { bind } => serve::cmd_serve(&config, bind.as_deref()).await,
        Commands::Config { command } => match command {
            ConfigCommands::Show => config_cmd::cmd_config_show(&config),
            ConfigCommands::Path => config_cmd::cmd_config_path(&config),
        },
    }
}
