//! storescrape: scrape a demo store's products, reviews and testimonials,
//! score review sentiment, and browse the results in a dashboard.

pub mod cli;
pub mod config;
pub mod driver;
pub mod models;
pub mod scrapers;
pub mod server;
pub mod services;
pub mod storage;
pub mod utils;
