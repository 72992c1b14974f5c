//! Services that work on a scraped document.

pub mod sentiment;
