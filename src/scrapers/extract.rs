//! Record extraction from the current page.
//!
//! Each extractor reads the elements present right now and turns them into
//! records. A row that cannot be read is skipped and counted; it never stops
//! the rest of the page from being read.

use tracing::{debug, warn};

use crate::driver::{DriverResult, Locator, PageDriver};
use crate::models::{Product, Review, Testimonial};

use super::config::SelectorConfig;

/// Result of reading one row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome<T> {
    Record(T),
    Skipped(String),
}

/// Records read from one page snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct PageExtraction<T> {
    pub records: Vec<T>,
    pub skipped: usize,
}

impl<T> Default for PageExtraction<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            skipped: 0,
        }
    }
}

impl<T> PageExtraction<T> {
    fn push(&mut self, index: usize, outcome: RowOutcome<T>) {
        match outcome {
            RowOutcome::Record(record) => self.records.push(record),
            RowOutcome::Skipped(reason) => {
                debug!("Row {} skipped: {}", index, reason);
                self.skipped += 1;
            }
        }
    }
}

/// Read one sub-element's trimmed text, turning element-level failures into a
/// skip reason.
async fn child_text<D: PageDriver>(
    driver: &mut D,
    row: &D::Element,
    locator: &Locator,
) -> DriverResult<Result<String, String>> {
    let child = match driver.find_within(row, locator).await {
        Ok(child) => child,
        Err(e) if e.is_element_level() => return Ok(Err(e.to_string())),
        Err(e) => return Err(e),
    };
    match driver.text(&child).await {
        Ok(text) => Ok(Ok(text.trim().to_string())),
        Err(e) if e.is_element_level() => Ok(Err(e.to_string())),
        Err(e) => Err(e),
    }
}

async fn product_row<D: PageDriver>(
    driver: &mut D,
    row: &D::Element,
    selectors: &SelectorConfig,
) -> DriverResult<RowOutcome<Product>> {
    let name = match child_text(driver, row, &selectors.product_title()).await? {
        Ok(name) => name,
        Err(reason) => return Ok(RowOutcome::Skipped(format!("no title: {}", reason))),
    };
    let price = match child_text(driver, row, &selectors.product_price()).await? {
        Ok(price) => price,
        Err(reason) => {
            return Ok(RowOutcome::Skipped(format!(
                "no price for {:?}: {}",
                name, reason
            )))
        }
    };
    Ok(RowOutcome::Record(Product::new(name, price)))
}

/// Products in the rows currently on the page.
pub async fn extract_products<D: PageDriver>(
    driver: &mut D,
    selectors: &SelectorConfig,
) -> DriverResult<PageExtraction<Product>> {
    let rows = driver.find_all(&selectors.product_row()).await?;
    let mut page = PageExtraction::default();
    for (index, row) in rows.iter().enumerate() {
        let outcome = product_row(driver, row, selectors).await?;
        if let RowOutcome::Skipped(ref reason) = outcome {
            warn!("Skipping product row {}: {}", index, reason);
        }
        page.push(index, outcome);
    }
    Ok(page)
}

/// Rendered text of every element matching the locator, element-level
/// failures reported as skips.
async fn texts<D: PageDriver>(
    driver: &mut D,
    locator: &Locator,
) -> DriverResult<Vec<Result<String, String>>> {
    let elements = driver.find_all(locator).await?;
    let mut out = Vec::with_capacity(elements.len());
    for element in &elements {
        match driver.text(element).await {
            Ok(text) => out.push(Ok(text)),
            Err(e) if e.is_element_level() => out.push(Err(e.to_string())),
            Err(e) => return Err(e),
        }
    }
    Ok(out)
}

/// Reviews currently on the page.
pub async fn extract_reviews<D: PageDriver>(
    driver: &mut D,
    selectors: &SelectorConfig,
) -> DriverResult<PageExtraction<Review>> {
    let mut page = PageExtraction::default();
    for (index, text) in texts(driver, &selectors.review()).await?.into_iter().enumerate() {
        let outcome = match text {
            Ok(text) if text.trim().is_empty() => RowOutcome::Skipped("empty review".to_string()),
            Ok(text) => RowOutcome::Record(Review::from_text(&text)),
            Err(reason) => {
                warn!("Skipping review {}: {}", index, reason);
                RowOutcome::Skipped(reason)
            }
        };
        page.push(index, outcome);
    }
    Ok(page)
}

/// Testimonials currently on the page, truncated at capture.
pub async fn extract_testimonials<D: PageDriver>(
    driver: &mut D,
    selectors: &SelectorConfig,
) -> DriverResult<PageExtraction<Testimonial>> {
    let mut page = PageExtraction::default();
    for (index, text) in texts(driver, &selectors.testimonial())
        .await?
        .into_iter()
        .enumerate()
    {
        let outcome = match text {
            Ok(text) => match Testimonial::capture(&text) {
                Some(testimonial) => RowOutcome::Record(testimonial),
                None => RowOutcome::Skipped("empty testimonial".to_string()),
            },
            Err(reason) => {
                warn!("Skipping testimonial {}: {}", index, reason);
                RowOutcome::Skipped(reason)
            }
        };
        page.push(index, outcome);
    }
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::StaticDomDriver;

    const URL: &str = "https://shop.test/products";

    async fn on_page(html: &str) -> StaticDomDriver {
        let mut driver = StaticDomDriver::in_memory([(URL, html)]);
        driver.navigate(URL).await.unwrap();
        driver
    }

    #[tokio::test]
    async fn test_products_skip_bad_rows() {
        let mut driver = on_page(
            r#"<div class="row product"><h3><a>Box</a></h3><div class="price"> 9.99 </div></div>
               <div class="row product"><h3><a>No price</a></h3></div>
               <div class="row product"><div class="price">1.00</div></div>
               <div class="row product"><h3><a> Bag </a></h3><div class="price">4.50</div></div>"#,
        )
        .await;

        let page = extract_products(&mut driver, &SelectorConfig::default())
            .await
            .unwrap();
        assert_eq!(
            page.records,
            vec![Product::new("Box", "9.99"), Product::new("Bag", "4.50")]
        );
        assert_eq!(page.skipped, 2);
    }

    #[tokio::test]
    async fn test_reviews_split_and_skip_empty() {
        let mut driver = on_page(
            r#"<div class="review"><span>2023-03-01</span><p>Great product, fast shipping.</p></div>
               <div class="review">   </div>
               <div class="review">Just words</div>"#,
        )
        .await;

        let page = extract_reviews(&mut driver, &SelectorConfig::default())
            .await
            .unwrap();
        assert_eq!(page.records.len(), 2);
        assert_eq!(page.records[0].date, "2023-03-01");
        assert_eq!(page.records[0].comment, "Great product, fast shipping.");
        assert_eq!(page.records[1].date, "N/A");
        assert_eq!(page.records[1].comment, "Just words");
        assert_eq!(page.skipped, 1);
    }

    #[tokio::test]
    async fn test_testimonials_truncate() {
        let long = "x".repeat(80);
        let html = format!(
            r#"<div class="testimonial">  Short one  </div><div class="testimonial"></div><div class="testimonial">{}</div>"#,
            long
        );
        let mut driver = on_page(&html).await;

        let page = extract_testimonials(&mut driver, &SelectorConfig::default())
            .await
            .unwrap();
        let texts: Vec<&str> = page.records.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts[0], "Short one...");
        assert_eq!(texts[1], format!("{}...", "x".repeat(50)));
        assert_eq!(page.skipped, 1);
    }

    #[tokio::test]
    async fn test_no_rows_is_empty_page() {
        let mut driver = on_page("<p>nothing here</p>").await;
        let page = extract_products(&mut driver, &SelectorConfig::default())
            .await
            .unwrap();
        assert!(page.records.is_empty());
        assert_eq!(page.skipped, 0);
    }
}
