//! End-to-end scraping against in-memory pages.

mod common;

use common::{next_link, product_page, reviews_page, settings, url};
use storescrape::driver::{PageDriver, StaticDomDriver};
use storescrape::models::{Product, NO_DATE};
use storescrape::scrapers::paginate::{load_reviews, paginate_products};
use storescrape::scrapers::{self, Phase, PhaseOutcome, StopReason};

#[tokio::test]
async fn test_pagination_ends_on_empty_page() {
    let mut driver = StaticDomDriver::in_memory([
        (
            url("/products"),
            product_page(&[("A", "$1.00"), ("B", "$2.00")], &next_link("/products?page=2")),
        ),
        (
            url("/products?page=2"),
            product_page(&[("C", "$3.00")], &next_link("/products?page=3")),
        ),
        (url("/products?page=3"), product_page(&[], "")),
    ]);
    driver.navigate(&url("/products")).await.unwrap();

    let mut products = Vec::new();
    let stats = paginate_products(&mut driver, &settings(), &mut products)
        .await
        .unwrap();

    assert_eq!(stats.stop, Some(StopReason::EmptyPage));
    assert_eq!(stats.pages, 2);
    assert_eq!(stats.clicks, 2);
    let names: Vec<_> = products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["A", "B", "C"]);
}

#[tokio::test]
async fn test_disabled_next_is_never_clicked() {
    let mut driver = StaticDomDriver::in_memory([(
        url("/products"),
        product_page(
            &[("A", "$1.00")],
            r#"<a class="page-link disabled" href="/products?page=2">&gt;</a>"#,
        ),
    )]);
    driver.navigate(&url("/products")).await.unwrap();

    let mut products = Vec::new();
    let stats = paginate_products(&mut driver, &settings(), &mut products)
        .await
        .unwrap();

    assert_eq!(stats.stop, Some(StopReason::NextDisabled));
    assert_eq!(driver.click_count(), 0);
    assert_eq!(products, vec![Product::new("A", "$1.00")]);
}

#[tokio::test]
async fn test_broken_row_is_skipped() {
    let html = r#"<html><body>
        <div class="row product"><h3><a>Good</a></h3><div class="price">$1.00</div></div>
        <div class="row product"><h3><a>No price</a></h3></div>
        <div class="row product"><h3><a>Also good</a></h3><div class="price">$2.00</div></div>
    </body></html>"#;
    let mut driver = StaticDomDriver::in_memory([(url("/products"), html)]);
    driver.navigate(&url("/products")).await.unwrap();

    let mut products = Vec::new();
    let stats = paginate_products(&mut driver, &settings(), &mut products)
        .await
        .unwrap();

    assert_eq!(stats.skipped, 1);
    assert_eq!(
        products,
        vec![Product::new("Good", "$1.00"), Product::new("Also good", "$2.00")]
    );
}

#[tokio::test]
async fn test_review_text_split() {
    let mut driver = StaticDomDriver::in_memory([(
        url("/reviews"),
        reviews_page(&[
            (Some("March 1, 2023"), "Great product, fast shipping."),
            (None, "  Just a comment  "),
        ]),
    )]);
    driver.navigate(&url("/reviews")).await.unwrap();

    let mut reviews = Vec::new();
    load_reviews(&mut driver, &settings(), &mut reviews)
        .await
        .unwrap();

    assert_eq!(reviews.len(), 2);
    assert_eq!(reviews[0].date, "March 1, 2023");
    assert_eq!(reviews[0].comment, "Great product, fast shipping.");
    assert_eq!(reviews[1].date, NO_DATE);
    assert_eq!(reviews[1].comment, "Just a comment");
}

#[tokio::test]
async fn test_full_run() {
    let mut driver = common::full_store();
    let report = scrapers::run(&mut driver, &settings()).await;

    assert_eq!(report.failed_phases().count(), 0);
    assert!(driver.is_closed());

    let doc = &report.document;
    let names: Vec<_> = doc.products.iter().map(|p| p.name.as_str()).collect();
    // The repeated product on page 2 keeps its first position.
    assert_eq!(
        names,
        ["Box of Chocolate", "Red Energy Potion", "Dark Red Energy Potion"]
    );
    assert_eq!(doc.reviews.len(), 3);
    assert_eq!(doc.testimonials.len(), 2);
    assert_eq!(
        doc.testimonials[0].text,
        "We love this shop, the chocolate is the best we ev..."
    );
    assert_eq!(doc.testimonials[1].text, "Quick delivery....");

    match report.outcome(Phase::Products) {
        Some(PhaseOutcome::Completed(stats)) => {
            assert_eq!(stats.stop, Some(StopReason::NextDisabled));
            assert_eq!(stats.pages, 2);
        }
        other => panic!("unexpected products outcome: {:?}", other),
    }
}

#[tokio::test]
async fn test_failed_phase_does_not_stop_the_rest() {
    // No reviews page: navigating there fails.
    let mut driver = StaticDomDriver::in_memory([
        (url("/products"), product_page(&[("A", "$1.00")], "")),
        (url("/testimonials"), common::testimonials_page(&["Nice."])),
    ]);
    let report = scrapers::run(&mut driver, &settings()).await;

    let failed: Vec<_> = report.failed_phases().collect();
    assert_eq!(failed, vec![Phase::Reviews]);
    assert_eq!(report.document.products.len(), 1);
    assert!(report.document.reviews.is_empty());
    assert_eq!(report.document.testimonials.len(), 1);
    assert!(driver.is_closed());
}
