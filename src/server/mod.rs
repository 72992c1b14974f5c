//! Dashboard web server.
//!
//! Server-rendered pages over the scraped document:
//! - Review analysis per month with sentiment counts and a bar chart
//! - Product and testimonial listings
//! - A small JSON API over the same data

mod assets;
mod cache;
mod handlers;
mod routes;
mod templates;

pub use cache::DocumentSource;
pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::Config;
use crate::utils::YearMonth;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<DocumentSource>,
    /// Months offered by the review filter, in order.
    pub months: Arc<Vec<YearMonth>>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let source = DocumentSource::new(config.annotated_path(), config.data_path());
        Self {
            source: Arc::new(source),
            months: Arc::new(config.dashboard.months.months()),
        }
    }
}

/// Start the web server.
pub async fn serve(config: &Config, addr: SocketAddr) -> anyhow::Result<()> {
    let state = AppState::new(config);
    if state.months.is_empty() {
        anyhow::bail!("dashboard.months is empty: start must not come after end");
    }
    let app = create_router(state);

    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::path::Path;
    use tempfile::tempdir;
    use tower::ServiceExt;

    use crate::models::{Document, Product, Review, SentimentAnnotation, SentimentLabel, Testimonial};
    use crate::storage;

    fn setup_test_app(dir: &Path) -> axum::Router {
        let state = AppState {
            source: Arc::new(DocumentSource::new(
                dir.join("data_annotated.json"),
                dir.join("data.json"),
            )),
            months: Arc::new(YearMonth::range(
                YearMonth::new(2023, 1).unwrap(),
                YearMonth::new(2023, 12).unwrap(),
            )),
        };
        create_router(state)
    }

    fn review(date: &str, comment: &str, sentiment: Option<(SentimentLabel, f64)>) -> Review {
        let mut review = Review::new(date, comment);
        if let Some((label, confidence)) = sentiment {
            review.annotate(SentimentAnnotation::new(label, confidence));
        }
        review
    }

    fn annotated_document() -> Document {
        Document {
            products: vec![Product::new("Box of Chocolate Candy", "$24.99")],
            reviews: vec![
                review("2023-01-05", "Love it", Some((SentimentLabel::Positive, 0.98))),
                review("January 20, 2023", "Broke fast", Some((SentimentLabel::Negative, 0.91))),
                review("2023-02-01", "Later", Some((SentimentLabel::Positive, 0.7))),
                review("N/A", "Undated", Some((SentimentLabel::Positive, 0.6))),
            ],
            testimonials: vec![Testimonial::capture("We're very happy with the service").unwrap()],
        }
    }

    async fn get(app: axum::Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_missing_data_is_explicit_error() {
        let dir = tempdir().unwrap();
        let (status, body) = get(setup_test_app(dir.path()), "/").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.contains("data_annotated.json"));
        assert!(body.contains("data.json"));

        let (status, body) = get(setup_test_app(dir.path()), "/api/document").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.contains("error"));
    }

    #[tokio::test]
    async fn test_reviews_page_filters_month() {
        let dir = tempdir().unwrap();
        storage::save(&annotated_document(), &dir.path().join("data_annotated.json")).unwrap();

        let (status, body) = get(setup_test_app(dir.path()), "/reviews?month=2023-01").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Love it"));
        assert!(body.contains("Broke fast"));
        assert!(!body.contains("Later"));
        assert!(!body.contains("Undated"));
        assert!(body.contains("class=\"chart\""));
        assert!(!body.contains("unannotated"));
    }

    #[tokio::test]
    async fn test_empty_month() {
        let dir = tempdir().unwrap();
        storage::save(&annotated_document(), &dir.path().join("data_annotated.json")).unwrap();

        let (status, body) = get(setup_test_app(dir.path()), "/reviews?month=2023-06").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("No reviews in June 2023."));
    }

    #[tokio::test]
    async fn test_invalid_month_is_bad_request() {
        let dir = tempdir().unwrap();
        storage::save(&annotated_document(), &dir.path().join("data.json")).unwrap();

        let (status, _) = get(setup_test_app(dir.path()), "/reviews?month=2031-01").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = get(setup_test_app(dir.path()), "/api/reviews?month=garbage").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_fallback_shows_warning() {
        let dir = tempdir().unwrap();
        let doc = Document {
            reviews: vec![review("2023-01-05", "Plain review", None)],
            ..Default::default()
        };
        storage::save(&doc, &dir.path().join("data.json")).unwrap();

        let (status, body) = get(setup_test_app(dir.path()), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Showing unannotated data"));
        assert!(body.contains("chart is not available"));
        assert!(body.contains("Plain review"));
        assert!(!body.contains("class=\"chart\""));
    }

    #[tokio::test]
    async fn test_api_reviews_aggregate() {
        let dir = tempdir().unwrap();
        storage::save(&annotated_document(), &dir.path().join("data_annotated.json")).unwrap();

        let (status, body) = get(setup_test_app(dir.path()), "/api/reviews?month=2023-01").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["month"], "2023-01");
        assert_eq!(json["summary"]["total"], 2);
        assert_eq!(json["summary"]["positive"], 1);
        assert_eq!(json["summary"]["negative"], 1);
        assert_eq!(json["reviews"][0]["Sentiment"], "POSITIVE");
    }

    #[tokio::test]
    async fn test_api_document_and_months() {
        let dir = tempdir().unwrap();
        storage::save(&annotated_document(), &dir.path().join("data_annotated.json")).unwrap();

        let (_, body) = get(setup_test_app(dir.path()), "/api/document").await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["variant"], "annotated");
        assert_eq!(json["counts"]["products"], 1);
        assert_eq!(json["document"]["products"][0]["name"], "Box of Chocolate Candy");

        let (_, body) = get(setup_test_app(dir.path()), "/api/months").await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 12);
        assert_eq!(json[2]["label"], "March 2023");
    }

    #[tokio::test]
    async fn test_products_and_testimonials_pages() {
        let dir = tempdir().unwrap();
        storage::save(&annotated_document(), &dir.path().join("data_annotated.json")).unwrap();

        let (status, body) = get(setup_test_app(dir.path()), "/products").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Box of Chocolate Candy"));
        assert!(body.contains("$24.99"));

        let (status, body) = get(setup_test_app(dir.path()), "/testimonials").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("We&#39;re very happy with the service..."));
    }

    #[tokio::test]
    async fn test_css_served() {
        let dir = tempdir().unwrap();
        let response = setup_test_app(dir.path())
            .oneshot(
                Request::builder()
                    .uri("/static/style.css")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "text/css");
    }
}
