//! Router configuration for the dashboard.

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Root is the review analysis page
        .route("/", get(handlers::reviews_page))
        .route("/reviews", get(handlers::reviews_page))
        .route("/products", get(handlers::products_page))
        .route("/testimonials", get(handlers::testimonials_page))
        // JSON API
        .route("/api/document", get(handlers::api_document))
        .route("/api/reviews", get(handlers::api_reviews))
        .route("/api/months", get(handlers::api_months))
        // Static assets
        .route("/static/style.css", get(handlers::serve_css))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
