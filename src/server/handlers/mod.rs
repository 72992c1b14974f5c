//! HTTP request handlers for the dashboard.

mod api;
pub(super) mod helpers;
mod pages;
mod reviews;
mod static_files;

// Re-export handlers for use by the router
pub use api::{api_document, api_months, api_reviews};
pub use pages::{products_page, testimonials_page};
pub use reviews::reviews_page;
pub use static_files::serve_css;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use super::templates;
use super::AppState;
use crate::storage::LoadedDocument;

/// Current document, or the error page to answer with instead.
async fn load_document(state: &AppState) -> Result<Arc<LoadedDocument>, Response> {
    Arc::clone(&state.source).fetch().await.map_err(|e| {
        if e.is_not_found() {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Html(templates::missing_data_page(
                    state.source.annotated_path(),
                    state.source.unannotated_path(),
                )),
            )
                .into_response()
        } else {
            tracing::error!("Failed to load document: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(templates::error_page("Error", &e.to_string())),
            )
                .into_response()
        }
    })
}

/// Warning banner when serving the unannotated file.
fn fallback_banner(loaded: &LoadedDocument) -> Option<String> {
    (!loaded.variant.is_annotated()).then(|| templates::unannotated_banner(&loaded.path))
}
