//! Product and testimonial listings.

use axum::{
    extract::State,
    response::{Html, IntoResponse},
};

use super::super::templates;
use super::super::AppState;
use super::{fallback_banner, load_document};

pub async fn products_page(State(state): State<AppState>) -> impl IntoResponse {
    let loaded = match load_document(&state).await {
        Ok(loaded) => loaded,
        Err(response) => return response,
    };
    let content = templates::products_table(&loaded.document.products);
    let banner = fallback_banner(&loaded);
    Html(templates::base_template(
        "Products",
        "/products",
        banner.as_deref(),
        &content,
    ))
    .into_response()
}

pub async fn testimonials_page(State(state): State<AppState>) -> impl IntoResponse {
    let loaded = match load_document(&state).await {
        Ok(loaded) => loaded,
        Err(response) => return response,
    };
    let content = templates::testimonials_table(&loaded.document.testimonials);
    let banner = fallback_banner(&loaded);
    Html(templates::base_template(
        "Testimonials",
        "/testimonials",
        banner.as_deref(),
        &content,
    ))
    .into_response()
}
