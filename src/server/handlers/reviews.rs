//! Review analysis page.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
};

use super::super::templates;
use super::super::AppState;
use super::helpers::{reviews_in_month, select_month, MonthParams, MonthSummary};
use super::{fallback_banner, load_document};

/// Reviews of one month with sentiment counts and chart.
pub async fn reviews_page(
    State(state): State<AppState>,
    Query(params): Query<MonthParams>,
) -> impl IntoResponse {
    let loaded = match load_document(&state).await {
        Ok(loaded) => loaded,
        Err(response) => return response,
    };

    let month = match select_month(params.month.as_deref(), &state.months) {
        Ok(month) => month,
        Err(message) => {
            return (
                StatusCode::BAD_REQUEST,
                Html(templates::error_page("Invalid month", &message)),
            )
                .into_response()
        }
    };

    let reviews = reviews_in_month(&loaded.document.reviews, month);
    let summary = MonthSummary::of(&reviews);
    let annotated = loaded.document.has_annotations();

    let content = templates::reviews_page(&state.months, month, &reviews, &summary, annotated);
    let banner = fallback_banner(&loaded);
    Html(templates::base_template(
        "Review analysis",
        "/reviews",
        banner.as_deref(),
        &content,
    ))
    .into_response()
}
