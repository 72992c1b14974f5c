//! JSON API endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::super::AppState;
use super::helpers::{reviews_in_month, select_month, MonthParams, MonthSummary};
use crate::storage::LoadedDocument;

fn json_error(status: StatusCode, message: String) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

/// Current document or a JSON error.
async fn document_or_error(state: &AppState) -> Result<Arc<LoadedDocument>, Response> {
    Arc::clone(&state.source).fetch().await.map_err(|e| {
        let status = if e.is_not_found() {
            StatusCode::SERVICE_UNAVAILABLE
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        json_error(status, e.to_string())
    })
}

/// The whole document and which file it came from.
pub async fn api_document(State(state): State<AppState>) -> impl IntoResponse {
    let loaded = match document_or_error(&state).await {
        Ok(loaded) => loaded,
        Err(response) => return response,
    };
    Json(serde_json::json!({
        "variant": loaded.variant,
        "path": loaded.path.display().to_string(),
        "counts": loaded.document.counts(),
        "document": loaded.document,
    }))
    .into_response()
}

/// One month's reviews with their sentiment aggregate.
pub async fn api_reviews(
    State(state): State<AppState>,
    Query(params): Query<MonthParams>,
) -> impl IntoResponse {
    let loaded = match document_or_error(&state).await {
        Ok(loaded) => loaded,
        Err(response) => return response,
    };
    let month = match select_month(params.month.as_deref(), &state.months) {
        Ok(month) => month,
        Err(message) => return json_error(StatusCode::BAD_REQUEST, message),
    };

    let reviews = reviews_in_month(&loaded.document.reviews, month);
    let summary = MonthSummary::of(&reviews);
    Json(serde_json::json!({
        "month": month,
        "label": month.label(),
        "summary": summary,
        "reviews": reviews,
    }))
    .into_response()
}

/// Months the dashboard can filter by.
pub async fn api_months(State(state): State<AppState>) -> impl IntoResponse {
    let months: Vec<_> = state
        .months
        .iter()
        .map(|m| {
            serde_json::json!({
                "value": m,
                "label": m.label(),
            })
        })
        .collect();
    Json(months)
}
