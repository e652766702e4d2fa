use serde::Deserialize;

use crate::models::search::SearchResponse;
use crate::search::aggregator::{search, SearchPolicy};

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// Axum handler for `GET /api/search`.
///
/// Always answers 200; failures are reported in the body's `error` field.
#[cfg(feature = "ssr")]
pub async fn search_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    axum::extract::Query(params): axum::extract::Query<SearchParams>,
) -> axum::Json<SearchResponse> {
    let response = search(
        state.content_store.as_ref(),
        params.q.as_deref(),
        &SearchPolicy::INSTANT,
    )
    .await;
    axum::Json(response)
}

/// Axum handler for `GET /api/search/page`, the full results listing.
#[cfg(feature = "ssr")]
pub async fn search_page_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    axum::extract::Query(params): axum::extract::Query<SearchParams>,
) -> axum::Json<SearchResponse> {
    let response = search(
        state.content_store.as_ref(),
        params.q.as_deref(),
        &SearchPolicy::RESULTS_PAGE,
    )
    .await;
    axum::Json(response)
}
