use axum::routing::{get, post};
use axum::Router;

use crate::api::{links, search, vitals};
use crate::app::AppState;

/// JSON API routes. Leptos page and server-function routes are added by `main`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/search", get(search::search_handler))
        .route("/api/search/page", get(search::search_page_handler))
        .route("/api/fetch-image", post(links::fetch_image_handler))
        .route("/api/fetch-link", post(links::fetch_link_handler))
        .route(
            "/api/vitals",
            get(vitals::vitals_summary_handler).post(vitals::report_vitals_handler),
        )
        .route("/healthz", get(healthz))
}

async fn healthz() -> &'static str {
    "ok"
}
