#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use leptos::prelude::*;
use leptos_axum::{generate_route_list, LeptosRoutes};
use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::mongo::Mongo;

use tourbook::app::{shell, App, AppState};
use tourbook::config::{ContentBackend, SiteConfig};
use tourbook::error::AppError;
use tourbook::models::category::Category;
use tourbook::models::page::Page;
use tourbook::models::tour::Tour;
use tourbook::store::client::{CategoryQuery, ContentStore, TourQuery};
use tourbook::store::memory::InMemoryContentStore;
use tourbook::store::mongo::MongoContentStore;

pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/fixture.json")
}

pub fn test_config() -> SiteConfig {
    SiteConfig {
        base_url: "https://tourbook.test".into(),
        site_name: "Tourbook".into(),
        content_backend: ContentBackend::Fixture,
        mongodb_uri: "mongodb://127.0.0.1:27017".into(),
        mongodb_database: "tourbook_test".into(),
        fixture_path: fixture_path(),
        cache_ttl_secs: 60,
        image_cdn_base: "https://cdn.tourbook.test/images".into(),
    }
}

pub fn fixture_store() -> Arc<dyn ContentStore> {
    Arc::new(InMemoryContentStore::from_json_file(fixture_path()).expect("Failed to load fixture"))
}

pub fn app_state(store: Arc<dyn ContentStore>) -> AppState {
    let leptos_options = LeptosOptions::builder().output_name("tourbook").build();
    AppState::new(store, &test_config(), leptos_options)
}

/// API routes only, no Leptos SSR.
pub fn api_router(store: Arc<dyn ContentStore>) -> Router {
    tourbook::api::routes::api_routes().with_state(app_state(store))
}

/// API routes plus server-rendered pages.
pub fn site_router(store: Arc<dyn ContentStore>) -> Router {
    let state = app_state(store);
    let routes = generate_route_list(App);

    tourbook::api::routes::api_routes()
        .leptos_routes_with_context(
            &state,
            routes,
            {
                let state = state.clone();
                move || provide_context(state.clone())
            },
            {
                let options = state.leptos_options.clone();
                move || shell(options.clone())
            },
        )
        .with_state(state)
}

pub fn server(router: Router) -> axum_test::TestServer {
    axum_test::TestServer::builder()
        .expect_success_by_default()
        .build(router)
}

/// A `TestServer` that does NOT expect success by default (for error tests).
pub fn server_permissive(router: Router) -> axum_test::TestServer {
    axum_test::TestServer::builder()
        .build(router)
}

/// Store whose every call fails, for degradation tests.
pub struct FailingStore;

#[async_trait]
impl ContentStore for FailingStore {
    async fn find_tours(&self, _query: &TourQuery) -> Result<Vec<Tour>, AppError> {
        Err(AppError::Database("connection refused".into()))
    }

    async fn find_categories(&self, _query: &CategoryQuery) -> Result<Vec<Category>, AppError> {
        Err(AppError::Database("connection refused".into()))
    }

    async fn tour_by_slug(&self, _slug: &str) -> Result<Option<Tour>, AppError> {
        Err(AppError::Database("connection refused".into()))
    }

    async fn category_by_slug(&self, _slug: &str) -> Result<Option<Category>, AppError> {
        Err(AppError::Database("connection refused".into()))
    }

    async fn page_by_slug(&self, _slug: &str) -> Result<Option<Page>, AppError> {
        Err(AppError::Database("connection refused".into()))
    }
}

/// A MongoDB container seeded with the fixture content.
///
/// The container is stopped when this struct is dropped.
pub struct MongoEnv {
    _mongo: ContainerAsync<Mongo>,
    pub db: mongodb::Database,
    pub store: Arc<MongoContentStore>,
}

impl MongoEnv {
    pub async fn start() -> Self {
        let container = Mongo::default()
            .start()
            .await
            .expect("Failed to start MongoDB container");
        let port = container
            .get_host_port_ipv4(27017)
            .await
            .expect("Failed to get MongoDB port");

        let client = mongodb::Client::with_uri_str(format!("mongodb://127.0.0.1:{port}"))
            .await
            .expect("Failed to connect to MongoDB");
        let db = client.database(&format!("tourbook_{}", uuid::Uuid::new_v4().simple()));

        let raw = std::fs::read_to_string(fixture_path()).expect("Failed to read fixture");
        let fixture: serde_json::Value = serde_json::from_str(&raw).expect("Invalid fixture");
        for collection in ["tours", "categories", "pages"] {
            let docs: Vec<mongodb::bson::Document> = fixture[collection]
                .as_array()
                .expect("fixture collection")
                .iter()
                .map(|v| mongodb::bson::to_document(v).expect("fixture record to BSON"))
                .collect();
            db.collection::<mongodb::bson::Document>(collection)
                .insert_many(docs)
                .await
                .expect("Failed to seed collection");
        }

        let store = Arc::new(MongoContentStore::new(&db));
        Self {
            _mongo: container,
            db,
            store,
        }
    }
}
