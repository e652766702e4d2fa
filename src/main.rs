#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use std::sync::Arc;

    use leptos::prelude::*;
    use leptos_axum::{generate_route_list, LeptosRoutes};
    use tourbook::app::{shell, App, AppState};
    use tourbook::config::{ContentBackend, SiteConfig};
    use tourbook::store::cache::CachedContentStore;
    use tourbook::store::client::ContentStore;
    use tourbook::store::memory::InMemoryContentStore;
    use tourbook::store::mongo::MongoContentStore;
    use tower_http::services::ServeDir;
    use tower_http::trace::TraceLayer;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tourbook=info,tower_http=info".into()),
        )
        .init();

    tracing::info!("Starting Tourbook server...");

    let config = SiteConfig::load()?;

    // Leptos options come from Cargo.toml metadata (or LEPTOS_* env vars)
    let conf = get_configuration(None)?;
    let leptos_options = conf.leptos_options;
    let addr = leptos_options.site_addr;
    let site_root = leptos_options.site_root.to_string();

    let backend: Arc<dyn ContentStore> = match config.content_backend {
        ContentBackend::Mongo => {
            let store =
                MongoContentStore::connect(&config.mongodb_uri, &config.mongodb_database).await?;
            tracing::info!(
                database = %config.mongodb_database,
                "Connected to MongoDB at {}",
                config.mongodb_host()
            );
            Arc::new(store)
        }
        ContentBackend::Fixture => Arc::new(InMemoryContentStore::from_json_file(&config.fixture_path)?),
    };
    let content_store: Arc<dyn ContentStore> =
        Arc::new(CachedContentStore::new(backend, config.cache_ttl()));

    let app_state = AppState::new(content_store, &config, leptos_options.clone());

    let routes = generate_route_list(App);

    let app = tourbook::api::routes::api_routes()
        .leptos_routes_with_context(
            &app_state,
            routes,
            {
                let app_state = app_state.clone();
                move || provide_context(app_state.clone())
            },
            {
                let leptos_options = leptos_options.clone();
                move || shell(leptos_options.clone())
            },
        )
        .fallback_service(ServeDir::new(&site_root))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    tracing::info!("Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

// When compiled for WASM (client-side), there's no main function.
// The hydrate() function in lib.rs handles client-side initialization.
#[cfg(not(feature = "ssr"))]
fn main() {}
