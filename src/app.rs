use leptos::prelude::*;
use leptos_meta::{provide_meta_context, MetaTags, Stylesheet, Title};
use leptos_router::components::*;
use leptos_router::hooks::{use_params_map, use_query_map};
use leptos_router::{path, SsrMode};

use crate::components::category_view::{get_category, list_categories, CategoryDetail, CategoryIndex};
use crate::components::page_view::{get_page, ContentPage};
use crate::components::search_bar::{SearchBar, SearchResults};
use crate::components::tour_view::{get_tour, FeaturedTours, TourDetail};

/// Shared application state, available to axum handlers and server functions.
#[cfg(feature = "ssr")]
#[derive(Clone)]
pub struct AppState {
    pub content_store: std::sync::Arc<dyn crate::store::client::ContentStore>,
    pub vitals: std::sync::Arc<crate::metrics::vitals::VitalsCollector>,
    pub site: crate::seo::meta::SiteInfo,
    pub images: crate::media::images::ImageUrlBuilder,
    pub leptos_options: LeptosOptions,
}

#[cfg(feature = "ssr")]
impl AppState {
    pub fn new(
        content_store: std::sync::Arc<dyn crate::store::client::ContentStore>,
        config: &crate::config::SiteConfig,
        leptos_options: LeptosOptions,
    ) -> Self {
        Self {
            content_store,
            vitals: std::sync::Arc::new(crate::metrics::vitals::VitalsCollector::new()),
            site: config.site_info(),
            images: crate::media::images::ImageUrlBuilder::new(&config.image_cdn_base),
            leptos_options,
        }
    }
}

#[cfg(feature = "ssr")]
impl axum::extract::FromRef<AppState> for LeptosOptions {
    fn from_ref(state: &AppState) -> Self {
        state.leptos_options.clone()
    }
}

/// The state provided to server functions via `leptos_routes_with_context`.
#[cfg(feature = "ssr")]
pub fn app_state() -> Result<AppState, ServerFnError> {
    use_context::<AppState>().ok_or_else(|| ServerFnError::new("AppState not found in context"))
}

pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Stylesheet id="leptos" href="/pkg/tourbook.css"/>
        <Title text="Tourbook - Tours and activities"/>

        <Router>
            <nav class="top-nav">
                <a class="logo" href="/">"Tourbook"</a>
                <a href="/categories">"Destinations"</a>
                <SearchBar/>
            </nav>
            <main>
                <Routes fallback=|| view! { <NotFound/> }>
                    <Route path=path!("/") view=HomePage ssr=SsrMode::Async/>
                    <Route path=path!("/categories") view=CategoriesPage ssr=SsrMode::Async/>
                    <Route path=path!("/category/:slug") view=CategoryPage ssr=SsrMode::Async/>
                    <Route path=path!("/tour/:slug") view=TourPage ssr=SsrMode::Async/>
                    <Route path=path!("/search") view=SearchPage ssr=SsrMode::Async/>
                    <Route path=path!("/:slug") view=ContentPageRoute ssr=SsrMode::Async/>
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn HomePage() -> impl IntoView {
    view! {
        <section class="hero">
            <h1>"Tours and activities worth travelling for"</h1>
            <p>"Skip-the-line tickets, guided walks and day trips, hand-picked by locals."</p>
        </section>
        <FeaturedTours/>
    }
}

#[component]
fn CategoriesPage() -> impl IntoView {
    let categories = Resource::new(|| (), |_| async move { list_categories().await });

    view! {
        <Suspense fallback=|| view! { <p>"Loading destinations..."</p> }>
            {move || categories.get().map(|res| match res {
                Ok(data) => view! { <CategoryIndex data/> }.into_any(),
                Err(e) => view! { <p class="error">"Error loading destinations: " {e.to_string()}</p> }.into_any(),
            })}
        </Suspense>
    }
}

#[component]
fn CategoryPage() -> impl IntoView {
    let params = use_params_map();
    let slug = Memo::new(move |_| params.get().get("slug").unwrap_or_default());
    let category = Resource::new(move || slug.get(), |s| async move { get_category(s).await });

    view! {
        <Suspense fallback=|| view! { <p>"Loading destination..."</p> }>
            {move || category.get().map(|res| match res {
                Ok(Some(data)) => view! { <CategoryDetail data/> }.into_any(),
                Ok(None) => view! { <NotFound/> }.into_any(),
                Err(e) => view! { <p class="error">"Error loading destination: " {e.to_string()}</p> }.into_any(),
            })}
        </Suspense>
    }
}

#[component]
fn TourPage() -> impl IntoView {
    let params = use_params_map();
    let slug = Memo::new(move |_| params.get().get("slug").unwrap_or_default());
    let tour = Resource::new(move || slug.get(), |s| async move { get_tour(s).await });

    view! {
        <Suspense fallback=|| view! { <p>"Loading tour..."</p> }>
            {move || tour.get().map(|res| match res {
                Ok(Some(data)) => view! { <TourDetail data/> }.into_any(),
                Ok(None) => view! { <NotFound/> }.into_any(),
                Err(e) => view! { <p class="error">"Error loading tour: " {e.to_string()}</p> }.into_any(),
            })}
        </Suspense>
    }
}

#[component]
fn SearchPage() -> impl IntoView {
    let query = use_query_map();
    let q = move || query.get().get("q").unwrap_or_default();

    view! {
        <Title text="Search | Tourbook"/>
        {move || view! { <SearchResults query=q()/> }}
    }
}

#[component]
fn ContentPageRoute() -> impl IntoView {
    let params = use_params_map();
    let slug = Memo::new(move |_| params.get().get("slug").unwrap_or_default());
    let page = Resource::new(move || slug.get(), |s| async move { get_page(s).await });

    view! {
        <Suspense fallback=|| view! { <p>"Loading..."</p> }>
            {move || page.get().map(|res| match res {
                Ok(Some(data)) => view! { <ContentPage data/> }.into_any(),
                Ok(None) => view! { <NotFound/> }.into_any(),
                Err(e) => view! { <p class="error">"Error loading page: " {e.to_string()}</p> }.into_any(),
            })}
        </Suspense>
    }
}

#[component]
fn NotFound() -> impl IntoView {
    #[cfg(feature = "ssr")]
    {
        if let Some(response) = use_context::<leptos_axum::ResponseOptions>() {
            response.set_status(axum::http::StatusCode::NOT_FOUND);
        }
    }

    view! {
        <Title text="Page not found | Tourbook"/>
        <h1>"Page not found"</h1>
        <p><a href="/">"Back to all tours"</a></p>
    }
}
