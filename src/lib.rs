pub mod app;
pub mod error;
#[cfg(feature = "ssr")]
pub mod config;
pub mod models {
    pub mod category;
    pub mod page;
    pub mod search;
    pub mod tour;
}
pub mod store {
    pub mod client;
    pub mod memory;
    #[cfg(feature = "ssr")]
    pub mod cache;
    #[cfg(feature = "ssr")]
    pub mod mongo;
}
pub mod search {
    pub mod aggregator;
}
pub mod seo {
    pub mod meta;
    pub mod schema;
}
pub mod media {
    pub mod images;
}
pub mod metrics {
    pub mod vitals;
}
pub mod rendering {
    pub mod markdown;
}
pub mod components {
    pub mod category_view;
    pub mod head;
    pub mod page_view;
    pub mod search_bar;
    pub mod tour_card;
    pub mod tour_view;
}
pub mod api {
    pub mod errors;
    pub mod links;
    pub mod search;
    pub mod vitals;
    #[cfg(feature = "ssr")]
    pub mod routes;
}

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    leptos::mount::hydrate_body(app::App);
}
