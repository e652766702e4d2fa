use leptos::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::head::{JsonLd, PageHead};
use crate::seo::meta::PageMeta;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentPageData {
    pub title: String,
    pub body_html: String,
    pub meta: PageMeta,
    pub json_ld: String,
}

#[server]
pub async fn get_page(slug: String) -> Result<Option<ContentPageData>, ServerFnError> {
    use crate::rendering::markdown::render_page_body;
    use crate::seo::schema::{generate, to_script_payload};

    let state = crate::app::app_state()?;
    let page = state
        .content_store
        .page_by_slug(&slug)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    Ok(page.map(|page| ContentPageData {
        body_html: page.body.as_deref().map(render_page_body).unwrap_or_default(),
        meta: PageMeta::for_page(&page, &state.site),
        json_ld: to_script_payload(&generate(&page, &state.site.base_url)),
        title: page.title,
    }))
}

#[component]
pub fn ContentPage(data: ContentPageData) -> impl IntoView {
    view! {
        <PageHead meta=data.meta/>
        <JsonLd payload=data.json_ld/>
        <article class="content-page">
            <h1>{data.title}</h1>
            <div class="content-body" inner_html=data.body_html></div>
        </article>
    }
}
