use leptos::prelude::*;
use leptos_meta::{Link, Meta, Title};

use crate::seo::meta::PageMeta;

/// Title, description, canonical link and Open Graph tags for a page.
#[component]
pub fn PageHead(meta: PageMeta) -> impl IntoView {
    view! {
        <Title text=meta.title.clone()/>
        <Meta name="description" content=meta.description.clone()/>
        <Link rel="canonical" href=meta.canonical_url.clone()/>
        <Meta property="og:title" content=meta.title.clone()/>
        <Meta property="og:description" content=meta.description.clone()/>
        <Meta property="og:url" content=meta.canonical_url.clone()/>
        {meta.og_image.clone().map(|image| view! { <Meta property="og:image" content=image/> })}
    }
}

/// Structured data block. `payload` must come from `to_script_payload`.
#[component]
pub fn JsonLd(payload: String) -> impl IntoView {
    view! { <script type="application/ld+json" inner_html=payload></script> }
}
