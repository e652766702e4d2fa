use leptos::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::head::{JsonLd, PageHead};
use crate::components::tour_card::{TourGrid, TourSummary};
use crate::models::tour::Tour;
use crate::seo::meta::PageMeta;

const HERO_IMAGE_WIDTH: u32 = 1600;
const GALLERY_IMAGE_WIDTH: u32 = 800;
const FEATURED_LIMIT: usize = 12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourPageData {
    pub tour: Tour,
    pub meta: PageMeta,
    pub json_ld: String,
    pub hero_image: Option<String>,
    pub gallery: Vec<String>,
}

#[server]
pub async fn get_tour(slug: String) -> Result<Option<TourPageData>, ServerFnError> {
    use crate::seo::meta::tour_json_ld;
    use crate::seo::schema::to_script_payload;

    let state = crate::app::app_state()?;
    let Some(tour) = state
        .content_store
        .tour_by_slug(&slug)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?
    else {
        return Ok(None);
    };

    let hero_image = tour
        .main_image
        .as_ref()
        .and_then(|i| state.images.url(&i.asset_ref, HERO_IMAGE_WIDTH));
    let gallery = tour
        .gallery
        .iter()
        .filter_map(|i| state.images.url(&i.asset_ref, GALLERY_IMAGE_WIDTH))
        .collect();
    let meta = PageMeta::for_tour(&tour, &state.site, hero_image.clone());
    let json_ld = to_script_payload(&tour_json_ld(&tour, &state.site, hero_image.clone()));

    Ok(Some(TourPageData {
        tour,
        meta,
        json_ld,
        hero_image,
        gallery,
    }))
}

#[server]
pub async fn featured_tours() -> Result<Vec<TourSummary>, ServerFnError> {
    use crate::store::client::{TourFilter, TourQuery};

    let state = crate::app::app_state()?;
    let tours = state
        .content_store
        .find_tours(&TourQuery::new(TourFilter::Featured).limit(FEATURED_LIMIT))
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    Ok(tours
        .iter()
        .map(|t| TourSummary::from_tour(t, &state.images))
        .collect())
}

#[component]
pub fn FeaturedTours() -> impl IntoView {
    let tours = Resource::new(|| (), |_| async move { featured_tours().await });

    view! {
        <section class="featured-tours">
            <h2>"Featured tours"</h2>
            <Suspense fallback=|| view! { <p>"Loading tours..."</p> }>
                {move || tours.get().map(|res| match res {
                    Ok(tours) => view! { <TourGrid tours/> }.into_any(),
                    Err(e) => view! { <p class="error">"Error loading tours: " {e.to_string()}</p> }.into_any(),
                })}
            </Suspense>
        </section>
    }
}

#[component]
pub fn TourDetail(data: TourPageData) -> impl IntoView {
    let TourPageData {
        tour,
        meta,
        json_ld,
        hero_image,
        gallery,
    } = data;
    let category = tour.primary_category().cloned();

    view! {
        <PageHead meta/>
        <JsonLd payload=json_ld/>
        <article class="tour-detail">
            {category.map(|c| view! {
                <nav class="breadcrumb">
                    <a href="/categories">"Destinations"</a>
                    " / "
                    <a href=format!("/category/{}", c.slug)>{c.title}</a>
                </nav>
            })}
            <h1>{tour.title.clone()}</h1>
            {hero_image.map(|src| view! { <img class="tour-hero" src=src alt=tour.title.clone()/> })}
            <ul class="tour-facts">
                {tour.details.duration.clone().map(|d| view! { <li>"Duration: " {d}</li> })}
                {tour.details.price_label().map(|p| view! { <li>"From " {p}</li> })}
                {tour.rating.map(|r| view! {
                    <li>{format!("Rated {:.1}/5 from {} reviews", r.score, r.review_count)}</li>
                })}
                {tour.free_cancellation.then(|| view! { <li>"Free cancellation"</li> })}
            </ul>
            {tour.description.clone().map(|d| view! { <p class="tour-description">{d}</p> })}
            {(!tour.features.is_empty()).then(|| view! {
                <ul class="tour-features">
                    {tour.features.clone().into_iter().map(|f| view! { <li>{f}</li> }).collect_view()}
                </ul>
            })}
            <div class="tour-gallery">
                {gallery.into_iter().map(|src| view! { <img src=src loading="lazy" alt=""/> }).collect_view()}
            </div>
        </article>
    }
}
