use leptos::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::head::{JsonLd, PageHead};
use crate::components::tour_card::{CategoryList, TourGrid, TourSummary};
use crate::models::category::Category;
use crate::seo::meta::PageMeta;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryPageData {
    pub category: Category,
    pub tours: Vec<TourSummary>,
    pub meta: PageMeta,
    pub json_ld: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryIndexData {
    pub categories: Vec<Category>,
    pub meta: PageMeta,
}

#[server]
pub async fn get_category(slug: String) -> Result<Option<CategoryPageData>, ServerFnError> {
    use crate::seo::meta::category_json_ld;
    use crate::seo::schema::to_script_payload;
    use crate::store::client::TourQuery;

    let state = crate::app::app_state()?;
    let Some(category) = state
        .content_store
        .category_by_slug(&slug)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?
    else {
        return Ok(None);
    };

    let tours = state
        .content_store
        .find_tours(&TourQuery::for_category(&category))
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    let image = category
        .image
        .as_ref()
        .and_then(|i| state.images.url(&i.asset_ref, 1200));
    let meta = PageMeta::for_category(&category, &state.site, image);
    let json_ld = to_script_payload(&category_json_ld(&category, &tours, &state.site));
    let tours = tours
        .iter()
        .map(|t| TourSummary::from_tour(t, &state.images))
        .collect();

    Ok(Some(CategoryPageData {
        category,
        tours,
        meta,
        json_ld,
    }))
}

#[server]
pub async fn list_categories() -> Result<CategoryIndexData, ServerFnError> {
    use crate::store::client::{CategoryFilter, CategoryQuery};

    let state = crate::app::app_state()?;
    let categories = state
        .content_store
        .find_categories(&CategoryQuery::new(CategoryFilter::All))
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    let meta = PageMeta::for_listing(
        "Destinations",
        &format!("Browse tours in {} destinations.", categories.len()),
        "/categories",
        &state.site,
    );

    Ok(CategoryIndexData { categories, meta })
}

#[component]
pub fn CategoryIndex(data: CategoryIndexData) -> impl IntoView {
    view! {
        <PageHead meta=data.meta/>
        <h1>"Destinations"</h1>
        <CategoryList categories=data.categories/>
    }
}

#[component]
pub fn CategoryDetail(data: CategoryPageData) -> impl IntoView {
    let CategoryPageData {
        category,
        tours,
        meta,
        json_ld,
    } = data;

    view! {
        <PageHead meta/>
        <JsonLd payload=json_ld/>
        <section class="category-detail">
            <h1>{format!("Tours in {}", category.title)}</h1>
            {category.description.clone().map(|d| view! { <p>{d}</p> })}
            {if tours.is_empty() {
                view! { <p>"No tours in this destination yet."</p> }.into_any()
            } else {
                view! { <TourGrid tours/> }.into_any()
            }}
        </section>
    }
}
