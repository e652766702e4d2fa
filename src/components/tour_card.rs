use leptos::prelude::*;
use serde::{Deserialize, Serialize};

use crate::media::images::ImageUrlBuilder;
use crate::models::category::Category;
use crate::models::tour::Tour;

const CARD_IMAGE_WIDTH: u32 = 640;

/// What a listing card needs to know about a tour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourSummary {
    pub title: String,
    pub path: String,
    pub country: Option<String>,
    pub duration: Option<String>,
    pub price: Option<String>,
    pub rating: Option<(f64, u32)>,
    pub image_url: Option<String>,
    pub image_alt: String,
    pub free_cancellation: bool,
}

impl TourSummary {
    pub fn from_tour(tour: &Tour, images: &ImageUrlBuilder) -> Self {
        let image = tour.main_image.as_ref();
        Self {
            title: tour.title.clone(),
            path: tour.path(),
            country: tour.country().map(str::to_string),
            duration: tour.details.duration.clone(),
            price: tour.details.price_label(),
            rating: tour.rating.map(|r| (r.score, r.review_count)),
            image_url: image.and_then(|i| images.url(&i.asset_ref, CARD_IMAGE_WIDTH)),
            image_alt: image
                .and_then(|i| i.alt.clone())
                .unwrap_or_else(|| tour.title.clone()),
            free_cancellation: tour.free_cancellation,
        }
    }
}

#[component]
pub fn TourCard(tour: TourSummary) -> impl IntoView {
    view! {
        <article class="tour-card">
            <a href=tour.path.clone()>
                {tour.image_url.clone().map(|src| view! {
                    <img src=src alt=tour.image_alt.clone() loading="lazy" width=CARD_IMAGE_WIDTH.to_string()/>
                })}
                <h3>{tour.title.clone()}</h3>
            </a>
            {tour.country.clone().map(|c| view! { <p class="tour-country">{c}</p> })}
            <ul class="tour-facts">
                {tour.duration.clone().map(|d| view! { <li>{d}</li> })}
                {tour.rating.map(|(score, count)| view! {
                    <li class="tour-rating">{format!("{score:.1} ({count} reviews)")}</li>
                })}
                {tour.free_cancellation.then(|| view! { <li>"Free cancellation"</li> })}
            </ul>
            {tour.price.clone().map(|p| view! { <p class="tour-price">"From " {p}</p> })}
        </article>
    }
}

#[component]
pub fn TourGrid(tours: Vec<TourSummary>) -> impl IntoView {
    view! {
        <div class="tour-grid">
            {tours.into_iter().map(|tour| view! { <TourCard tour/> }).collect_view()}
        </div>
    }
}

#[component]
pub fn CategoryList(categories: Vec<Category>) -> impl IntoView {
    view! {
        <ul class="category-list">
            {categories.into_iter().map(|category| view! {
                <li>
                    <a href=category.path()>{category.title.clone()}</a>
                    {category.country.clone().map(|c| view! { <span class="category-country">{c}</span> })}
                    <span class="category-count">{format!("{} tours", category.tour_count)}</span>
                </li>
            }).collect_view()}
        </ul>
    }
}
