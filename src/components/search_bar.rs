use leptos::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::tour_card::{CategoryList, TourGrid, TourSummary};
use crate::models::category::Category;
use crate::search::aggregator::normalize_query;

/// Search results as rendered by the UI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchView {
    pub tours: Vec<TourSummary>,
    pub categories: Vec<Category>,
    pub error: Option<String>,
}

#[cfg(feature = "ssr")]
async fn run_search(
    q: String,
    policy: &crate::search::aggregator::SearchPolicy,
) -> Result<SearchView, ServerFnError> {
    let state = crate::app::app_state()?;
    let response =
        crate::search::aggregator::search(state.content_store.as_ref(), Some(&q), policy).await;

    Ok(SearchView {
        tours: response
            .tours
            .iter()
            .map(|t| TourSummary::from_tour(t, &state.images))
            .collect(),
        categories: response.categories,
        error: response.error,
    })
}

#[server]
pub async fn instant_search(q: String) -> Result<SearchView, ServerFnError> {
    run_search(q, &crate::search::aggregator::SearchPolicy::INSTANT).await
}

#[server]
pub async fn search_results(q: String) -> Result<SearchView, ServerFnError> {
    run_search(q, &crate::search::aggregator::SearchPolicy::RESULTS_PAGE).await
}

#[component]
pub fn SearchBar() -> impl IntoView {
    let (query, set_query) = signal(String::new());

    let results = Resource::new(
        move || query.get(),
        |q| async move {
            if normalize_query(Some(&q)).is_none() {
                return Ok(SearchView::default());
            }
            instant_search(q).await
        },
    );

    view! {
        <form class="search-container" action="/search" method="get">
            <input
                type="search"
                name="q"
                placeholder="Search tours and destinations..."
                autocomplete="off"
                on:input=move |ev| set_query.set(event_target_value(&ev))
                prop:value=query
            />
            <div class="search-results">
                <Transition fallback=|| ()>
                    {move || results.get().map(|res| match res {
                        Ok(found) if found.error.is_some() => {
                            view! { <p class="error">{found.error}</p> }.into_any()
                        }
                        Ok(found) => {
                            let searched = normalize_query(Some(&query.get())).is_some();
                            if found.tours.is_empty() && found.categories.is_empty() {
                                if searched {
                                    view! { <p>"No results found."</p> }.into_any()
                                } else {
                                    ().into_any()
                                }
                            } else {
                                view! {
                                    <ul class="search-suggestions">
                                        {found.tours.into_iter().map(|tour| view! {
                                            <li><a href=tour.path>{tour.title}</a></li>
                                        }).collect_view()}
                                    </ul>
                                    <CategoryList categories=found.categories/>
                                }.into_any()
                            }
                        }
                        Err(e) => view! { <p class="error">"Search error: " {e.to_string()}</p> }.into_any(),
                    })}
                </Transition>
            </div>
        </form>
    }
}

/// Full results listing for `/search?q=`.
#[component]
pub fn SearchResults(query: String) -> impl IntoView {
    let heading = format!("Results for \"{}\"", query.trim());
    let results = Resource::new(
        move || query.clone(),
        |q| async move {
            if normalize_query(Some(&q)).is_none() {
                return Ok(SearchView::default());
            }
            search_results(q).await
        },
    );

    view! {
        <h1>{heading}</h1>
        <Suspense fallback=|| view! { <p>"Searching..."</p> }>
            {move || results.get().map(|res| match res {
                Ok(found) if found.error.is_some() => {
                    view! { <p class="error">{found.error}</p> }.into_any()
                }
                Ok(found) if found.tours.is_empty() && found.categories.is_empty() => {
                    view! { <p>"No tours match your search."</p> }.into_any()
                }
                Ok(found) => view! {
                    <CategoryList categories=found.categories/>
                    <TourGrid tours=found.tours/>
                }.into_any(),
                Err(e) => view! { <p class="error">"Search error: " {e.to_string()}</p> }.into_any(),
            })}
        </Suspense>
    }
}
