use crate::error::AppError;
use crate::models::category::Category;
use crate::models::search::SearchResponse;
use crate::models::tour::Tour;
use crate::store::client::{
    CategoryFilter, CategoryQuery, ContentStore, TourFilter, TourOrder, TourQuery,
};

/// Queries shorter than this (in characters, after trimming) never reach the store.
pub const MIN_QUERY_CHARS: usize = 2;

/// Message returned to clients when the store fails; details go to the log.
pub const SEARCH_UNAVAILABLE: &str = "Search is temporarily unavailable";

/// Which tour fields a search query is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourMatch {
    TitleOnly,
    /// Tour title, plus the titles and countries of its categories.
    TitleOrCategory,
}

/// Which category fields a search query is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryMatch {
    TitleOnly,
    /// Category title (contains) or country (equals).
    TitleOrCountry,
}

/// Matching, ordering and capping rules for one search surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchPolicy {
    pub tour_match: TourMatch,
    pub category_match: CategoryMatch,
    pub order: TourOrder,
    pub max_tours: usize,
    pub max_categories: usize,
    /// Top up an under-filled tour list with tours from the first hit's country.
    pub fallback_fill: bool,
}

impl SearchPolicy {
    /// The instant search behind `GET /api/search`.
    pub const INSTANT: Self = Self {
        tour_match: TourMatch::TitleOrCategory,
        category_match: CategoryMatch::TitleOrCountry,
        order: TourOrder::RatingDesc,
        max_tours: 8,
        max_categories: 5,
        fallback_fill: true,
    };

    /// The full results listing rendered on `/search`.
    pub const RESULTS_PAGE: Self = Self {
        tour_match: TourMatch::TitleOnly,
        category_match: CategoryMatch::TitleOnly,
        order: TourOrder::Newest,
        max_tours: 30,
        max_categories: 5,
        fallback_fill: false,
    };

    fn tour_query(&self, needle: &str) -> TourQuery {
        let filter = match self.tour_match {
            TourMatch::TitleOnly => TourFilter::Title(needle.to_string()),
            TourMatch::TitleOrCategory => TourFilter::TitleOrCategory(needle.to_string()),
        };
        TourQuery::new(filter)
            .order(self.order)
            .limit(self.max_tours)
    }

    fn category_query(&self, needle: &str) -> CategoryQuery {
        let filter = match self.category_match {
            CategoryMatch::TitleOnly => CategoryFilter::Title(needle.to_string()),
            CategoryMatch::TitleOrCountry => CategoryFilter::TitleOrCountry(needle.to_string()),
        };
        CategoryQuery::new(filter).limit(self.max_categories)
    }
}

/// Normalize a raw query; `None` if it is too short to search for.
pub fn normalize_query(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    if trimmed.chars().count() < MIN_QUERY_CHARS {
        return None;
    }
    Some(trimmed.to_string())
}

/// Search tours and categories for `raw_query` under the given policy.
///
/// Never fails: short queries yield an empty response without touching the
/// store, and store errors are logged and turned into an empty response
/// carrying an error message.
pub async fn search(
    store: &dyn ContentStore,
    raw_query: Option<&str>,
    policy: &SearchPolicy,
) -> SearchResponse {
    let Some(query) = normalize_query(raw_query) else {
        return SearchResponse::empty();
    };

    let needle = query.to_lowercase();
    let (tours, categories) = futures::future::join(
        search_tours(store, &needle, policy),
        search_categories(store, &query, policy),
    )
    .await;

    match (tours, categories) {
        (Ok(tours), Ok(categories)) => {
            tracing::debug!(
                query = %query,
                tours = tours.len(),
                categories = categories.len(),
                "Search completed"
            );
            SearchResponse {
                tours,
                categories,
                query: raw_query.map(str::to_string),
                error: None,
            }
        }
        (Err(e), _) | (_, Err(e)) => {
            tracing::error!(query = %query, "Search failed: {e}");
            SearchResponse::failed(SEARCH_UNAVAILABLE)
        }
    }
}

async fn search_tours(
    store: &dyn ContentStore,
    needle: &str,
    policy: &SearchPolicy,
) -> Result<Vec<Tour>, AppError> {
    let mut tours = store.find_tours(&policy.tour_query(needle)).await?;
    tours.truncate(policy.max_tours);

    if policy.fallback_fill && !tours.is_empty() && tours.len() < policy.max_tours {
        let extra = fallback_fill(store, &tours, policy).await?;
        append_unique(&mut tours, extra);
        tours.truncate(policy.max_tours);
    }

    Ok(tours)
}

/// Fetch tours from the first primary hit's country, excluding every id
/// already present, to fill the remaining slots.
async fn fallback_fill(
    store: &dyn ContentStore,
    primary: &[Tour],
    policy: &SearchPolicy,
) -> Result<Vec<Tour>, AppError> {
    let Some(country) = primary.first().and_then(Tour::country) else {
        return Ok(Vec::new());
    };

    let remaining = policy.max_tours - primary.len();
    let exclude_ids = primary.iter().map(|t| t.id.clone()).collect();
    let query = TourQuery::new(TourFilter::Country(country.to_string()))
        .order(policy.order)
        .limit(remaining)
        .excluding(exclude_ids);

    tracing::debug!(country, remaining, "Filling search results from same country");
    let mut extra = store.find_tours(&query).await?;
    extra.truncate(remaining);
    Ok(extra)
}

fn append_unique(tours: &mut Vec<Tour>, extra: Vec<Tour>) {
    for tour in extra {
        if !tours.iter().any(|t| t.id == tour.id) {
            tours.push(tour);
        }
    }
}

async fn search_categories(
    store: &dyn ContentStore,
    query: &str,
    policy: &SearchPolicy,
) -> Result<Vec<Category>, AppError> {
    let mut categories = store
        .find_categories(&policy.category_query(query))
        .await?;
    categories.truncate(policy.max_categories);
    Ok(categories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::client::MockContentStore;

    fn tour(id: &str, country: Option<&str>) -> Tour {
        let mut value = serde_json::json!({
            "id": id,
            "title": format!("Tour {id}"),
            "slug": id,
        });
        if let Some(country) = country {
            value["categories"] = serde_json::json!([
                {"id": "c-1", "title": "Primary", "slug": "primary", "country": country}
            ]);
        }
        serde_json::from_value(value).unwrap()
    }

    fn tours(prefix: &str, n: usize, country: Option<&str>) -> Vec<Tour> {
        (0..n).map(|i| tour(&format!("{prefix}-{i}"), country)).collect()
    }

    fn category(id: &str) -> Category {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": format!("Category {id}"),
            "slug": id,
        }))
        .unwrap()
    }

    fn is_primary(q: &TourQuery) -> bool {
        !matches!(q.filter, TourFilter::Country(_))
    }

    fn is_fallback(q: &TourQuery) -> bool {
        matches!(q.filter, TourFilter::Country(_))
    }

    fn expect_no_categories(mock: &mut MockContentStore) {
        mock.expect_find_categories().returning(|_| Ok(vec![]));
    }

    #[tokio::test]
    async fn test_short_queries_never_touch_the_store() {
        let mut mock = MockContentStore::new();
        mock.expect_find_tours().times(0);
        mock.expect_find_categories().times(0);

        for raw in [None, Some(""), Some("r"), Some("  r  "), Some("é")] {
            let response = search(&mock, raw, &SearchPolicy::INSTANT).await;
            assert_eq!(response, SearchResponse::empty());
        }
    }

    #[tokio::test]
    async fn test_empty_query_response_shape() {
        let mock = MockContentStore::new();
        let response = search(&mock, Some(""), &SearchPolicy::INSTANT).await;
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({"tours": [], "categories": []}));
    }

    #[tokio::test]
    async fn test_rome_scenario_requests_italy_fallback() {
        let mut mock = MockContentStore::new();
        mock.expect_find_tours()
            .withf(|q| is_primary(q))
            .times(1)
            .returning(|q| {
                assert_eq!(q.filter, TourFilter::TitleOrCategory("rome".into()));
                assert_eq!(q.limit, 8);
                assert_eq!(q.order, TourOrder::RatingDesc);
                Ok(tours("rome", 3, Some("Italy")))
            });
        mock.expect_find_tours()
            .withf(|q| {
                q.filter == TourFilter::Country("Italy".into())
                    && q.order == TourOrder::RatingDesc
                    && q.limit == 5
                    && q.exclude_ids == vec!["rome-0", "rome-1", "rome-2"]
            })
            .times(1)
            .returning(|_| Ok(tours("italy", 5, Some("Italy"))));
        expect_no_categories(&mut mock);

        let response = search(&mock, Some("rome"), &SearchPolicy::INSTANT).await;
        assert_eq!(response.tours.len(), 8);
        assert_eq!(response.tours[0].id, "rome-0");
        assert_eq!(response.tours[3].id, "italy-0");
        assert_eq!(response.query.as_deref(), Some("rome"));
        assert!(response.error.is_none());
    }

    #[tokio::test]
    async fn test_query_is_lowercased_for_tours_and_trimmed() {
        let mut mock = MockContentStore::new();
        mock.expect_find_tours()
            .withf(|q| q.filter == TourFilter::TitleOrCategory("rome".into()))
            .times(1)
            .returning(|_| Ok(vec![]));
        mock.expect_find_categories()
            .withf(|q| q.filter == CategoryFilter::TitleOrCountry("Rome".into()))
            .times(1)
            .returning(|_| Ok(vec![]));

        let response = search(&mock, Some("  Rome "), &SearchPolicy::INSTANT).await;
        assert_eq!(response.query.as_deref(), Some("  Rome "));
    }

    #[tokio::test]
    async fn test_fallback_bounds_for_every_partial_primary_count() {
        for primary_count in 1..8 {
            let mut mock = MockContentStore::new();
            mock.expect_find_tours()
                .withf(|q| is_primary(q))
                .times(1)
                .returning(move |_| Ok(tours("p", primary_count, Some("Italy"))));
            mock.expect_find_tours()
                .withf(|q| is_fallback(q))
                .times(1)
                .returning(move |q| {
                    assert_eq!(q.limit, 8 - primary_count);
                    assert_eq!(q.exclude_ids.len(), primary_count);
                    // A misbehaving store returning too many rows and a duplicate.
                    let mut extra = tours("f", 10, Some("Italy"));
                    extra.insert(0, tour("p-0", Some("Italy")));
                    Ok(extra)
                });
            expect_no_categories(&mut mock);

            let response = search(&mock, Some("rome"), &SearchPolicy::INSTANT).await;
            assert!(response.tours.len() <= 8);

            let primary_ids: Vec<String> = (0..primary_count).map(|i| format!("p-{i}")).collect();
            let extra: Vec<&Tour> = response.tours[primary_count..].iter().collect();
            assert!(extra.len() <= 8 - primary_count);
            assert!(extra.iter().all(|t| !primary_ids.contains(&t.id)));
        }
    }

    #[tokio::test]
    async fn test_fallback_uses_the_policy_order() {
        let policy = SearchPolicy {
            fallback_fill: true,
            max_tours: 4,
            ..SearchPolicy::RESULTS_PAGE
        };

        let mut mock = MockContentStore::new();
        mock.expect_find_tours()
            .withf(|q| is_primary(q) && q.order == TourOrder::Newest)
            .times(1)
            .returning(|_| Ok(tours("p", 1, Some("France"))));
        mock.expect_find_tours()
            .withf(|q| {
                q.filter == TourFilter::Country("France".into())
                    && q.order == TourOrder::Newest
                    && q.limit == 3
            })
            .times(1)
            .returning(|_| Ok(tours("f", 3, Some("France"))));
        expect_no_categories(&mut mock);

        let response = search(&mock, Some("louvre"), &policy).await;
        let ids: Vec<&str> = response.tours.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["p-0", "f-0", "f-1", "f-2"]);
    }

    #[tokio::test]
    async fn test_no_fallback_when_primary_is_empty_or_full() {
        for primary_count in [0usize, 8] {
            let mut mock = MockContentStore::new();
            mock.expect_find_tours()
                .withf(|q| is_primary(q))
                .times(1)
                .returning(move |_| Ok(tours("p", primary_count, Some("Italy"))));
            mock.expect_find_tours().withf(|q| is_fallback(q)).times(0);
            expect_no_categories(&mut mock);

            let response = search(&mock, Some("rome"), &SearchPolicy::INSTANT).await;
            assert_eq!(response.tours.len(), primary_count);
        }
    }

    #[tokio::test]
    async fn test_no_fallback_without_country() {
        let mut mock = MockContentStore::new();
        mock.expect_find_tours()
            .withf(|q| is_primary(q))
            .times(1)
            .returning(|_| Ok(tours("p", 2, None)));
        mock.expect_find_tours().withf(|q| is_fallback(q)).times(0);
        expect_no_categories(&mut mock);

        let response = search(&mock, Some("rome"), &SearchPolicy::INSTANT).await;
        assert_eq!(response.tours.len(), 2);
    }

    #[tokio::test]
    async fn test_categories_are_capped_at_five() {
        let mut mock = MockContentStore::new();
        mock.expect_find_tours().returning(|_| Ok(vec![]));
        mock.expect_find_categories()
            .withf(|q| q.limit == Some(5))
            .returning(|_| Ok((0..9).map(|i| category(&format!("c-{i}"))).collect()));

        let response = search(&mock, Some("italy"), &SearchPolicy::INSTANT).await;
        assert_eq!(response.categories.len(), 5);
    }

    #[tokio::test]
    async fn test_store_failure_is_absorbed() {
        let mut mock = MockContentStore::new();
        mock.expect_find_tours()
            .returning(|_| Err(AppError::Database("connection reset".into())));
        expect_no_categories(&mut mock);

        let response = search(&mock, Some("rome"), &SearchPolicy::INSTANT).await;
        assert!(response.tours.is_empty());
        assert!(response.categories.is_empty());
        assert!(response.query.is_none());
        assert_eq!(response.error.as_deref(), Some(SEARCH_UNAVAILABLE));
    }

    #[tokio::test]
    async fn test_fallback_failure_is_absorbed() {
        let mut mock = MockContentStore::new();
        mock.expect_find_tours()
            .withf(|q| is_primary(q))
            .returning(|_| Ok(tours("p", 2, Some("Italy"))));
        mock.expect_find_tours()
            .withf(|q| is_fallback(q))
            .returning(|_| Err(AppError::Database("timeout".into())));
        expect_no_categories(&mut mock);

        let response = search(&mock, Some("rome"), &SearchPolicy::INSTANT).await;
        assert!(response.tours.is_empty());
        assert!(response.error.is_some());
    }

    #[tokio::test]
    async fn test_results_page_policy() {
        let mut mock = MockContentStore::new();
        mock.expect_find_tours()
            .withf(|q| {
                q.filter == TourFilter::Title("rome".into())
                    && q.order == TourOrder::Newest
                    && q.limit == 30
            })
            .times(1)
            .returning(|_| Ok(tours("p", 3, Some("Italy"))));
        mock.expect_find_categories()
            .withf(|q| q.filter == CategoryFilter::Title("rome".into()) && q.limit == Some(5))
            .times(1)
            .returning(|_| Ok(vec![]));

        let response = search(&mock, Some("rome"), &SearchPolicy::RESULTS_PAGE).await;
        assert_eq!(response.tours.len(), 3);
    }

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query(None), None);
        assert_eq!(normalize_query(Some(" a ")), None);
        assert_eq!(normalize_query(Some(" ab ")), Some("ab".to_string()));
        assert_eq!(normalize_query(Some("ro")), Some("ro".to_string()));
    }
}
