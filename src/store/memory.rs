use std::cmp::Ordering;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::category::Category;
use crate::models::page::Page;
use crate::models::tour::Tour;
use crate::store::client::{
    CategoryFilter, CategoryQuery, ContentStore, TourFilter, TourOrder, TourQuery,
};

/// A full export of the content store, as written by the fixture files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentSnapshot {
    #[serde(default)]
    pub tours: Vec<Tour>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub pages: Vec<Page>,
}

/// Content store backed by an in-memory snapshot.
///
/// Implements the same query semantics as the MongoDB store and is used for
/// local development against a fixture file.
pub struct InMemoryContentStore {
    snapshot: ContentSnapshot,
}

impl InMemoryContentStore {
    pub fn new(snapshot: ContentSnapshot) -> Self {
        Self { snapshot }
    }

    /// Load a snapshot from a JSON fixture file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read fixture '{}': {e}", path.display()))
        })?;
        let snapshot: ContentSnapshot = serde_json::from_str(&raw).map_err(|e| {
            AppError::Config(format!("Invalid fixture '{}': {e}", path.display()))
        })?;

        tracing::info!(
            tours = snapshot.tours.len(),
            categories = snapshot.categories.len(),
            pages = snapshot.pages.len(),
            "Loaded content fixture from {}",
            path.display()
        );

        Ok(Self::new(snapshot))
    }

    fn tour_count(&self, category_id: &str) -> u32 {
        let count = self
            .snapshot
            .tours
            .iter()
            .filter(|t| t.categories.iter().any(|c| c.id == category_id))
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    fn with_count(&self, category: &Category) -> Category {
        Category {
            tour_count: self.tour_count(&category.id),
            ..category.clone()
        }
    }
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

fn eq_ci(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn tour_matches(filter: &TourFilter, tour: &Tour) -> bool {
    match filter {
        TourFilter::All => true,
        TourFilter::Featured => tour.featured,
        TourFilter::Title(text) => contains_ci(&tour.title, &text.to_lowercase()),
        TourFilter::TitleOrCategory(text) => {
            let needle = text.to_lowercase();
            contains_ci(&tour.title, &needle)
                || tour.categories.iter().any(|c| {
                    contains_ci(&c.title, &needle)
                        || c.country.as_deref().is_some_and(|country| contains_ci(country, &needle))
                })
        }
        TourFilter::Country(country) => tour
            .categories
            .iter()
            .any(|c| c.country.as_deref().is_some_and(|value| eq_ci(value, country))),
        TourFilter::Category(slug) => tour.categories.iter().any(|c| &c.slug == slug),
    }
}

fn category_matches(filter: &CategoryFilter, category: &Category) -> bool {
    match filter {
        CategoryFilter::All => true,
        CategoryFilter::Title(text) => contains_ci(&category.title, &text.to_lowercase()),
        CategoryFilter::TitleOrCountry(text) => {
            contains_ci(&category.title, &text.to_lowercase())
                || category
                    .country
                    .as_deref()
                    .is_some_and(|country| eq_ci(country, text))
        }
    }
}

fn compare_tours(order: TourOrder, a: &Tour, b: &Tour) -> Ordering {
    match order {
        TourOrder::RatingDesc => b
            .rating_score()
            .partial_cmp(&a.rating_score())
            .unwrap_or(Ordering::Equal),
        TourOrder::Newest => match (a.published_at, b.published_at) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn find_tours(&self, query: &TourQuery) -> Result<Vec<Tour>, AppError> {
        let mut tours: Vec<Tour> = self
            .snapshot
            .tours
            .iter()
            .filter(|t| !query.exclude_ids.contains(&t.id))
            .filter(|t| tour_matches(&query.filter, t))
            .cloned()
            .collect();

        tours.sort_by(|a, b| compare_tours(query.order, a, b));
        tours.truncate(query.limit);
        Ok(tours)
    }

    async fn find_categories(&self, query: &CategoryQuery) -> Result<Vec<Category>, AppError> {
        let mut categories: Vec<Category> = self
            .snapshot
            .categories
            .iter()
            .filter(|c| category_matches(&query.filter, c))
            .map(|c| self.with_count(c))
            .collect();

        categories.sort_by(|a, b| a.title.cmp(&b.title));
        if let Some(limit) = query.limit {
            categories.truncate(limit);
        }
        Ok(categories)
    }

    async fn tour_by_slug(&self, slug: &str) -> Result<Option<Tour>, AppError> {
        Ok(self.snapshot.tours.iter().find(|t| t.slug == slug).cloned())
    }

    async fn category_by_slug(&self, slug: &str) -> Result<Option<Category>, AppError> {
        Ok(self
            .snapshot
            .categories
            .iter()
            .find(|c| c.slug == slug)
            .map(|c| self.with_count(c)))
    }

    async fn page_by_slug(&self, slug: &str) -> Result<Option<Page>, AppError> {
        Ok(self.snapshot.pages.iter().find(|p| p.slug == slug).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::category::CategoryRef;
    use crate::models::tour::{Rating, TourDetails};
    use chrono::{TimeZone, Utc};

    fn category_ref(id: &str, title: &str, country: &str) -> CategoryRef {
        CategoryRef {
            id: id.to_string(),
            title: title.to_string(),
            slug: title.to_lowercase(),
            country: Some(country.to_string()),
        }
    }

    fn tour(id: &str, title: &str, score: Option<f64>, category: CategoryRef) -> Tour {
        Tour {
            id: id.to_string(),
            title: title.to_string(),
            slug: id.to_string(),
            description: None,
            main_image: None,
            gallery: vec![],
            details: TourDetails::default(),
            features: vec![],
            featured: false,
            free_cancellation: false,
            rating: score.map(|score| Rating {
                score,
                review_count: 10,
            }),
            categories: vec![category],
            published_at: None,
        }
    }

    fn store() -> InMemoryContentStore {
        let rome = category_ref("c-rome", "Rome", "Italy");
        let florence = category_ref("c-florence", "Florence", "Italy");
        let paris = category_ref("c-paris", "Paris", "France");

        let mut uffizi = tour("t-uffizi", "Uffizi Gallery", Some(4.9), florence.clone());
        uffizi.published_at = Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap());
        let mut colosseum = tour("t-colosseum", "Colosseum Arena", Some(4.5), rome.clone());
        colosseum.published_at = Some(Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap());

        InMemoryContentStore::new(ContentSnapshot {
            tours: vec![
                colosseum,
                tour("t-vatican", "Vatican Museums", Some(4.8), rome.clone()),
                uffizi,
                tour("t-louvre", "Louvre Highlights", None, paris.clone()),
            ],
            categories: vec![
                Category {
                    id: "c-rome".into(),
                    title: "Rome".into(),
                    slug: "rome".into(),
                    country: Some("Italy".into()),
                    description: None,
                    image: None,
                    tour_count: 0,
                },
                Category {
                    id: "c-paris".into(),
                    title: "Paris".into(),
                    slug: "paris".into(),
                    country: Some("France".into()),
                    description: None,
                    image: None,
                    tour_count: 0,
                },
            ],
            pages: vec![],
        })
    }

    #[tokio::test]
    async fn test_title_or_category_matches_category_title() {
        let store = store();
        let tours = store
            .find_tours(&TourQuery::new(TourFilter::TitleOrCategory("ROME".into())))
            .await
            .unwrap();
        let ids: Vec<&str> = tours.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t-vatican", "t-colosseum"]);
    }

    #[tokio::test]
    async fn test_title_or_category_matches_country() {
        let store = store();
        let tours = store
            .find_tours(&TourQuery::new(TourFilter::TitleOrCategory("ital".into())))
            .await
            .unwrap();
        assert_eq!(tours.len(), 3);
        assert_eq!(tours[0].id, "t-uffizi");
    }

    #[tokio::test]
    async fn test_country_filter_excludes_ids_and_limits() {
        let store = store();
        let query = TourQuery::new(TourFilter::Country("italy".into()))
            .excluding(vec!["t-uffizi".into()])
            .limit(1);
        let tours = store.find_tours(&query).await.unwrap();
        assert_eq!(tours.len(), 1);
        assert_eq!(tours[0].id, "t-vatican");
    }

    #[tokio::test]
    async fn test_unrated_tours_sort_last() {
        let store = store();
        let tours = store
            .find_tours(&TourQuery::new(TourFilter::All))
            .await
            .unwrap();
        assert_eq!(tours.last().unwrap().id, "t-louvre");
    }

    #[tokio::test]
    async fn test_newest_order() {
        let store = store();
        let tours = store
            .find_tours(&TourQuery::new(TourFilter::All).order(TourOrder::Newest))
            .await
            .unwrap();
        assert_eq!(tours[0].id, "t-colosseum");
        assert_eq!(tours[1].id, "t-uffizi");
    }

    #[tokio::test]
    async fn test_categories_have_derived_counts() {
        let store = store();
        let categories = store
            .find_categories(&CategoryQuery::new(CategoryFilter::All))
            .await
            .unwrap();
        let titles: Vec<&str> = categories.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Paris", "Rome"]);
        assert_eq!(categories[0].tour_count, 1);
        assert_eq!(categories[1].tour_count, 2);
    }

    #[tokio::test]
    async fn test_category_country_is_exact_match() {
        let store = store();
        let exact = store
            .find_categories(&CategoryQuery::new(CategoryFilter::TitleOrCountry(
                "france".into(),
            )))
            .await
            .unwrap();
        assert_eq!(exact.len(), 1);

        let partial = store
            .find_categories(&CategoryQuery::new(CategoryFilter::TitleOrCountry(
                "fra".into(),
            )))
            .await
            .unwrap();
        assert!(partial.is_empty());
    }

    #[tokio::test]
    async fn test_lookup_by_slug() {
        let store = store();
        assert!(store.tour_by_slug("t-louvre").await.unwrap().is_some());
        assert!(store.tour_by_slug("missing").await.unwrap().is_none());
        let rome = store.category_by_slug("rome").await.unwrap().unwrap();
        assert_eq!(rome.tour_count, 2);
        assert!(store.page_by_slug("about-us").await.unwrap().is_none());
    }

    #[test]
    fn test_missing_fixture_is_config_error() {
        let result = InMemoryContentStore::from_json_file("/nonexistent/fixture.json");
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
