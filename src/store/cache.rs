//! Read-through cache in front of a content store.
//!
//! Results are kept for a fixed time window and then dropped; nothing is
//! invalidated explicitly, so editors see their changes after at most one
//! window. Errors are never cached.

use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;

use crate::error::AppError;
use crate::models::category::Category;
use crate::models::page::Page;
use crate::models::tour::Tour;
use crate::store::client::{CategoryQuery, ContentStore, TourQuery};

/// Default time window during which a query result is served from memory.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

const MAX_ENTRIES_PER_KIND: u64 = 1_000;

pub struct CachedContentStore {
    inner: Arc<dyn ContentStore>,
    tours: Cache<TourQuery, Vec<Tour>>,
    categories: Cache<CategoryQuery, Vec<Category>>,
    tour_by_slug: Cache<String, Option<Tour>>,
    category_by_slug: Cache<String, Option<Category>>,
    page_by_slug: Cache<String, Option<Page>>,
}

fn build_cache<K, V>(ttl: Duration) -> Cache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    Cache::builder()
        .max_capacity(MAX_ENTRIES_PER_KIND)
        .time_to_live(ttl)
        .build()
}

async fn read_through<K, V, F>(cache: &Cache<K, V>, key: K, fetch: F) -> Result<V, AppError>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    F: Future<Output = Result<V, AppError>>,
{
    if let Some(hit) = cache.get(&key).await {
        return Ok(hit);
    }

    let value = fetch.await?;
    cache.insert(key, value.clone()).await;
    Ok(value)
}

impl CachedContentStore {
    pub fn new(inner: Arc<dyn ContentStore>, ttl: Duration) -> Self {
        tracing::info!(ttl_secs = ttl.as_secs(), "Content store cache enabled");
        Self {
            inner,
            tours: build_cache(ttl),
            categories: build_cache(ttl),
            tour_by_slug: build_cache(ttl),
            category_by_slug: build_cache(ttl),
            page_by_slug: build_cache(ttl),
        }
    }
}

#[async_trait]
impl ContentStore for CachedContentStore {
    async fn find_tours(&self, query: &TourQuery) -> Result<Vec<Tour>, AppError> {
        read_through(&self.tours, query.clone(), self.inner.find_tours(query)).await
    }

    async fn find_categories(&self, query: &CategoryQuery) -> Result<Vec<Category>, AppError> {
        read_through(
            &self.categories,
            query.clone(),
            self.inner.find_categories(query),
        )
        .await
    }

    async fn tour_by_slug(&self, slug: &str) -> Result<Option<Tour>, AppError> {
        read_through(&self.tour_by_slug, slug.to_string(), self.inner.tour_by_slug(slug)).await
    }

    async fn category_by_slug(&self, slug: &str) -> Result<Option<Category>, AppError> {
        read_through(
            &self.category_by_slug,
            slug.to_string(),
            self.inner.category_by_slug(slug),
        )
        .await
    }

    async fn page_by_slug(&self, slug: &str) -> Result<Option<Page>, AppError> {
        read_through(&self.page_by_slug, slug.to_string(), self.inner.page_by_slug(slug)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::client::{MockContentStore, TourFilter};

    fn tour(id: &str) -> Tour {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": format!("Tour {id}"),
            "slug": id,
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_second_identical_query_is_served_from_cache() {
        let mut mock = MockContentStore::new();
        mock.expect_find_tours()
            .times(1)
            .returning(|_| Ok(vec![tour("t-1")]));

        let store = CachedContentStore::new(Arc::new(mock), DEFAULT_CACHE_TTL);
        let query = TourQuery::new(TourFilter::Title("colosseum".into()));

        let first = store.find_tours(&query).await.unwrap();
        let second = store.find_tours(&query).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_different_queries_are_cached_independently() {
        let mut mock = MockContentStore::new();
        mock.expect_find_tours()
            .times(2)
            .returning(|q| match &q.filter {
                TourFilter::Title(text) => Ok(vec![tour(text)]),
                _ => Ok(vec![]),
            });

        let store = CachedContentStore::new(Arc::new(mock), DEFAULT_CACHE_TTL);
        let a = store
            .find_tours(&TourQuery::new(TourFilter::Title("a".into())))
            .await
            .unwrap();
        let b = store
            .find_tours(&TourQuery::new(TourFilter::Title("b".into())))
            .await
            .unwrap();
        assert_eq!(a[0].id, "a");
        assert_eq!(b[0].id, "b");
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let mut mock = MockContentStore::new();
        mock.expect_page_by_slug()
            .times(2)
            .returning(|_| Err(AppError::Database("timeout".into())));

        let store = CachedContentStore::new(Arc::new(mock), DEFAULT_CACHE_TTL);
        assert!(store.page_by_slug("about-us").await.is_err());
        assert!(store.page_by_slug("about-us").await.is_err());
    }

    #[tokio::test]
    async fn test_missing_records_are_cached() {
        let mut mock = MockContentStore::new();
        mock.expect_tour_by_slug().times(1).returning(|_| Ok(None));

        let store = CachedContentStore::new(Arc::new(mock), DEFAULT_CACHE_TTL);
        assert!(store.tour_by_slug("gone").await.unwrap().is_none());
        assert!(store.tour_by_slug("gone").await.unwrap().is_none());
    }
}
