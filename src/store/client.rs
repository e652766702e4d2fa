use async_trait::async_trait;

use crate::error::AppError;
use crate::models::category::Category;
use crate::models::page::Page;
use crate::models::tour::Tour;

/// Which tours a [`TourQuery`] selects.
///
/// Text filters are case-insensitive substring matches; `Country` is a
/// case-insensitive equality match against any of the tour's category
/// references.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TourFilter {
    All,
    Featured,
    /// Tours whose title contains the text.
    Title(String),
    /// Tours whose title, or any referenced category's title or country,
    /// contains the text.
    TitleOrCategory(String),
    /// Tours with at least one category in the given country.
    Country(String),
    /// Tours referencing the category with the given slug.
    Category(String),
}

/// Result ordering for tour queries. Ties keep the store's natural order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TourOrder {
    /// Highest rating score first; unrated tours last.
    #[default]
    RatingDesc,
    /// Most recently published first; undated tours last.
    Newest,
}

/// A typed tour query, translated by each store into its own query language.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TourQuery {
    pub filter: TourFilter,
    /// Tour ids that must not appear in the result.
    pub exclude_ids: Vec<String>,
    pub order: TourOrder,
    pub limit: usize,
}

impl TourQuery {
    pub const DEFAULT_LIMIT: usize = 50;

    pub fn new(filter: TourFilter) -> Self {
        Self {
            filter,
            exclude_ids: Vec::new(),
            order: TourOrder::default(),
            limit: Self::DEFAULT_LIMIT,
        }
    }

    /// Every tour listed under a category.
    ///
    /// Sized from the category's derived `tour_count` so the listing never
    /// falls short of the count reported in its metadata.
    pub fn for_category(category: &Category) -> Self {
        let limit = usize::try_from(category.tour_count).unwrap_or(usize::MAX);
        Self::new(TourFilter::Category(category.slug.clone()))
            .limit(limit.max(Self::DEFAULT_LIMIT))
    }

    pub fn order(mut self, order: TourOrder) -> Self {
        self.order = order;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn excluding(mut self, ids: Vec<String>) -> Self {
        self.exclude_ids = ids;
        self
    }
}

/// Which categories a [`CategoryQuery`] selects.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    All,
    /// Categories whose title contains the text.
    Title(String),
    /// Categories whose title contains the text, or whose country equals it
    /// (both case-insensitive).
    TitleOrCountry(String),
}

/// A typed category query. Results are ordered by title.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategoryQuery {
    pub filter: CategoryFilter,
    pub limit: Option<usize>,
}

impl CategoryQuery {
    pub fn new(filter: CategoryFilter) -> Self {
        Self {
            filter,
            limit: None,
        }
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Read-only access to the remote content store.
///
/// Every record returned is a snapshot; the store owns all mutation.
/// Abstracted as a trait so the aggregators can be tested without a
/// database.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Run a tour query.
    async fn find_tours(&self, query: &TourQuery) -> Result<Vec<Tour>, AppError>;

    /// Run a category query. `tour_count` is filled on every result.
    async fn find_categories(&self, query: &CategoryQuery) -> Result<Vec<Category>, AppError>;

    /// Find a tour by its slug.
    async fn tour_by_slug(&self, slug: &str) -> Result<Option<Tour>, AppError>;

    /// Find a category by its slug, with its derived tour count.
    async fn category_by_slug(&self, slug: &str) -> Result<Option<Category>, AppError>;

    /// Find a content page by its slug.
    async fn page_by_slug(&self, slug: &str) -> Result<Option<Page>, AppError>;
}
