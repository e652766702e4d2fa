use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::options::FindOptions;
use serde::de::DeserializeOwned;

use crate::error::AppError;
use crate::models::category::Category;
use crate::models::page::Page;
use crate::models::tour::Tour;
use crate::store::client::{
    CategoryFilter, CategoryQuery, ContentStore, TourFilter, TourOrder, TourQuery,
};

/// MongoDB implementation of the ContentStore.
///
/// Reads the `tours`, `categories` and `pages` collections. Records are
/// fetched as raw BSON and decoded one by one, so a single malformed record
/// is skipped instead of failing the whole query.
pub struct MongoContentStore {
    tours: mongodb::Collection<Document>,
    categories: mongodb::Collection<Document>,
    pages: mongodb::Collection<Document>,
}

impl MongoContentStore {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            tours: db.collection("tours"),
            categories: db.collection("categories"),
            pages: db.collection("pages"),
        }
    }

    /// Connect to MongoDB and open the given database.
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        let client = mongodb::Client::with_uri_str(uri)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to MongoDB: {e}")))?;
        Ok(Self::new(&client.database(database)))
    }

    async fn find_records<T: DeserializeOwned>(
        collection: &mongodb::Collection<Document>,
        filter: Document,
        options: FindOptions,
    ) -> Result<Vec<T>, AppError> {
        let mut cursor = collection
            .find(filter)
            .with_options(options)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut records = Vec::new();
        while let Some(raw) = cursor
            .try_next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            if let Some(record) = decode_record(collection.name(), raw) {
                records.push(record);
            }
        }

        Ok(records)
    }

    async fn find_one_record<T: DeserializeOwned>(
        collection: &mongodb::Collection<Document>,
        filter: Document,
    ) -> Result<Option<T>, AppError> {
        let raw = collection
            .find_one(filter)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(raw.and_then(|raw| decode_record(collection.name(), raw)))
    }

    async fn count_tours(&self, category_id: &str) -> Result<u32, AppError> {
        let count = self
            .tours
            .count_documents(doc! { "categories.id": category_id })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(saturating_count(count))
    }
}

/// Narrow a document count to the `tour_count` width, saturating.
fn saturating_count(count: u64) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

fn decode_record<T: DeserializeOwned>(collection: &str, raw: Document) -> Option<T> {
    let id = raw.get_str("id").unwrap_or("<missing id>").to_string();
    match mongodb::bson::from_document(raw) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!(collection, id = %id, "Skipping malformed record: {e}");
            None
        }
    }
}

/// Case-insensitive "contains" match.
fn contains_ci(text: &str) -> Document {
    doc! { "$regex": regex::escape(text), "$options": "i" }
}

/// Case-insensitive whole-value match.
fn equals_ci(text: &str) -> Document {
    doc! { "$regex": format!("^{}$", regex::escape(text)), "$options": "i" }
}

/// Translate a tour query into a MongoDB filter document.
pub(crate) fn tour_filter(query: &TourQuery) -> Document {
    let mut filter = match &query.filter {
        TourFilter::All => doc! {},
        TourFilter::Featured => doc! { "featured": true },
        TourFilter::Title(text) => doc! { "title": contains_ci(text) },
        TourFilter::TitleOrCategory(text) => doc! {
            "$or": [
                { "title": contains_ci(text) },
                { "categories.title": contains_ci(text) },
                { "categories.country": contains_ci(text) },
            ]
        },
        TourFilter::Country(country) => doc! { "categories.country": equals_ci(country) },
        TourFilter::Category(slug) => doc! { "categories.slug": slug },
    };

    if !query.exclude_ids.is_empty() {
        let excluded: Vec<Bson> = query
            .exclude_ids
            .iter()
            .map(|id| Bson::String(id.clone()))
            .collect();
        filter.insert("id", doc! { "$nin": excluded });
    }

    filter
}

/// Sort document for a tour ordering. Missing fields sort last when descending.
pub(crate) fn tour_sort(order: TourOrder) -> Document {
    match order {
        TourOrder::RatingDesc => doc! { "rating.score": -1 },
        TourOrder::Newest => doc! { "published_at": -1 },
    }
}

/// Translate a category query into a MongoDB filter document.
pub(crate) fn category_filter(query: &CategoryQuery) -> Document {
    match &query.filter {
        CategoryFilter::All => doc! {},
        CategoryFilter::Title(text) => doc! { "title": contains_ci(text) },
        CategoryFilter::TitleOrCountry(text) => doc! {
            "$or": [
                { "title": contains_ci(text) },
                { "country": equals_ci(text) },
            ]
        },
    }
}

#[async_trait]
impl ContentStore for MongoContentStore {
    async fn find_tours(&self, query: &TourQuery) -> Result<Vec<Tour>, AppError> {
        let options = FindOptions::builder()
            .sort(tour_sort(query.order))
            .limit(query.limit as i64)
            .build();

        tracing::debug!(?query, "Querying tours");
        Self::find_records(&self.tours, tour_filter(query), options).await
    }

    async fn find_categories(&self, query: &CategoryQuery) -> Result<Vec<Category>, AppError> {
        let options = FindOptions::builder()
            .sort(doc! { "title": 1 })
            .limit(query.limit.map(|l| l as i64))
            .build();

        let mut categories: Vec<Category> =
            Self::find_records(&self.categories, category_filter(query), options).await?;

        let counts =
            futures::future::try_join_all(categories.iter().map(|c| self.count_tours(&c.id)))
                .await?;
        for (category, count) in categories.iter_mut().zip(counts) {
            category.tour_count = count;
        }

        Ok(categories)
    }

    async fn tour_by_slug(&self, slug: &str) -> Result<Option<Tour>, AppError> {
        Self::find_one_record(&self.tours, doc! { "slug": slug }).await
    }

    async fn category_by_slug(&self, slug: &str) -> Result<Option<Category>, AppError> {
        let category: Option<Category> =
            Self::find_one_record(&self.categories, doc! { "slug": slug }).await?;

        match category {
            Some(mut category) => {
                category.tour_count = self.count_tours(&category.id).await?;
                Ok(Some(category))
            }
            None => Ok(None),
        }
    }

    async fn page_by_slug(&self, slug: &str) -> Result<Option<Page>, AppError> {
        Self::find_one_record(&self.pages, doc! { "slug": slug }).await
    }
}
