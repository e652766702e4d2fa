use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::category::CategoryRef;

/// Reference to an image asset in the content store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    /// Asset reference, e.g. `image-abc123-1200x800-jpg`.
    pub asset_ref: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

/// Practical tour metadata shown on cards and detail pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TourDetails {
    /// Free-form duration label, e.g. `3 hours`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// ISO 4217 currency code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl TourDetails {
    /// Price label such as `EUR 49.00`, when both price and currency are known.
    pub fn price_label(&self) -> Option<String> {
        match (self.price, self.currency.as_deref()) {
            (Some(price), Some(currency)) => Some(format!("{currency} {price:.2}")),
            _ => None,
        }
    }
}

/// Aggregated review score as reported by the external review provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub score: f64,
    #[serde(default)]
    pub review_count: u32,
}

/// A bookable tour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tour {
    /// Unique identifier assigned by the content store.
    pub id: String,
    pub title: String,
    /// URL-safe unique slug.
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_image: Option<ImageRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gallery: Vec<ImageRef>,
    #[serde(default)]
    pub details: TourDetails,
    /// Highlight bullet points ("Skip the line", "Hotel pickup", ...).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub free_cancellation: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
    /// Owning categories; the first one is the primary category.
    #[serde(default)]
    pub categories: Vec<CategoryRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl Tour {
    pub fn primary_category(&self) -> Option<&CategoryRef> {
        self.categories.first()
    }

    /// Country shown for this tour: the primary category's country.
    pub fn country(&self) -> Option<&str> {
        self.primary_category()
            .and_then(|c| c.country.as_deref())
    }

    /// Rating score used for ordering; unrated tours sort last.
    pub fn rating_score(&self) -> f64 {
        self.rating.map(|r| r.score).unwrap_or(f64::NEG_INFINITY)
    }

    pub fn path(&self) -> String {
        format!("/tour/{}", self.slug)
    }
}
