use serde::{Deserialize, Serialize};

use crate::models::tour::ImageRef;

/// A destination/category grouping tours (usually a city).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub title: String,
    /// URL-safe unique slug.
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
    /// Number of tours referencing this category.
    ///
    /// Computed by the store on every read, never persisted.
    #[serde(default)]
    pub tour_count: u32,
}

impl Category {
    pub fn path(&self) -> String {
        format!("/category/{}", self.slug)
    }

    pub fn to_ref(&self) -> CategoryRef {
        CategoryRef {
            id: self.id.clone(),
            title: self.title.clone(),
            slug: self.slug.clone(),
            country: self.country.clone(),
        }
    }
}

/// The denormalized category reference embedded in each tour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}
