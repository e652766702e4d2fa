use serde::{Deserialize, Serialize};

use crate::models::category::Category;
use crate::models::tour::Tour;

/// Response body of the search endpoints.
///
/// `query` echoes the raw query as received (untrimmed) on success; `error`
/// is set instead when the content store could not be reached. Neither is
/// ever serialized as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub tours: Vec<Tour>,
    pub categories: Vec<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResponse {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tours.is_empty() && self.categories.is_empty()
    }
}
