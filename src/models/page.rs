use serde::{Deserialize, Serialize};

/// An editorial content page (about us, guides, FAQ, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    pub title: String,
    pub slug: String,
    /// Markdown body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo: Option<SeoFields>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rich_snippet: Option<RichSnippet>,
}

/// Editor-provided overrides for the page's meta tags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeoFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
}

/// Structured-data inputs attached to a page by editors.
///
/// `schema_type` selects which of the remaining fields end up in the
/// generated JSON-LD; the rest are ignored for that page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RichSnippet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Absolute image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_published: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<HowToStep>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub faqs: Vec<FaqEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub list_items: Vec<ListEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review: Option<ReviewSnippet>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HowToStep {
    pub name: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSnippet {
    pub item_name: String,
    pub rating_value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl Page {
    pub fn path(&self) -> String {
        format!("/{}", self.slug)
    }
}
