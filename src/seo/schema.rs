//! JSON-LD structured data for content pages.
//!
//! Each page kind maps to one [`StructuredData`] variant. Optional inputs
//! that are missing simply do not appear in the output; nothing is ever
//! serialized as `null`.

use serde::Serialize;
use serde_json::Value;

use crate::models::page::{FaqEntry, HowToStep, ListEntry, Page, ReviewSnippet};

pub const SCHEMA_CONTEXT: &str = "https://schema.org";

/// The slug whose page always renders the organization schema.
pub const ABOUT_US_SLUG: &str = "about-us";

const ORGANIZATION_NAME: &str = "Tourbook";
const ORGANIZATION_DESCRIPTION: &str =
    "Guided tours, day trips and skip-the-line tickets, hand-picked by local experts.";
const ORGANIZATION_EMAIL: &str = "hello@tourbook.travel";
const ORGANIZATION_SAME_AS: &[&str] = &[
    "https://www.facebook.com/tourbook",
    "https://www.instagram.com/tourbook",
];

/// The discriminator read from a page's rich-snippet metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaKind {
    Article,
    #[default]
    WebPage,
    HowTo,
    FaqPage,
    ItemList,
    Review,
}

impl SchemaKind {
    /// Parse the editor-provided tag. Unknown or missing tags fall back to `WebPage`.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag.map(str::trim) {
            Some("Article") => SchemaKind::Article,
            Some("HowTo") => SchemaKind::HowTo,
            Some("FAQPage") => SchemaKind::FaqPage,
            Some("ItemList") => SchemaKind::ItemList,
            Some("Review") => SchemaKind::Review,
            _ => SchemaKind::WebPage,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "@type")]
pub enum StructuredData {
    Article(ArticleSchema),
    WebPage(WebPageSchema),
    HowTo(HowToSchema),
    #[serde(rename = "FAQPage")]
    FaqPage(FaqPageSchema),
    ItemList(ItemListSchema),
    Review(ReviewSchema),
    Organization(OrganizationSchema),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSchema {
    pub headline: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Person>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_published: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebPageSchema {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HowToSchema {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub step: Vec<Typed<HowToStepSchema>>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HowToStepSchema {
    pub name: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqPageSchema {
    pub name: String,
    pub url: String,
    pub main_entity: Vec<Typed<Question>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub name: String,
    pub accepted_answer: Typed<Answer>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemListSchema {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub url: String,
    pub item_list_element: Vec<Typed<ListItem>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItem {
    /// 1-based position in the list.
    pub position: usize,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSchema {
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_reviewed: Option<Typed<Thing>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_rating: Option<Typed<RatingValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Person>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Thing {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingValue {
    pub rating_value: f64,
    pub best_rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationSchema {
    pub name: String,
    pub url: String,
    pub logo: String,
    pub description: String,
    pub same_as: Vec<String>,
    pub contact_point: Typed<ContactPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPoint {
    pub contact_type: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Person {
    #[serde(rename = "@type")]
    kind: &'static str,
    pub name: String,
}

impl Person {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            kind: "Person",
            name: name.into(),
        }
    }
}

/// A nested schema.org node carrying its own `@type`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Typed<T> {
    #[serde(rename = "@type")]
    kind: &'static str,
    #[serde(flatten)]
    pub node: T,
}

impl<T> Typed<T> {
    pub fn new(kind: &'static str, node: T) -> Self {
        Self { kind, node }
    }
}

impl StructuredData {
    /// Serialize to a JSON-LD object including `@context`.
    pub fn to_json_ld(&self) -> Value {
        let mut value = serde_json::to_value(self).unwrap_or(Value::Null);
        if let Value::Object(map) = &mut value {
            map.insert("@context".to_string(), Value::String(SCHEMA_CONTEXT.to_string()));
        }
        value
    }
}

fn page_url(base_url: &str, slug: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), slug.trim_start_matches('/'))
}

/// The hand-authored organization schema used for the about-us page.
pub fn organization(base_url: &str) -> StructuredData {
    let base = base_url.trim_end_matches('/');
    StructuredData::Organization(OrganizationSchema {
        name: ORGANIZATION_NAME.to_string(),
        url: base.to_string(),
        logo: format!("{base}/logo.png"),
        description: ORGANIZATION_DESCRIPTION.to_string(),
        same_as: ORGANIZATION_SAME_AS.iter().map(|s| s.to_string()).collect(),
        contact_point: Typed::new(
            "ContactPoint",
            ContactPoint {
                contact_type: "customer service".to_string(),
                email: ORGANIZATION_EMAIL.to_string(),
            },
        ),
    })
}

/// Map a content page to its structured data.
pub fn structured_data(page: &Page, base_url: &str) -> StructuredData {
    if page.slug == ABOUT_US_SLUG {
        return organization(base_url);
    }

    let snippet = page.rich_snippet.clone().unwrap_or_default();
    let url = page_url(base_url, &page.slug);
    let name = snippet.headline.clone().unwrap_or_else(|| page.title.clone());
    let description = snippet.description.clone();
    let kind = SchemaKind::from_tag(snippet.schema_type.as_deref());

    match kind {
        SchemaKind::Article => StructuredData::Article(ArticleSchema {
            headline: name,
            description,
            image: snippet.image,
            author: snippet.author.map(Person::new),
            date_published: snippet.date_published,
            date_modified: snippet.date_modified,
            url,
        }),
        SchemaKind::WebPage => StructuredData::WebPage(WebPageSchema {
            name,
            description,
            image: snippet.image,
            url,
        }),
        SchemaKind::HowTo => StructuredData::HowTo(HowToSchema {
            name,
            description,
            image: snippet.image,
            step: snippet.steps.iter().map(how_to_step).collect(),
            url,
        }),
        SchemaKind::FaqPage => StructuredData::FaqPage(FaqPageSchema {
            name,
            url,
            main_entity: snippet.faqs.iter().map(question).collect(),
        }),
        SchemaKind::ItemList => StructuredData::ItemList(ItemListSchema {
            name,
            description,
            url,
            item_list_element: snippet
                .list_items
                .iter()
                .enumerate()
                .map(|(i, entry)| list_item(i + 1, entry))
                .collect(),
        }),
        SchemaKind::Review => StructuredData::Review(ReviewSchema {
            name,
            url,
            item_reviewed: snippet
                .review
                .as_ref()
                .map(|r| Typed::new("Thing", Thing { name: r.item_name.clone() })),
            review_rating: snippet.review.as_ref().map(review_rating),
            author: snippet
                .review
                .as_ref()
                .and_then(|r| r.author.clone())
                .or(snippet.author)
                .map(Person::new),
        }),
    }
}

/// `(page, base_url) -> JSON-LD object`.
pub fn generate(page: &Page, base_url: &str) -> Value {
    structured_data(page, base_url).to_json_ld()
}

/// Serialize a JSON-LD value for embedding in a `<script>` element.
///
/// `<`, `>` and `&` are escaped as unicode sequences so editor content can
/// never close the script tag.
pub fn to_script_payload(value: &Value) -> String {
    value
        .to_string()
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

fn how_to_step(step: &HowToStep) -> Typed<HowToStepSchema> {
    Typed::new(
        "HowToStep",
        HowToStepSchema {
            name: step.name.clone(),
            text: step.text.clone(),
            image: step.image.clone(),
        },
    )
}

fn question(entry: &FaqEntry) -> Typed<Question> {
    Typed::new(
        "Question",
        Question {
            name: entry.question.clone(),
            accepted_answer: Typed::new(
                "Answer",
                Answer {
                    text: entry.answer.clone(),
                },
            ),
        },
    )
}

fn list_item(position: usize, entry: &ListEntry) -> Typed<ListItem> {
    Typed::new(
        "ListItem",
        ListItem {
            position,
            name: entry.name.clone(),
            url: entry.url.clone(),
        },
    )
}

fn review_rating(review: &ReviewSnippet) -> Typed<RatingValue> {
    Typed::new(
        "Rating",
        RatingValue {
            rating_value: review.rating_value,
            best_rating: review.best_rating.unwrap_or(5.0),
        },
    )
}
