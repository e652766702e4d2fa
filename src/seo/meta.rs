use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::models::category::Category;
use crate::models::page::Page;
use crate::models::tour::Tour;
use crate::seo::schema::SCHEMA_CONTEXT;

/// Meta descriptions longer than this are cut on a character boundary.
pub const MAX_DESCRIPTION_CHARS: usize = 160;

/// Site-wide identity used to build titles and absolute URLs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteInfo {
    pub name: String,
    /// Absolute origin without a trailing slash, e.g. `https://tourbook.travel`.
    pub base_url: String,
}

impl SiteInfo {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn absolute(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn title(&self, title: &str) -> String {
        format!("{title} | {}", self.name)
    }
}

/// Everything the page head needs besides structured data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub canonical_url: String,
    pub og_image: Option<String>,
}

impl PageMeta {
    pub fn for_tour(tour: &Tour, site: &SiteInfo, og_image: Option<String>) -> Self {
        let fallback = match tour.country() {
            Some(country) => format!("{} in {country}. Book online with {}.", tour.title, site.name),
            None => format!("{}. Book online with {}.", tour.title, site.name),
        };

        Self {
            title: site.title(&tour.title),
            description: summarize(tour.description.as_deref().unwrap_or(&fallback)),
            canonical_url: site.absolute(&tour.path()),
            og_image,
        }
    }

    pub fn for_category(category: &Category, site: &SiteInfo, og_image: Option<String>) -> Self {
        let fallback = format!(
            "{} tours and activities in {}.",
            category.tour_count,
            category.title
        );

        Self {
            title: site.title(&format!("Tours in {}", category.title)),
            description: summarize(category.description.as_deref().unwrap_or(&fallback)),
            canonical_url: site.absolute(&category.path()),
            og_image,
        }
    }

    /// Editor SEO overrides win over the page title and body.
    pub fn for_page(page: &Page, site: &SiteInfo) -> Self {
        let seo = page.seo.clone().unwrap_or_default();
        let title = seo.meta_title.unwrap_or_else(|| page.title.clone());
        let description = seo
            .meta_description
            .or_else(|| page.body.as_deref().map(strip_markdown))
            .unwrap_or_default();

        Self {
            title: site.title(&title),
            description: summarize(&description),
            canonical_url: site.absolute(&page.path()),
            og_image: seo.og_image,
        }
    }

    pub fn for_listing(title: &str, description: &str, path: &str, site: &SiteInfo) -> Self {
        Self {
            title: site.title(title),
            description: summarize(description),
            canonical_url: site.absolute(path),
            og_image: None,
        }
    }
}

/// Collapse whitespace and cut to [`MAX_DESCRIPTION_CHARS`] with an ellipsis.
pub fn summarize(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= MAX_DESCRIPTION_CHARS {
        return collapsed;
    }

    let cut: String = collapsed.chars().take(MAX_DESCRIPTION_CHARS - 1).collect();
    format!("{}…", cut.trim_end())
}

/// Plain text of a markdown body, for descriptions.
fn strip_markdown(raw: &str) -> String {
    use pulldown_cmark::{Event, Parser};

    let mut text = String::new();
    for event in Parser::new(raw) {
        match event {
            Event::Text(t) | Event::Code(t) => {
                if !text.is_empty() && !text.ends_with(' ') {
                    text.push(' ');
                }
                text.push_str(&t);
                if text.len() > MAX_DESCRIPTION_CHARS * 4 {
                    break;
                }
            }
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            _ => {}
        }
    }
    text
}

/// `TouristTrip` JSON-LD for a tour detail page.
pub fn tour_json_ld(tour: &Tour, site: &SiteInfo, image: Option<String>) -> Value {
    let mut node = Map::new();
    node.insert("@context".into(), json!(SCHEMA_CONTEXT));
    node.insert("@type".into(), json!("TouristTrip"));
    node.insert("name".into(), json!(tour.title));
    node.insert("url".into(), json!(site.absolute(&tour.path())));

    if let Some(description) = &tour.description {
        node.insert("description".into(), json!(summarize(description)));
    }
    if let Some(image) = image {
        node.insert("image".into(), json!(image));
    }
    if let Some(category) = tour.primary_category() {
        let mut destination = Map::new();
        destination.insert("@type".into(), json!("Place"));
        destination.insert("name".into(), json!(category.title));
        if let Some(country) = &category.country {
            destination.insert(
                "address".into(),
                json!({"@type": "PostalAddress", "addressCountry": country}),
            );
        }
        node.insert("itinerary".into(), Value::Object(destination));
    }
    if let (Some(price), Some(currency)) = (tour.details.price, tour.details.currency.as_deref()) {
        node.insert(
            "offers".into(),
            json!({
                "@type": "Offer",
                "price": format!("{price:.2}"),
                "priceCurrency": currency,
                "availability": "https://schema.org/InStock",
                "url": site.absolute(&tour.path()),
            }),
        );
    }
    if let Some(rating) = tour.rating.filter(|r| r.review_count > 0) {
        node.insert(
            "aggregateRating".into(),
            json!({
                "@type": "AggregateRating",
                "ratingValue": rating.score,
                "reviewCount": rating.review_count,
                "bestRating": 5,
            }),
        );
    }

    Value::Object(node)
}

/// `ItemList` JSON-LD for a category listing page.
pub fn category_json_ld(category: &Category, tours: &[Tour], site: &SiteInfo) -> Value {
    let items: Vec<Value> = tours
        .iter()
        .enumerate()
        .map(|(i, tour)| {
            json!({
                "@type": "ListItem",
                "position": i + 1,
                "name": tour.title,
                "url": site.absolute(&tour.path()),
            })
        })
        .collect();

    json!({
        "@context": SCHEMA_CONTEXT,
        "@type": "ItemList",
        "name": format!("Tours in {}", category.title),
        "url": site.absolute(&category.path()),
        "numberOfItems": items.len(),
        "itemListElement": items,
    })
}
