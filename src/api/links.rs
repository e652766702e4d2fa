//! URL validators used by the rich-text editor's image and link tools.
//!
//! Both endpoints only inspect the URL; nothing is fetched.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::AppError;

pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "avif", "svg"];

#[derive(Debug, Deserialize)]
pub struct UrlRequest {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ImageFile {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct FetchImageResponse {
    pub success: u8,
    pub file: ImageFile,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct LinkMeta {
    pub title: String,
    pub site_name: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct FetchLinkResponse {
    pub success: u8,
    pub link: String,
    pub meta: LinkMeta,
}

fn parse_http_url(raw: &str) -> Result<Url, AppError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| AppError::BadRequest(format!("Invalid URL '{raw}': {e}")))?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(AppError::BadRequest(format!(
            "Only http(s) URLs are accepted, got '{raw}'"
        )));
    }
    Ok(url)
}

/// Validate an image URL and return it normalized.
pub fn process_fetch_image(request: UrlRequest) -> Result<FetchImageResponse, AppError> {
    let url = parse_http_url(&request.url)?;

    let extension = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .and_then(|file| file.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match extension {
        Some(ext) if IMAGE_EXTENSIONS.contains(&ext.as_str()) => Ok(FetchImageResponse {
            success: 1,
            file: ImageFile { url: url.into() },
        }),
        _ => Err(AppError::BadRequest(format!(
            "URL does not point to an image: {}",
            request.url
        ))),
    }
}

/// Validate a link and describe it from its host name.
pub fn process_fetch_link(request: UrlRequest) -> Result<FetchLinkResponse, AppError> {
    let url = parse_http_url(&request.url)?;
    let host = url.host_str().unwrap_or_default();
    let site_name = host.strip_prefix("www.").unwrap_or(host).to_string();

    let title = url
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(humanize_segment)
        .unwrap_or_else(|| site_name.clone());

    Ok(FetchLinkResponse {
        success: 1,
        link: url.to_string(),
        meta: LinkMeta { title, site_name },
    })
}

/// `best-tours-in-rome.html` -> `Best tours in rome`.
fn humanize_segment(segment: &str) -> String {
    let stem = segment.rsplit_once('.').map_or(segment, |(stem, _)| stem);
    let words = stem.replace(['-', '_'], " ");
    let mut chars = words.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => segment.to_string(),
    }
}

/// Axum handler for `POST /api/fetch-image`.
#[cfg(feature = "ssr")]
pub async fn fetch_image_handler(
    axum::Json(request): axum::Json<UrlRequest>,
) -> Result<axum::Json<FetchImageResponse>, AppError> {
    Ok(axum::Json(process_fetch_image(request)?))
}

/// Axum handler for `POST /api/fetch-link`.
#[cfg(feature = "ssr")]
pub async fn fetch_link_handler(
    axum::Json(request): axum::Json<UrlRequest>,
) -> Result<axum::Json<FetchLinkResponse>, AppError> {
    Ok(axum::Json(process_fetch_link(request)?))
}
