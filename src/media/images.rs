//! CDN URLs for content-store image assets.
//!
//! The content store references uploaded images by an asset reference of the
//! form `image-<id>-<W>x<H>-<ext>`. The CDN serves the original file at
//! `<cdn_base>/<id>-<W>x<H>.<ext>` and resizes on the fly from query
//! parameters.

use serde::{Deserialize, Serialize};

pub const MIN_WIDTH: u32 = 16;
pub const MAX_WIDTH: u32 = 2400;

/// A parsed `image-<id>-<W>x<H>-<ext>` reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef {
    pub id: String,
    pub width: u32,
    pub height: u32,
    pub extension: String,
}

impl AssetRef {
    pub fn parse(raw: &str) -> Option<Self> {
        let rest = raw.strip_prefix("image-")?;
        let (rest, extension) = rest.rsplit_once('-')?;
        let (id, dimensions) = rest.rsplit_once('-')?;
        let (width, height) = dimensions.split_once('x')?;

        if id.is_empty() || extension.is_empty() || !extension.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }

        Some(Self {
            id: id.to_string(),
            width: width.parse().ok()?,
            height: height.parse().ok()?,
            extension: extension.to_ascii_lowercase(),
        })
    }

    pub fn file_name(&self) -> String {
        format!("{}-{}x{}.{}", self.id, self.width, self.height, self.extension)
    }

    /// Height for the given width, keeping the original aspect ratio.
    pub fn scaled_height(&self, width: u32) -> u32 {
        if self.width == 0 {
            return 0;
        }
        ((u64::from(self.height) * u64::from(width)) / u64::from(self.width)) as u32
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUrlBuilder {
    cdn_base: String,
}

impl ImageUrlBuilder {
    pub fn new(cdn_base: impl Into<String>) -> Self {
        Self {
            cdn_base: cdn_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// CDN URL for `asset_ref` resized to `width`, or `None` when the
    /// reference is not a recognised image asset.
    pub fn url(&self, asset_ref: &str, width: u32) -> Option<String> {
        let asset = AssetRef::parse(asset_ref)?;
        let width = width.clamp(MIN_WIDTH, MAX_WIDTH);
        Some(format!(
            "{}/{}?w={width}&auto=format&fit=max",
            self.cdn_base,
            asset.file_name()
        ))
    }

    /// `srcset` attribute value for the given candidate widths.
    pub fn srcset(&self, asset_ref: &str, widths: &[u32]) -> Option<String> {
        let candidates: Vec<String> = widths
            .iter()
            .filter_map(|w| {
                self.url(asset_ref, *w)
                    .map(|url| format!("{url} {}w", (*w).clamp(MIN_WIDTH, MAX_WIDTH)))
            })
            .collect();

        if candidates.is_empty() {
            None
        } else {
            Some(candidates.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REF: &str = "image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg";

    #[test]
    fn test_parse_asset_ref() {
        let asset = AssetRef::parse(REF).unwrap();
        assert_eq!(asset.id, "Tb9Ew8CXIwaY6R1kjMvI0uRR");
        assert_eq!(asset.width, 2000);
        assert_eq!(asset.height, 3000);
        assert_eq!(asset.extension, "jpg");
        assert_eq!(asset.scaled_height(400), 600);
    }

    #[test]
    fn test_parse_rejects_other_shapes() {
        assert!(AssetRef::parse("file-abc-pdf").is_none());
        assert!(AssetRef::parse("image-abc-jpg").is_none());
        assert!(AssetRef::parse("image-abc-20x-jpg").is_none());
        assert!(AssetRef::parse("image--20x30-jpg").is_none());
        assert!(AssetRef::parse("").is_none());
    }

    #[test]
    fn test_url() {
        let builder = ImageUrlBuilder::new("https://cdn.tourbook.travel/images/");
        assert_eq!(
            builder.url(REF, 800).unwrap(),
            "https://cdn.tourbook.travel/images/Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000.jpg?w=800&auto=format&fit=max"
        );
    }

    #[test]
    fn test_width_is_clamped() {
        let builder = ImageUrlBuilder::new("https://cdn");
        assert!(builder.url(REF, 1).unwrap().contains("w=16&"));
        assert!(builder.url(REF, 10_000).unwrap().contains("w=2400&"));
    }

    #[test]
    fn test_srcset() {
        let builder = ImageUrlBuilder::new("https://cdn");
        let srcset = builder.srcset(REF, &[400, 800]).unwrap();
        assert_eq!(srcset.matches(", ").count(), 1);
        assert!(srcset.ends_with(" 800w"));
        assert!(builder.srcset("nope", &[400]).is_none());
    }
}
