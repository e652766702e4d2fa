//! Site configuration.
//!
//! Values are layered: built-in defaults, then an optional `tourbook.toml`
//! (or whatever `TOURBOOK_CONFIG` points at), then `TOURBOOK_*` environment
//! variables.

use std::path::PathBuf;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::AppError;
use crate::seo::meta::SiteInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentBackend {
    Mongo,
    Fixture,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    pub base_url: String,
    pub site_name: String,
    pub content_backend: ContentBackend,
    pub mongodb_uri: String,
    pub mongodb_database: String,
    pub fixture_path: PathBuf,
    pub cache_ttl_secs: u64,
    pub image_cdn_base: String,
}

impl SiteConfig {
    /// Load from `tourbook.toml` (optional) and the environment.
    pub fn load() -> Result<Self, AppError> {
        let file = std::env::var("TOURBOOK_CONFIG").unwrap_or_else(|_| "tourbook".to_string());
        Self::build(
            Config::builder()
                .add_source(File::with_name(&file).required(false))
                .add_source(Environment::with_prefix("TOURBOOK").try_parsing(true)),
        )
    }

    fn build(
        sources: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, AppError> {
        let settings = Self::with_defaults(sources)
            .map_err(|e| AppError::Config(e.to_string()))?
            .build()
            .map_err(|e| AppError::Config(e.to_string()))?;

        let config: SiteConfig = settings
            .try_deserialize()
            .map_err(|e| AppError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn with_defaults(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
        builder
            .set_default("base_url", "http://localhost:3000")?
            .set_default("site_name", "Tourbook")?
            .set_default("content_backend", "fixture")?
            .set_default("mongodb_uri", "mongodb://localhost:27017")?
            .set_default("mongodb_database", "tourbook")?
            .set_default("fixture_path", "data/fixture.json")?
            .set_default("cache_ttl_secs", 60)?
            .set_default("image_cdn_base", "https://cdn.tourbook.travel/images")
    }

    fn validate(&self) -> Result<(), AppError> {
        let base = url::Url::parse(&self.base_url)
            .map_err(|e| AppError::Config(format!("Invalid base_url '{}': {e}", self.base_url)))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(AppError::Config(format!(
                "base_url must be http(s), got '{}'",
                self.base_url
            )));
        }
        if self.site_name.trim().is_empty() {
            return Err(AppError::Config("site_name must not be empty".into()));
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn site_info(&self) -> SiteInfo {
        SiteInfo::new(&self.site_name, &self.base_url)
    }

    /// Host part of the MongoDB URI, safe to log. Credentials, path and
    /// options are dropped.
    pub fn mongodb_host(&self) -> String {
        url::Url::parse(&self.mongodb_uri)
            .ok()
            .and_then(|uri| uri.host_str().map(str::to_string))
            .unwrap_or_else(|| "<unparsed host>".to_string())
    }
}
