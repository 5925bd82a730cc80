use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::models::ChannelSource;

/// Presentation style for the configured sources
///
/// Selected once at startup; it picks which catalog strategy serves every
/// request for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogStyle {
    /// Each source is one channel; its playlist entries become the
    /// channel's video list
    Channels,
    /// Each source is one catalog; its playlist entries become catalog rows
    Catalogs,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddonConfig {
    /// Display name used in rejection messages
    pub name: String,
    /// Identifier prefix shared with the host handler layer; every id this
    /// pipeline issues starts with it
    pub prefix: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub style: CatalogStyle,
    /// Page size for catalog windowing
    pub page_size: usize,
    /// Per-fetch timeout applied to every outbound HTTP request
    pub fetch_timeout_secs: u64,
    /// Freshness window of the playlist cache
    pub cache_ttl_secs: u64,
    /// Concurrency ceiling of the stream resolution pool
    pub resolve_concurrency: usize,
    /// Proxy endpoint outbound locators are routed through; identity
    /// transform when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_endpoint: Option<String>,
    /// Ordered channel source list; ordinal position is identity
    pub sources: Vec<ChannelSource>,
}

impl Default for AddonConfig {
    fn default() -> Self {
        Self {
            name: "Worldwide Free IPTV".to_string(),
            prefix: "wwfreeiptv_".to_string(),
            icon: None,
            style: CatalogStyle::Channels,
            page_size: 100,
            fetch_timeout_secs: 30,
            cache_ttl_secs: 60,
            resolve_concurrency: 10,
            proxy_endpoint: None,
            sources: Vec::new(),
        }
    }
}

impl AddonConfig {
    pub fn load() -> Result<Self> {
        let config_file =
            std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".to_string());
        Self::load_from(&config_file)
    }

    pub fn load_from(path: &str) -> Result<Self> {
        if std::path::Path::new(path).exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&contents)?;
            config.validate()?;
            Ok(config)
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            std::fs::write(path, contents)?;
            Ok(default_config)
        }
    }

    fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            anyhow::bail!("page_size must be greater than zero");
        }
        if self.resolve_concurrency == 0 {
            anyhow::bail!("resolve_concurrency must be greater than zero");
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Look up a source by its ordinal index
    pub fn source(&self, index: usize) -> Option<&ChannelSource> {
        self.sources.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AddonConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.page_size, 100);
        assert_eq!(config.resolve_concurrency, 10);
    }

    #[test]
    fn parses_sources_from_toml() {
        let toml_str = r#"
            name = "Test TV"
            prefix = "testtv_"
            style = "catalogs"
            page_size = 50
            fetch_timeout_secs = 10
            cache_ttl_secs = 30
            resolve_concurrency = 4

            [[sources]]
            name = "News"
            playlist_url = "http://example.com/news.m3u"

            [[sources]]
            name = "Sports"
            playlist_url = "http://example.com/sports.m3u"
            logo_url = "http://example.com/sports.png"
        "#;
        let config: AddonConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.style, CatalogStyle::Catalogs);
        assert_eq!(config.sources.len(), 2);
        assert_eq!(config.sources[1].logo_url.as_deref(), Some("http://example.com/sports.png"));
        assert!(config.source(2).is_none());
    }
}
