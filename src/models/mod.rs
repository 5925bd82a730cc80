use serde::{Deserialize, Serialize};

/// A configured live-TV channel source
///
/// Sources are loaded once at startup and identified by their ordinal
/// position in the configured list; that index is embedded in every opaque
/// identifier derived from the source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelSource {
    pub name: String,
    pub playlist_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

impl ChannelSource {
    /// Whether this source has a playlist URL to fetch at all
    pub fn has_playlist(&self) -> bool {
        !self.playlist_url.trim().is_empty()
    }
}

/// One playable unit parsed from an M3U playlist
///
/// `locator` is either a directly playable stream URL or a nested
/// manifest/sub-playlist URL that needs further resolution. Entries are
/// produced fresh on every playlist fetch and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    pub locator: String,
}

/// Catalog row shape handed to the host handler layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaPreview {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_shape: Option<PosterShape>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PosterShape {
    Landscape,
    Square,
}

/// Full meta shape for a single catalog item, including its video list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaDetail {
    #[serde(flatten)]
    pub preview: MetaPreview,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub videos: Vec<VideoRef>,
}

/// One selectable video within a channel meta
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoRef {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// A concretely playable stream produced by resolution
///
/// Transient: built per stream request, never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamDescriptor {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
}

impl StreamDescriptor {
    /// Placeholder title used for variants the manifest does not label;
    /// renumbered after aggregation, see the resolver pool.
    pub const GENERIC_TITLE: &'static str = "Stream";

    pub fn new<T: Into<String>, U: Into<String>>(title: T, url: U) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            quality: None,
        }
    }

    pub fn with_quality<Q: Into<String>>(mut self, quality: Q) -> Self {
        self.quality = Some(quality.into());
        self
    }

    /// Whether this descriptor still carries the generic placeholder title
    pub fn has_generic_title(&self) -> bool {
        self.title == Self::GENERIC_TITLE
    }
}
