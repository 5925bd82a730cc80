//! Catalog strategies: the request-facing surface of the pipeline
//!
//! The host handler layer supplies opaque ids, an optional search query and
//! an optional skip offset; it receives catalog-meta-shaped records or
//! stream descriptors back, or an [`AddonError`] rejection. Two
//! presentation styles exist and one is selected at startup:
//!
//! - **Channels**: every configured source is one channel whose playlist
//!   entries become the channel's video list.
//! - **Catalogs**: every configured source is one catalog whose playlist
//!   entries are the catalog rows themselves.
//!
//! Both implement the same capability set, so the host wiring never
//! branches on the style again after construction.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{AddonConfig, CatalogStyle};
use crate::errors::{AddonError, AddonResult};
use crate::ids;
use crate::ingestor::PlaylistFetcher;
use crate::models::{
    ChannelSource, MetaDetail, MetaPreview, PlaylistEntry, PosterShape, StreamDescriptor, VideoRef,
};
use crate::proxy::UrlRewriter;
use crate::resolver::StreamResolver;

pub mod paging;

/// Catalog id tag used by the Catalogs style (`{prefix}cat_{index}`)
const CATALOG_TAG: &str = "cat_";

/// The capability set shared by both presentation styles
#[async_trait]
pub trait CatalogStrategy: Send + Sync {
    /// List catalog rows, honoring search and skip windowing
    async fn list(
        &self,
        catalog_id: &str,
        search: Option<&str>,
        skip: usize,
    ) -> AddonResult<Vec<MetaPreview>>;

    /// Look up one catalog item with its full meta shape
    async fn lookup_one(&self, meta_id: &str) -> AddonResult<MetaDetail>;

    /// Resolve a stream request id into playable descriptors
    async fn resolve_streams(&self, stream_id: &str) -> AddonResult<Vec<StreamDescriptor>>;
}

/// Select the strategy once at startup from the configured style
pub fn strategy_for(
    config: Arc<AddonConfig>,
    rewriter: Arc<dyn UrlRewriter>,
) -> Box<dyn CatalogStrategy> {
    let shared = Shared::new(Arc::clone(&config), rewriter);
    match config.style {
        CatalogStyle::Channels => Box::new(ChannelsStrategy { shared }),
        CatalogStyle::Catalogs => Box::new(CatalogsStrategy { shared }),
    }
}

/// Dependencies common to both strategies
struct Shared {
    config: Arc<AddonConfig>,
    fetcher: PlaylistFetcher,
    resolver: Arc<StreamResolver>,
}

impl Shared {
    fn new(config: Arc<AddonConfig>, rewriter: Arc<dyn UrlRewriter>) -> Self {
        let fetcher = PlaylistFetcher::new(config.fetch_timeout(), config.cache_ttl());
        let resolver = Arc::new(StreamResolver::new(config.fetch_timeout(), rewriter));
        Self {
            config,
            fetcher,
            resolver,
        }
    }

    /// Strip the addon-level prefix shared with the host handler layer
    fn strip_prefix<'a>(&self, id: &'a str) -> AddonResult<&'a str> {
        id.strip_prefix(&self.config.prefix).ok_or_else(|| {
            AddonError::malformed_id(id, format!("missing '{}' prefix", self.config.prefix))
        })
    }

    /// Tokens may arrive percent-encoded at the protocol boundary
    fn percent_decode(&self, token: &str) -> AddonResult<String> {
        urlencoding::decode(token)
            .map(|cow| cow.into_owned())
            .map_err(|e| AddonError::malformed_id(token, format!("invalid percent-encoding: {e}")))
    }

    fn source_at(&self, index: usize) -> AddonResult<&ChannelSource> {
        self.config
            .source(index)
            .ok_or(AddonError::UnknownChannel { index })
    }

    /// Fetch and parse the playlist backing a channel index
    async fn entries_for(&self, index: usize) -> AddonResult<Arc<Vec<PlaylistEntry>>> {
        let source = self.source_at(index)?;
        if !source.has_playlist() {
            return Err(AddonError::empty_playlist(&source.name));
        }
        self.fetcher.entries(source, index).await
    }

    fn parse_index(&self, id: &str, raw: &str) -> AddonResult<usize> {
        raw.parse()
            .map_err(|_| AddonError::malformed_id(id, "channel index is not a number"))
    }
}

/// Channels style: one catalog row per configured source
struct ChannelsStrategy {
    shared: Shared,
}

impl ChannelsStrategy {
    fn source_meta(&self, index: usize, source: &ChannelSource) -> MetaPreview {
        MetaPreview {
            id: format!("{}{}", self.shared.config.prefix, index),
            name: source.name.clone(),
            poster: source.logo_url.clone(),
            poster_shape: Some(PosterShape::Landscape),
            background: source.logo_url.clone(),
            logo: source.logo_url.clone(),
        }
    }
}

#[async_trait]
impl CatalogStrategy for ChannelsStrategy {
    async fn list(
        &self,
        _catalog_id: &str,
        search: Option<&str>,
        _skip: usize,
    ) -> AddonResult<Vec<MetaPreview>> {
        let metas: Vec<MetaPreview> = self
            .shared
            .config
            .sources
            .iter()
            .enumerate()
            .filter(|(_, source)| source.has_playlist())
            .map(|(index, source)| self.source_meta(index, source))
            .collect();

        if metas.is_empty() {
            return Err(AddonError::configuration("no playlist sources configured"));
        }

        match search {
            Some(query) => paging::search(metas, query, |meta| meta.name.as_str()),
            None => Ok(metas),
        }
    }

    async fn lookup_one(&self, meta_id: &str) -> AddonResult<MetaDetail> {
        let rest = self.shared.strip_prefix(meta_id)?;
        let index = self.shared.parse_index(meta_id, rest)?;
        let source = self.shared.source_at(index)?;
        let preview = self.source_meta(index, source);

        let entries = self.shared.entries_for(index).await?;
        let videos = paging::dedup_by_title((*entries).clone())
            .into_iter()
            .map(|entry| VideoRef {
                id: format!(
                    "{}{}",
                    self.shared.config.prefix,
                    ids::encode_video_id(index, &entry.title)
                ),
                title: entry.title,
                thumbnail: entry.logo.or_else(|| source.logo_url.clone()),
            })
            .collect();

        Ok(MetaDetail { preview, videos })
    }

    async fn resolve_streams(&self, stream_id: &str) -> AddonResult<Vec<StreamDescriptor>> {
        let rest = self.shared.strip_prefix(stream_id)?;
        let token = self.shared.percent_decode(rest)?;
        let (index, title) = ids::decode_video_id(&token)?;
        self.shared.source_at(index)?;

        // Several entries may share one title: mirrors of the same channel.
        // All of them feed the resolution pool.
        let entries = self.shared.entries_for(index).await?;
        let locators: Vec<String> = entries
            .iter()
            .filter(|entry| entry.title == title)
            .map(|entry| entry.locator.clone())
            .collect();

        if locators.is_empty() {
            // The playlist changed since the id was issued: an empty
            // success, not a rejection
            return Ok(Vec::new());
        }

        Ok(self
            .shared
            .resolver
            .resolve_all(locators, self.shared.config.resolve_concurrency)
            .await)
    }
}

/// Catalogs style: playlist entries are the catalog rows themselves
struct CatalogsStrategy {
    shared: Shared,
}

impl CatalogsStrategy {
    fn entry_meta(&self, index: usize, entry: &PlaylistEntry) -> MetaPreview {
        MetaPreview {
            id: format!(
                "{}{}",
                self.shared.config.prefix,
                ids::encode_stream_id(index, &entry.locator)
            ),
            name: entry.title.clone(),
            poster: entry.logo.clone(),
            poster_shape: Some(PosterShape::Landscape),
            background: entry.logo.clone(),
            logo: entry.logo.clone(),
        }
    }

    async fn entry_metas(&self, index: usize) -> AddonResult<Vec<MetaPreview>> {
        let source_name = self.shared.source_at(index)?.name.clone();
        let entries = self.shared.entries_for(index).await?;
        let metas: Vec<MetaPreview> = entries
            .iter()
            .map(|entry| self.entry_meta(index, entry))
            .collect();

        if metas.is_empty() {
            return Err(AddonError::empty_playlist(source_name));
        }
        Ok(metas)
    }

    fn catalog_index(&self, catalog_id: &str) -> AddonResult<usize> {
        let rest = self.shared.strip_prefix(catalog_id)?;
        let raw = rest.strip_prefix(CATALOG_TAG).ok_or_else(|| {
            AddonError::malformed_id(catalog_id, format!("missing '{CATALOG_TAG}' tag"))
        })?;
        self.shared.parse_index(catalog_id, raw)
    }
}

#[async_trait]
impl CatalogStrategy for CatalogsStrategy {
    async fn list(
        &self,
        catalog_id: &str,
        search: Option<&str>,
        skip: usize,
    ) -> AddonResult<Vec<MetaPreview>> {
        let index = self.catalog_index(catalog_id)?;
        let metas = self.entry_metas(index).await?;

        match search {
            // Search results are not windowed
            Some(query) => paging::search(metas, query, |meta| meta.name.as_str()),
            None => Ok(paging::paginate(metas, skip, self.shared.config.page_size)),
        }
    }

    async fn lookup_one(&self, meta_id: &str) -> AddonResult<MetaDetail> {
        let rest = self.shared.strip_prefix(meta_id)?;
        let token = self.shared.percent_decode(rest)?;
        let (index, locator) = ids::decode_stream_id(&token)?;

        let entries = self.shared.entries_for(index).await?;
        let entry = entries
            .iter()
            .find(|entry| entry.locator == locator)
            .ok_or_else(|| AddonError::UnknownVideo {
                id: meta_id.to_string(),
            })?;

        Ok(MetaDetail {
            preview: self.entry_meta(index, entry),
            videos: Vec::new(),
        })
    }

    async fn resolve_streams(&self, stream_id: &str) -> AddonResult<Vec<StreamDescriptor>> {
        let rest = self.shared.strip_prefix(stream_id)?;
        let token = self.shared.percent_decode(rest)?;
        let (index, locator) = ids::decode_stream_id(&token)?;
        self.shared.source_at(index)?;

        Ok(self
            .shared
            .resolver
            .resolve_all(vec![locator], self.shared.config.resolve_concurrency)
            .await)
    }
}
