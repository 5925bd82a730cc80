//! Playlist ingestion: fetching, parsing and freshness caching
//!
//! [`PlaylistFetcher`] retrieves the playlist document for a channel source,
//! parses it into entries and shields callers from re-fetching on every
//! request burst through a bounded freshness cache. Fetch failures propagate
//! to the caller; there are no retries and failures are never cached.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::Client;
use tracing::{debug, info};

use crate::errors::{AddonError, AddonResult};
use crate::models::{ChannelSource, PlaylistEntry};

pub mod m3u_parser;

pub use m3u_parser::parse_m3u;

/// Fetches and parses playlists with a per-key freshness window
///
/// Entry vectors are shared behind `Arc` so cache hits hand out the parsed
/// result without copying. Concurrent misses for the same key are coalesced:
/// at most one upstream fetch per key is in flight at a time.
pub struct PlaylistFetcher {
    client: Client,
    cache: Cache<usize, Arc<Vec<PlaylistEntry>>>,
}

impl PlaylistFetcher {
    pub fn new(fetch_timeout: Duration, cache_ttl: Duration) -> Self {
        let client = Client::builder()
            .timeout(fetch_timeout)
            .user_agent(concat!("iptv-catalog/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new());

        let cache = Cache::builder()
            .max_capacity(256)
            .time_to_live(cache_ttl)
            .build();

        Self { client, cache }
    }

    /// Get the parsed entries for a source, fetching on cache miss
    ///
    /// An empty Vec is a successful result (empty playlist, or a remote
    /// miss served as an empty/non-playlist body); only network-level
    /// failures surface as errors.
    pub async fn entries(
        &self,
        source: &ChannelSource,
        cache_key: usize,
    ) -> AddonResult<Arc<Vec<PlaylistEntry>>> {
        self.cache
            .try_get_with(cache_key, self.fetch_and_parse(source))
            .await
            .map_err(|e: Arc<AddonError>| (*e).clone())
    }

    async fn fetch_and_parse(&self, source: &ChannelSource) -> AddonResult<Arc<Vec<PlaylistEntry>>> {
        let url = &source.playlist_url;
        debug!("Fetching playlist for source '{}' from {}", source.name, url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AddonError::fetch(url, e.to_string()))?;

        // A 404 or other non-success body simply parses to zero entries;
        // the caller decides whether an empty playlist is an error.
        let body = response
            .text()
            .await
            .map_err(|e| AddonError::fetch(url, e.to_string()))?;

        let entries = m3u_parser::parse_m3u(&body);
        info!(
            "Parsed {} entries from playlist source '{}'",
            entries.len(),
            source.name
        );

        Ok(Arc::new(entries))
    }
}
