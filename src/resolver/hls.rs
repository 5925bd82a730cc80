//! HLS master-playlist variant discovery
//!
//! A locator may point at an adaptive-bitrate master playlist grouping
//! several quality renditions. This module inspects fetched content and,
//! for master playlists, yields one candidate per variant with a
//! distinguishing title derived from the variant's resolution, else its
//! bandwidth, else the generic placeholder.

use m3u8_rs::{Playlist, VariantStream};
use tracing::debug;
use url::Url;

use crate::errors::ResolveError;
use crate::models::StreamDescriptor;

/// One discovered quality rendition, not yet proxy-wrapped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub title: String,
    pub url: String,
    pub quality: Option<String>,
}

/// Inspect fetched playlist content for variant streams
///
/// Returns `Ok(Some(variants))` for a master playlist, `Ok(None)` for
/// media playlists and non-HLS content (the locator is then directly
/// playable), and an error only for content that advertises variant
/// streams but cannot be parsed. Variant URIs are resolved against `base`,
/// the original locator URL.
pub fn discover_variants(content: &str, base: &Url) -> Result<Option<Vec<Variant>>, ResolveError> {
    if !content.trim_start().starts_with("#EXTM3U") {
        return Ok(None);
    }

    match m3u8_rs::parse_playlist(content.as_bytes()) {
        Ok((_, Playlist::MasterPlaylist(master))) => {
            let mut variants = Vec::with_capacity(master.variants.len());
            for variant in master.variants.iter().filter(|v| !v.is_i_frame) {
                let url = match base.join(&variant.uri) {
                    Ok(url) => url.to_string(),
                    Err(e) => {
                        debug!("Skipping variant with unresolvable URI '{}': {}", variant.uri, e);
                        continue;
                    }
                };
                let (title, quality) = variant_title(variant);
                variants.push(Variant { title, url, quality });
            }
            Ok(Some(variants))
        }
        Ok((_, Playlist::MediaPlaylist(_))) => Ok(None),
        Err(e) => {
            if content.contains("#EXT-X-STREAM-INF") {
                Err(ResolveError::invalid_manifest(base.as_str(), format!("{e:?}")))
            } else {
                // Plain or slightly malformed media playlist: the locator
                // itself is the playable unit
                Ok(None)
            }
        }
    }
}

/// Derive a display title for a variant: resolution, else bandwidth, else
/// the generic placeholder renumbered later by the pool
fn variant_title(variant: &VariantStream) -> (String, Option<String>) {
    if let Some(resolution) = &variant.resolution {
        let label = format!("{}p", resolution.height);
        return (label.clone(), Some(label));
    }
    if variant.bandwidth > 0 {
        let label = if variant.bandwidth >= 1_000_000 {
            format!("{:.1} Mbps", variant.bandwidth as f64 / 1_000_000.0)
        } else {
            format!("{} kbps", variant.bandwidth / 1_000)
        };
        return (label.clone(), Some(label));
    }
    (StreamDescriptor::GENERIC_TITLE.to_string(), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://cdn.example.com/live/master.m3u8").unwrap()
    }

    #[test]
    fn master_playlist_yields_one_variant_per_rendition() {
        let master = "#EXTM3U\n\
            #EXT-X-STREAM-INF:BANDWIDTH=5000000,RESOLUTION=1920x1080\n\
            1080/index.m3u8\n\
            #EXT-X-STREAM-INF:BANDWIDTH=2100000\n\
            mid/index.m3u8\n\
            #EXT-X-STREAM-INF:BANDWIDTH=450000\n\
            http://other.example.com/low.m3u8\n";

        let variants = discover_variants(master, &base()).unwrap().unwrap();
        assert_eq!(variants.len(), 3);
        assert_eq!(variants[0].title, "1080p");
        assert_eq!(variants[0].url, "http://cdn.example.com/live/1080/index.m3u8");
        assert_eq!(variants[1].title, "2.1 Mbps");
        assert_eq!(variants[1].url, "http://cdn.example.com/live/mid/index.m3u8");
        assert_eq!(variants[2].title, "450 kbps");
        // Absolute URIs survive the join untouched
        assert_eq!(variants[2].url, "http://other.example.com/low.m3u8");
    }

    #[test]
    fn media_playlist_is_directly_playable() {
        let media = "#EXTM3U\n\
            #EXT-X-VERSION:3\n\
            #EXT-X-TARGETDURATION:6\n\
            #EXTINF:6.0,\n\
            seg0.ts\n\
            #EXTINF:6.0,\n\
            seg1.ts\n";
        assert_eq!(discover_variants(media, &base()).unwrap(), None);
    }

    #[test]
    fn non_hls_content_is_directly_playable() {
        assert_eq!(discover_variants("", &base()).unwrap(), None);
        assert_eq!(discover_variants("<html>not a playlist</html>", &base()).unwrap(), None);
    }

    #[test]
    fn unlabeled_variants_carry_the_generic_placeholder() {
        let master = "#EXTM3U\n\
            #EXT-X-STREAM-INF:BANDWIDTH=0\n\
            a/index.m3u8\n\
            #EXT-X-STREAM-INF:BANDWIDTH=0\n\
            b/index.m3u8\n";

        let variants = discover_variants(master, &base()).unwrap().unwrap();
        assert_eq!(variants.len(), 2);
        assert!(variants.iter().all(|v| v.title == StreamDescriptor::GENERIC_TITLE));
        assert!(variants.iter().all(|v| v.quality.is_none()));
    }
}
