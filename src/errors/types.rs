//! Error type definitions for the playlist catalog pipeline
//!
//! Request-level failures are modeled by [`AddonError`]; its `Display`
//! output is the human-readable rejection reason handed back to the host
//! handler layer. Per-locator resolution failures are modeled separately by
//! [`ResolveError`] and are contained by the resolution pool — they degrade
//! the result set of a stream request but never reject the request itself.

use thiserror::Error;

/// Convenience result alias for request-level operations
pub type AddonResult<T> = Result<T, AddonError>;

/// Request-level errors surfaced to the host handler layer
///
/// `Clone` because coalesced cache waiters all receive the same fetch
/// failure.
#[derive(Error, Debug, Clone)]
pub enum AddonError {
    /// An opaque identifier token could not be decoded
    #[error("Malformed identifier '{token}': {reason}")]
    MalformedIdentifier { token: String, reason: String },

    /// A playlist document could not be fetched
    #[error("Could not fetch playlist from {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// The fetch succeeded but produced zero usable entries, or the channel
    /// has no playlist source configured at all
    #[error("Could not get items from M3U playlist: {source_name}")]
    EmptyPlaylist { source_name: String },

    /// A search query matched nothing
    #[error("No search results for: {query}")]
    NoResults { query: String },

    /// A channel index outside the configured source list
    #[error("Unknown channel index: {index}")]
    UnknownChannel { index: usize },

    /// A meta lookup for an id that is not present in the channel's playlist
    #[error("Could not get meta item for: {id}")]
    UnknownVideo { id: String },

    /// Invalid or unreadable configuration
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl AddonError {
    /// Create a malformed-identifier error
    pub fn malformed_id<T: Into<String>, R: Into<String>>(token: T, reason: R) -> Self {
        Self::MalformedIdentifier {
            token: token.into(),
            reason: reason.into(),
        }
    }

    /// Create a fetch error
    pub fn fetch<U: Into<String>, R: Into<String>>(url: U, reason: R) -> Self {
        Self::Fetch {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create an empty-playlist error
    pub fn empty_playlist<S: Into<String>>(source_name: S) -> Self {
        Self::EmptyPlaylist {
            source_name: source_name.into(),
        }
    }

    /// Create a no-search-results error
    pub fn no_results<Q: Into<String>>(query: Q) -> Self {
        Self::NoResults {
            query: query.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration<M: Into<String>>(message: M) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

/// Per-locator stream resolution errors
///
/// These never cross the resolution pool boundary: a failing locator is
/// logged and dropped while its siblings keep resolving.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// Network failure or non-success status fetching the locator
    #[error("Fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// The locator content claimed to be a manifest but could not be parsed
    #[error("Invalid manifest at {url}: {reason}")]
    InvalidManifest { url: String, reason: String },

    /// The locator is not a parseable URL
    #[error("Bad locator '{locator}': {reason}")]
    BadLocator { locator: String, reason: String },
}

impl ResolveError {
    /// Create a fetch error for a locator
    pub fn fetch<U: Into<String>, R: Into<String>>(url: U, reason: R) -> Self {
        Self::Fetch {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid-manifest error
    pub fn invalid_manifest<U: Into<String>, R: Into<String>>(url: U, reason: R) -> Self {
        Self::InvalidManifest {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a bad-locator error
    pub fn bad_locator<L: Into<String>, R: Into<String>>(locator: L, reason: R) -> Self {
        Self::BadLocator {
            locator: locator.into(),
            reason: reason.into(),
        }
    }
}
