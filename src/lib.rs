//! Live-TV playlist catalog and stream resolution pipeline
//!
//! Exposes a set of channel sources, described as extended-M3U playlists,
//! through a catalog/meta/stream capability set. The pipeline fetches and
//! parses playlist documents into entries, issues stable opaque identifiers
//! for them, deduplicates and paginates listings, and resolves a selected
//! entry into concretely playable stream URLs through a bounded-concurrency
//! pool with proxy-URL wrapping. HTTP routing and the host addon protocol
//! envelope are external collaborators.

pub mod catalog;
pub mod config;
pub mod errors;
pub mod ids;
pub mod ingestor;
pub mod models;
pub mod proxy;
pub mod resolver;

pub use catalog::{strategy_for, CatalogStrategy};
pub use config::{AddonConfig, CatalogStyle};
pub use errors::{AddonError, AddonResult, ResolveError};
