//! Proxy-URL transform seam
//!
//! Every outbound locator is passed through a [`UrlRewriter`] before being
//! fetched or returned, so final stream URLs are always proxy-wrapped. The
//! concrete transform is supplied by the deployment; two reference
//! implementations are provided. No retry or backoff logic lives here.

use async_trait::async_trait;

/// External proxy-URL transform applied to every outbound locator
#[async_trait]
pub trait UrlRewriter: Send + Sync {
    async fn wrap(&self, url: &str) -> String;
}

/// Identity transform for deployments without a traffic proxy
#[derive(Debug, Default, Clone)]
pub struct PassthroughRewriter;

#[async_trait]
impl UrlRewriter for PassthroughRewriter {
    async fn wrap(&self, url: &str) -> String {
        url.to_string()
    }
}

/// Routes traffic through a proxy endpoint carrying the target URL
/// percent-encoded as its final path segment
#[derive(Debug, Clone)]
pub struct PrefixRewriter {
    endpoint: String,
}

impl PrefixRewriter {
    /// `endpoint` should include a trailing separator, e.g.
    /// `http://127.0.0.1:11470/proxy/`
    pub fn new<E: Into<String>>(endpoint: E) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl UrlRewriter for PrefixRewriter {
    async fn wrap(&self, url: &str) -> String {
        format!("{}{}", self.endpoint, urlencoding::encode(url))
    }
}
