//! URL resolver trait
//!
//! Turns a song's source URL (e.g. a YouTube watch link) into a URL a media
//! backend can actually stream.

use async_trait::async_trait;
use thiserror::Error;

/// Resolution failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The source URL is not one this resolver accepts
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The URL was accepted but no video id could be extracted
    #[error("Could not extract video id from: {0}")]
    InvalidVideoId(String),

    /// The extractor ran but produced no playable stream
    #[error("Failed to extract audio stream: {0}")]
    ExtractionFailed(String),

    /// Transport failure talking to the remote service
    #[error("Network error: {0}")]
    Network(String),

    /// The remote service did not answer in time
    #[error("Request timed out")]
    Timeout,

    /// No extraction backend is configured
    #[error("Audio extraction is not implemented")]
    NotImplemented,
}

/// Validates and resolves source URLs
///
/// Implementations may cache resolved URLs keyed by source URL.
#[async_trait]
pub trait UrlResolver: Send + Sync {
    /// Whether `source_url` is acceptable as a song source
    fn validate(&self, source_url: &str) -> bool;

    /// Extract the provider-specific media id, if any
    fn extract_id(&self, source_url: &str) -> Option<String>;

    /// Resolve `source_url` into a playable stream URL
    async fn resolve(&self, source_url: &str) -> Result<String, ResolveError>;
}
