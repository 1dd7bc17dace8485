use crate::youtube;
use async_trait::async_trait;
use cadence_core::{ResolveError, UrlResolver};
use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};

/// Performs the actual network extraction of an audio stream
///
/// Kept behind a trait so the resolver stays testable and the network
/// protocol can be swapped without touching validation or caching.
#[async_trait]
pub trait StreamExtractor: Send + Sync {
    /// Return a playable stream URL for `video_id`
    async fn extract(&self, video_id: &str) -> Result<String, ResolveError>;
}

/// Resolver settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Number of resolved URLs kept in memory (default: 50)
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

fn default_cache_capacity() -> usize {
    50
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            cache_capacity: default_cache_capacity(),
        }
    }
}

/// YouTube [`UrlResolver`] with an LRU cache of resolved stream URLs
pub struct YouTubeResolver {
    cache: Mutex<LruCache<String, String>>,
    extractor: Option<Arc<dyn StreamExtractor>>,
}

impl Default for YouTubeResolver {
    fn default() -> Self {
        Self::new(ResolverConfig::default())
    }
}

impl YouTubeResolver {
    /// Create a resolver without an extraction backend
    pub fn new(config: ResolverConfig) -> Self {
        let capacity = NonZeroUsize::new(config.cache_capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
            extractor: None,
        }
    }

    /// Attach the backend that performs network extraction
    #[must_use]
    pub fn with_extractor(mut self, extractor: Arc<dyn StreamExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Drop every cached resolution
    pub fn clear_cache(&self) {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of cached resolutions
    pub fn cached_len(&self) -> usize {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn cached(&self, source_url: &str) -> Option<String> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(source_url)
            .cloned()
    }
}

#[async_trait]
impl UrlResolver for YouTubeResolver {
    fn validate(&self, source_url: &str) -> bool {
        youtube::is_valid_url(source_url)
    }

    fn extract_id(&self, source_url: &str) -> Option<String> {
        youtube::extract_video_id(source_url)
    }

    async fn resolve(&self, source_url: &str) -> Result<String, ResolveError> {
        if !self.validate(source_url) {
            return Err(ResolveError::InvalidUrl(source_url.to_string()));
        }

        if let Some(stream_url) = self.cached(source_url) {
            tracing::debug!(source_url, "stream url served from cache");
            return Ok(stream_url);
        }

        let video_id = self
            .extract_id(source_url)
            .ok_or_else(|| ResolveError::InvalidVideoId(source_url.to_string()))?;

        let Some(extractor) = &self.extractor else {
            return Err(ResolveError::NotImplemented);
        };

        let stream_url = extractor.extract(&video_id).await?;

        tracing::debug!(source_url, video_id = %video_id, "resolved stream url");

        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .put(source_url.to_string(), stream_url.clone());

        Ok(stream_url)
    }
}
