//! Cached schedule provider implementation
//!
//! This module provides a caching wrapper for schedule providers that
//! automatically stores and retrieves daily schedules from a local cache.

use super::{Episode, ScheduleError, ScheduleProvider};
use crate::cache::CacheStorage;
use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::debug;

/// A caching wrapper for schedule providers
///
/// This provider wraps another schedule provider and caches the results
/// to avoid redundant network requests. The cache is persistent across
/// application runs; entries expire with the TTL configured on the
/// underlying storage.
pub struct CachedScheduleProvider<P>
where
    P: ScheduleProvider,
{
    /// The underlying schedule provider
    provider: P,
    /// Cache storage for daily schedules
    cache: CacheStorage<Vec<Episode>>,
}

impl<P> CachedScheduleProvider<P>
where
    P: ScheduleProvider,
{
    /// Creates a new cached schedule provider wrapping the given provider
    ///
    /// # Arguments
    ///
    /// * `provider` - The schedule provider to wrap
    /// * `cache` - The cache storage to use for caching
    pub fn new(provider: P, cache: CacheStorage<Vec<Episode>>) -> Self {
        Self { provider, cache }
    }

    /// Generates a cache key for a schedule query
    fn cache_key(country: &str, date: NaiveDate) -> String {
        format!("{}_{}", country, date.format("%Y-%m-%d"))
    }
}

#[async_trait]
impl<P> ScheduleProvider for CachedScheduleProvider<P>
where
    P: ScheduleProvider,
{
    async fn current_schedule(
        &self,
        country: &str,
        date: NaiveDate,
    ) -> Result<Vec<Episode>, ScheduleError> {
        // Generate cache key
        let cache_key = Self::cache_key(country, date);

        // Try to load from cache
        match self.cache.load(&cache_key) {
            Ok(Some(episodes)) => {
                // Cache hit - return cached data
                debug!(key = cache_key, "schedule served from cache");
                return Ok(episodes);
            }
            Ok(None) => {
                // Cache miss - continue to fetch from provider
            }
            Err(_) => {
                // Cache read error - continue to fetch from provider.
                // Cache failures must never prevent schedule retrieval.
            }
        }

        // Fetch from underlying provider
        let episodes = self.provider.current_schedule(country, date).await?;

        // Store in cache (ignore errors to avoid failing the request)
        let _ = self.cache.store(&cache_key, &episodes);

        Ok(episodes)
    }
}
