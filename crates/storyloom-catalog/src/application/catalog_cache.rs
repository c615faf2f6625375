//! Read-through TTL cache in front of the catalog store.
//!
//! One snapshot per language. A snapshot is replaced wholesale, so
//! concurrent misses for the same language race harmlessly: the last
//! writer wins and readers never observe a partial catalog.
//!
//! Expired snapshots are evicted on every miss, and at most
//! [`MAX_CACHED_LANGUAGES`] fresh ones are held at a time. Requests beyond
//! that are answered straight from the store.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use storyloom_core::catalog::GroupedCatalog;
use storyloom_core::clock::Clock;
use storyloom_core::error::DomainError;
use storyloom_core::repository::CatalogRepository;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use crate::domain::localization::group_entries;

/// Default maximum age of a cached snapshot.
pub const CATALOG_CACHE_TTL: Duration = Duration::from_secs(5);

/// Upper bound on distinct language snapshots held at once.
pub const MAX_CACHED_LANGUAGES: usize = 64;

struct CacheEntry {
    catalog: Arc<GroupedCatalog>,
    captured_at: DateTime<Utc>,
}

/// Caches grouped, localized catalog snapshots keyed by language tag.
pub struct ComponentCatalogCache {
    repository: Arc<dyn CatalogRepository>,
    clock: Arc<dyn Clock>,
    ttl: TimeDelta,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl std::fmt::Debug for ComponentCatalogCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentCatalogCache")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl ComponentCatalogCache {
    /// Creates a cache with the default TTL.
    #[must_use]
    pub fn new(repository: Arc<dyn CatalogRepository>, clock: Arc<dyn Clock>) -> Self {
        Self::with_ttl(repository, clock, CATALOG_CACHE_TTL)
    }

    /// Creates a cache whose snapshots stay fresh for `ttl`.
    #[must_use]
    pub fn with_ttl(
        repository: Arc<dyn CatalogRepository>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
    ) -> Self {
        Self {
            repository,
            clock,
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the catalog for `language`, served from cache while the
    /// snapshot is at most one TTL old and refetched otherwise.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the catalog store query
    /// fails. Nothing is cached in that case.
    pub async fn get(&self, language: &str) -> Result<Arc<GroupedCatalog>, DomainError> {
        if let Some(entry) = self.entries.read().await.get(language) {
            if self.clock.age_of(entry.captured_at) <= self.ttl {
                debug!(language, "serving catalog from cache");
                return Ok(Arc::clone(&entry.catalog));
            }
        }

        info!(language, "fetching catalog");
        let rows = self.repository.list_active().await.map_err(|e| {
            error!(language, error = %e, "catalog query failed");
            DomainError::Infrastructure(format!("failed to fetch available components: {e}"))
        })?;

        let catalog = Arc::new(group_entries(&rows, language));
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| self.clock.age_of(entry.captured_at) <= self.ttl);

        if entries.len() >= MAX_CACHED_LANGUAGES && !entries.contains_key(language) {
            debug!(language, cached = entries.len(), "catalog cache full; not caching");
            return Ok(catalog);
        }
        entries.insert(
            language.to_owned(),
            CacheEntry {
                catalog: Arc::clone(&catalog),
                captured_at: self.clock.now(),
            },
        );

        info!(language, rows = rows.len(), "cached catalog snapshot");
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use storyloom_test_support::{
        FailingCatalogRepository, ManualClock, StaticCatalogRepository, catalog_entry,
    };

    fn fixture() -> (Arc<StaticCatalogRepository>, Arc<ManualClock>, ComponentCatalogCache) {
        let repo = Arc::new(StaticCatalogRepository::new(vec![
            catalog_entry("knight", "hero", 1, &[("en", "Knight"), ("fr", "Chevalier")]),
            catalog_entry("forest", "place", 2, &[("en", "Forest")]),
        ]));
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
        ));
        let cache = ComponentCatalogCache::new(repo.clone(), clock.clone());
        (repo, clock, cache)
    }

    #[tokio::test]
    async fn test_second_get_within_ttl_hits_cache() {
        // Arrange
        let (repo, clock, cache) = fixture();

        // Act
        let first = cache.get("en").await.unwrap();
        clock.advance(TimeDelta::seconds(5));
        let second = cache.get("en").await.unwrap();

        // Assert
        assert_eq!(repo.query_count(), 1);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_get_after_ttl_requeries() {
        let (repo, clock, cache) = fixture();

        cache.get("en").await.unwrap();
        clock.advance(TimeDelta::milliseconds(5001));
        cache.get("en").await.unwrap();

        assert_eq!(repo.query_count(), 2);
    }

    #[tokio::test]
    async fn test_languages_are_cached_independently() {
        let (repo, _clock, cache) = fixture();

        let english = cache.get("en").await.unwrap();
        let french = cache.get("fr").await.unwrap();
        cache.get("fr").await.unwrap();

        assert_eq!(repo.query_count(), 2);
        assert_eq!(english.heroes[0].title, "Knight");
        assert_eq!(french.heroes[0].title, "Chevalier");
        // No French localization for the forest, so English is used.
        assert_eq!(french.places[0].title, "Forest");
    }

    #[tokio::test]
    async fn test_expired_languages_are_evicted_on_next_miss() {
        // Arrange
        let (_repo, clock, cache) = fixture();
        for i in 0..40 {
            cache.get(&format!("x-{i}")).await.unwrap();
        }

        // Act
        clock.advance(TimeDelta::hours(1));
        cache.get("en").await.unwrap();

        // Assert
        let entries = cache.entries.read().await;
        assert_eq!(entries.len(), 1);
        assert!(entries.contains_key("en"));
    }

    #[tokio::test]
    async fn test_distinct_languages_are_capped() {
        let (repo, _clock, cache) = fixture();

        for i in 0..MAX_CACHED_LANGUAGES + 10 {
            cache.get(&format!("x-{i}")).await.unwrap();
        }
        let overflow = cache.get("en").await.unwrap();
        cache.get("en").await.unwrap();

        assert_eq!(cache.entries.read().await.len(), MAX_CACHED_LANGUAGES);
        assert_eq!(overflow.heroes[0].title, "Knight");
        // Uncached languages still work, straight from the store.
        assert_eq!(repo.query_count(), MAX_CACHED_LANGUAGES + 12);
    }

    #[tokio::test]
    async fn test_store_failure_is_internal_and_not_cached() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache = ComponentCatalogCache::new(Arc::new(FailingCatalogRepository), clock);

        let result = cache.get("en").await;

        match result {
            Err(DomainError::Infrastructure(_)) => {}
            other => panic!("expected Infrastructure, got {other:?}"),
        }
        assert!(cache.entries.read().await.is_empty());
    }
}
