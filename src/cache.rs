//! Weather fetch cache
//!
//! Raw observation fetches are cached by `(geocode, start, end)`, optionally
//! under a source namespace so that entries written for one input file are
//! never served for another. The cache is injected into a [`WeatherSource`]
//! through [`CachedWeatherSource`]; the scoring engine never sees it.

use std::collections::HashMap;
use std::fmt::Debug;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use fjall::Keyspace;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tokio::sync::RwLock;
use tokio::task;

use crate::analysis::WeatherSource;
use crate::error::SitePotentialError;
use crate::models::{DateRange, Site, WeatherObservationSet};

/// Key of one raw weather fetch
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WeatherCacheKey {
    /// Empty for the default namespace
    pub namespace: String,
    pub geocode: String,
    pub range: DateRange,
}

impl WeatherCacheKey {
    #[must_use]
    pub fn new(geocode: &str, range: &DateRange) -> Self {
        Self {
            namespace: String::new(),
            geocode: geocode.trim().to_string(),
            range: *range,
        }
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    #[must_use]
    pub fn to_key(&self) -> String {
        if self.namespace.is_empty() {
            format!("weather:{}:{}:{}", self.geocode, self.range.start, self.range.end)
        } else {
            format!(
                "weather:{}:{}:{}:{}",
                self.namespace, self.geocode, self.range.start, self.range.end
            )
        }
    }
}

/// Storage for raw weather fetches
#[async_trait]
pub trait WeatherCache: Send + Sync {
    async fn get(&self, key: &WeatherCacheKey) -> crate::Result<Option<WeatherObservationSet>>;

    async fn put(&self, key: &WeatherCacheKey, value: &WeatherObservationSet) -> crate::Result<()>;
}

#[async_trait]
impl<T: WeatherCache + ?Sized> WeatherCache for Arc<T> {
    async fn get(&self, key: &WeatherCacheKey) -> crate::Result<Option<WeatherObservationSet>> {
        (**self).get(key).await
    }

    async fn put(&self, key: &WeatherCacheKey, value: &WeatherObservationSet) -> crate::Result<()> {
        (**self).put(key, value).await
    }
}

/// Process-local cache without expiry
#[derive(Debug, Default)]
pub struct MemoryWeatherCache {
    entries: RwLock<HashMap<WeatherCacheKey, WeatherObservationSet>>,
}

impl MemoryWeatherCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl WeatherCache for MemoryWeatherCache {
    async fn get(&self, key: &WeatherCacheKey) -> crate::Result<Option<WeatherObservationSet>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &WeatherCacheKey, value: &WeatherObservationSet) -> crate::Result<()> {
        self.entries.write().await.insert(key.clone(), value.clone());
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct StoredEntry<T> {
    value: T,
    expires_at: u64, // Unix timestamp (seconds)
}

/// On-disk cache backed by a `fjall` keyspace, entries expire after a TTL
pub struct PersistentWeatherCache {
    store: Keyspace,
    ttl: Duration,
}

fn get_from_store(store: Keyspace, key: Vec<u8>) -> Result<Option<Vec<u8>>> {
    Ok(store.get(key)?.map(|v| v.to_vec()))
}

impl PersistentWeatherCache {
    /// Open (or create) the cache database at `path`
    pub fn open(path: impl AsRef<Path>, ttl: Duration) -> Result<Self> {
        let db = fjall::Database::builder(&path).open()?;
        let items = db.keyspace("weather", fjall::KeyspaceCreateOptions::default)?;
        Ok(PersistentWeatherCache { store: items, ttl })
    }

    /// Stores a serializable value with the configured time-to-live
    #[tracing::instrument(name = "put_cache", level = "debug", skip(self, value))]
    pub async fn put<T: Serialize + Send + Debug + 'static>(&self, key: &str, value: T) -> Result<()> {
        let store = self.store.clone();
        let key = key.as_bytes().to_vec();
        let expires_at = SystemTime::now()
            .checked_add(self.ttl)
            .ok_or(anyhow!("TTL overflow"))?
            .duration_since(UNIX_EPOCH)?
            .as_secs();
        let entry = StoredEntry { value, expires_at };
        let bytes = postcard::to_stdvec(&entry)?;

        task::spawn_blocking(move || store.insert(key, bytes)).await??;
        Ok(())
    }

    /// Retrieves a value if it exists and has not expired
    #[tracing::instrument(name = "query_cache", level = "debug", skip(self))]
    pub async fn get<T: DeserializeOwned + Send + 'static>(&self, key: &str) -> Result<Option<T>> {
        let store = self.store.clone();
        let key_bytes = key.as_bytes().to_vec();

        let maybe_bytes: Option<Vec<u8>> =
            task::spawn_blocking(move || get_from_store(store, key_bytes)).await??;

        let Some(bytes) = maybe_bytes else {
            tracing::debug!("Key not found");
            return Ok(None);
        };

        let entry: StoredEntry<T> = postcard::from_bytes(&bytes)?;
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();

        if now < entry.expires_at {
            tracing::debug!("Key found and still fresh");
            Ok(Some(entry.value))
        } else {
            tracing::debug!("Key found but expired");
            self.remove(key).await?;
            Ok(None)
        }
    }

    /// Manually removes a key from the cache
    pub async fn remove(&self, key: &str) -> Result<()> {
        let key = key.as_bytes().to_vec();
        let store = self.store.clone();
        task::spawn_blocking(move || store.remove(key)).await??;
        Ok(())
    }
}

fn cache_error(err: anyhow::Error) -> SitePotentialError {
    SitePotentialError::cache(format!("{err:#}"))
}

#[async_trait]
impl WeatherCache for PersistentWeatherCache {
    async fn get(&self, key: &WeatherCacheKey) -> crate::Result<Option<WeatherObservationSet>> {
        PersistentWeatherCache::get(self, &key.to_key()).await.map_err(cache_error)
    }

    async fn put(&self, key: &WeatherCacheKey, value: &WeatherObservationSet) -> crate::Result<()> {
        PersistentWeatherCache::put(self, &key.to_key(), value.clone())
            .await
            .map_err(cache_error)
    }
}

/// Wraps a weather source with read-through caching
pub struct CachedWeatherSource<S, C> {
    inner: S,
    cache: C,
    namespace: String,
}

impl<S, C> CachedWeatherSource<S, C> {
    pub fn new(inner: S, cache: C) -> Self {
        Self {
            inner,
            cache,
            namespace: String::new(),
        }
    }

    /// Scope every key to `namespace`, e.g. a content hash of the backing data
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }
}

#[async_trait]
impl<S, C> WeatherSource for CachedWeatherSource<S, C>
where
    S: WeatherSource,
    C: WeatherCache,
{
    async fn observations(
        &self,
        site: &Site,
        range: &DateRange,
    ) -> crate::Result<Option<WeatherObservationSet>> {
        let key = WeatherCacheKey::new(&site.geocode, range).with_namespace(self.namespace.as_str());

        match self.cache.get(&key).await {
            Ok(Some(cached)) => {
                tracing::debug!(key = %key.to_key(), "Weather cache hit");
                return Ok(Some(cached));
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(key = %key.to_key(), error = %e, "Weather cache read failed"),
        }

        let fetched = self.inner.observations(site, range).await?;
        if let Some(set) = fetched.as_ref().filter(|s| !s.is_empty()) {
            if let Err(e) = self.cache.put(&key, set).await {
                tracing::warn!(key = %key.to_key(), error = %e, "Weather cache write failed");
            }
        }
        Ok(fetched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WeatherObservation;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn range() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        )
        .unwrap()
    }

    fn observations() -> WeatherObservationSet {
        WeatherObservationSet::new(vec![WeatherObservation {
            temperature: Some(28.0),
            wind_speed: Some(5.5),
            ..Default::default()
        }])
    }

    struct CountingSource {
        calls: AtomicUsize,
        result: Option<WeatherObservationSet>,
    }

    #[async_trait]
    impl WeatherSource for CountingSource {
        async fn observations(
            &self,
            _site: &Site,
            _range: &DateRange,
        ) -> crate::Result<Option<WeatherObservationSet>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.result.clone())
        }
    }

    #[test]
    fn test_cache_key_format() {
        let key = WeatherCacheKey::new(" 35.4937,-118.8591 ", &range());
        assert_eq!(key.to_key(), "weather:35.4937,-118.8591:2024-06-01:2024-06-30");

        let scoped = key.clone().with_namespace("3f2a");
        assert_eq!(scoped.to_key(), "weather:3f2a:35.4937,-118.8591:2024-06-01:2024-06-30");
        assert_ne!(scoped, key);
    }

    #[tokio::test]
    async fn test_namespaces_do_not_share_entries() {
        let cache = Arc::new(MemoryWeatherCache::new());
        let site = Site::new("Phoenix, AZ", "33.4484,-112.0740");
        let source = |temperature: f64| CountingSource {
            calls: AtomicUsize::new(0),
            result: Some(WeatherObservationSet::new(vec![WeatherObservation {
                temperature: Some(temperature),
                ..Default::default()
            }])),
        };

        let old = CachedWeatherSource::new(source(30.0), cache.clone()).with_namespace("old");
        let new = CachedWeatherSource::new(source(35.0), cache.clone()).with_namespace("new");
        old.observations(&site, &range()).await.unwrap();
        let fetched = new.observations(&site, &range()).await.unwrap().unwrap();

        assert_eq!(fetched.samples[0].temperature, Some(35.0));
        assert_eq!(new.inner.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn test_memory_cache_round_trip() {
        let cache = MemoryWeatherCache::new();
        let key = WeatherCacheKey::new("33.4484,-112.0740", &range());

        assert!(cache.get(&key).await.unwrap().is_none());
        cache.put(&key, &observations()).await.unwrap();
        assert_eq!(cache.get(&key).await.unwrap(), Some(observations()));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_cached_source_fetches_once() {
        let source = CountingSource {
            calls: AtomicUsize::new(0),
            result: Some(observations()),
        };
        let cached = CachedWeatherSource::new(source, MemoryWeatherCache::new());
        let site = Site::new("Phoenix, AZ", "33.4484,-112.0740");

        let first = cached.observations(&site, &range()).await.unwrap();
        let second = cached.observations(&site, &range()).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cached_source_does_not_store_misses() {
        let source = CountingSource {
            calls: AtomicUsize::new(0),
            result: None,
        };
        let cached = CachedWeatherSource::new(source, MemoryWeatherCache::new());
        let site = Site::new("Nowhere", "0,0");

        assert!(cached.observations(&site, &range()).await.unwrap().is_none());
        assert!(cached.observations(&site, &range()).await.unwrap().is_none());
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cached.cache().len().await, 0);
    }

    #[tokio::test]
    async fn test_persistent_cache_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PersistentWeatherCache::open(dir.path(), Duration::from_secs(3600)).unwrap();
        let key = WeatherCacheKey::new("40.0150,-105.2705", &range());

        assert!(WeatherCache::get(&cache, &key).await.unwrap().is_none());
        WeatherCache::put(&cache, &key, &observations()).await.unwrap();
        assert_eq!(WeatherCache::get(&cache, &key).await.unwrap(), Some(observations()));
    }

    #[tokio::test]
    async fn test_persistent_cache_expires_entries() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PersistentWeatherCache::open(dir.path(), Duration::ZERO).unwrap();

        cache.put("expired", 42_u32).await.unwrap();
        assert_eq!(cache.get::<u32>("expired").await.unwrap(), None);
    }
}
