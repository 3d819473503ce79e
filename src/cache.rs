//! Response caching for routing and forecast collaborators.
//!
//! The cache is an injected dependency: wrap a provider in [`CachedRouter`]
//! or [`CachedForecast`] with any [`ResponseCache`]. Failed calls are never
//! cached.

use std::time::{Duration, Instant};

use chrono::NaiveDate;
use moka::Expiry;
use moka::sync::Cache;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ForecastError, RoutingError};
use crate::model::{DailyWeather, TransportMode, TravelSegment};
use crate::traits::{DurationMatrix, ForecastProvider, RoutingProvider};

/// Key/value store with per-entry expiry.
pub trait ResponseCache: Send + Sync {
    /// Returns `None` for misses and expired entries.
    fn get(&self, key: &str) -> Option<Vec<u8>>;

    fn put(&self, key: &str, value: Vec<u8>, ttl: Duration);
}

impl<C: ResponseCache + ?Sized> ResponseCache for std::sync::Arc<C> {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: Vec<u8>, ttl: Duration) {
        (**self).put(key, value, ttl)
    }
}

/// Fetch and decode a JSON value. Undecodable entries count as misses.
pub fn get_json<T: DeserializeOwned>(cache: &(impl ResponseCache + ?Sized), key: &str) -> Option<T> {
    let bytes = cache.get(key)?;
    match serde_json::from_slice(&bytes) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::debug!(key, error = %err, "discarding undecodable cache entry");
            None
        }
    }
}

pub fn put_json<T: Serialize>(cache: &(impl ResponseCache + ?Sized), key: &str, value: &T, ttl: Duration) {
    match serde_json::to_vec(value) {
        Ok(bytes) => cache.put(key, bytes, ttl),
        Err(err) => tracing::debug!(key, error = %err, "value not cacheable"),
    }
}

/// Default bound on [`MemoryCache`] entries.
pub const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

#[derive(Clone)]
struct StoredEntry {
    value: Vec<u8>,
    ttl: Duration,
}

/// Expires each entry after the TTL it was stored with.
struct EntryTtl;

impl Expiry<String, StoredEntry> for EntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &StoredEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &StoredEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// In-process cache, bounded by entry count. Expired and least-used entries
/// are evicted in the background.
#[derive(Clone)]
pub struct MemoryCache {
    entries: Cache<String, StoredEntry>,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl MemoryCache {
    pub fn new(max_capacity: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(EntryTtl)
            .build();
        Self { entries }
    }

    /// Live entries, after pending evictions have been applied.
    pub fn len(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResponseCache for MemoryCache {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        let entry = self.entries.get(key);
        tracing::debug!(key, hit = entry.is_some(), "cache lookup");
        entry.map(|entry| entry.value)
    }

    fn put(&self, key: &str, value: Vec<u8>, ttl: Duration) {
        if ttl.is_zero() {
            return;
        }
        self.entries
            .insert(key.to_string(), StoredEntry { value, ttl });
    }
}

fn coordinate_key(location: (f64, f64)) -> String {
    format!("{:.6},{:.6}", location.0, location.1)
}

/// Routing provider that serves repeated requests from a cache.
pub struct CachedRouter<R, C> {
    inner: R,
    cache: C,
    ttl: Duration,
}

impl<R, C> CachedRouter<R, C> {
    pub fn new(inner: R, cache: C, ttl: Duration) -> Self {
        Self { inner, cache, ttl }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

impl<R, C> RoutingProvider for CachedRouter<R, C>
where
    R: RoutingProvider,
    C: ResponseCache,
{
    fn segment(
        &self,
        origin: (f64, f64),
        destination: (f64, f64),
        mode: TransportMode,
    ) -> Result<TravelSegment, RoutingError> {
        let key = format!(
            "segment:{mode}:{}->{}",
            coordinate_key(origin),
            coordinate_key(destination)
        );
        if let Some(segment) = get_json(&self.cache, &key) {
            return Ok(segment);
        }

        let segment = self.inner.segment(origin, destination, mode)?;
        put_json(&self.cache, &key, &segment, self.ttl);
        Ok(segment)
    }

    fn duration_matrix(
        &self,
        locations: &[(f64, f64)],
        mode: TransportMode,
    ) -> Result<DurationMatrix, RoutingError> {
        let coords = locations
            .iter()
            .map(|location| coordinate_key(*location))
            .collect::<Vec<_>>()
            .join(";");
        let key = format!("matrix:{mode}:{coords}");
        if let Some(matrix) = get_json(&self.cache, &key) {
            return Ok(matrix);
        }

        let matrix = self.inner.duration_matrix(locations, mode)?;
        put_json(&self.cache, &key, &matrix, self.ttl);
        Ok(matrix)
    }
}

/// Forecast provider that serves repeated requests from a cache.
pub struct CachedForecast<F, C> {
    inner: F,
    cache: C,
    ttl: Duration,
}

impl<F, C> CachedForecast<F, C> {
    pub fn new(inner: F, cache: C, ttl: Duration) -> Self {
        Self { inner, cache, ttl }
    }
}

impl<F, C> ForecastProvider for CachedForecast<F, C>
where
    F: ForecastProvider,
    C: ResponseCache,
{
    fn daily_forecast(
        &self,
        location: (f64, f64),
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyWeather>, ForecastError> {
        let key = format!("forecast:{}:{start}:{end}", coordinate_key(location));
        if let Some(days) = get_json(&self.cache, &key) {
            return Ok(days);
        }

        let days = self.inner.daily_forecast(location, start, end)?;
        put_json(&self.cache, &key, &days, self.ttl);
        Ok(days)
    }
}
