//! The public POI service: nearby lookup with caching, free-text search,
//! and category catalog access.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::task::JoinHandle;

use crate::cache::{cache_key, CacheStats, Clock, PoiCache, SystemClock};
use crate::category::{categories, category_by_id, Category, CategoryFilter, ALL_CATEGORY_ID};
use crate::client::{name_search_query, nearby_query, OverpassClient};
use crate::config::PoiServiceConfig;
use crate::error::PoiError;
use crate::geo::GeoPoint;
use crate::poi::{element_to_poi, sort_by_distance, Poi, PoiSource, ResultSource, SearchResult};
use crate::rate_limit::RequestGate;
use crate::types::OverpassElement;

pub const DEFAULT_NEARBY_RADIUS_M: u32 = 1000;
pub const DEFAULT_NEARBY_LIMIT: usize = 20;
pub const DEFAULT_SEARCH_RADIUS_M: u32 = 2000;

/// Parameters for [`PoiService::get_nearby_pois`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NearbyOptions {
    pub radius: u32,
    /// Category ids; `"all"` or an empty list means every category.
    pub categories: Vec<String>,
    pub limit: usize,
    /// When `false`, POIs keep backend order and carry no distance.
    pub include_distance: bool,
}

impl Default for NearbyOptions {
    fn default() -> Self {
        Self {
            radius: DEFAULT_NEARBY_RADIUS_M,
            categories: vec![ALL_CATEGORY_ID.to_owned()],
            limit: DEFAULT_NEARBY_LIMIT,
            include_distance: true,
        }
    }
}

pub struct PoiService {
    client: OverpassClient,
    gate: RequestGate,
    cache: PoiCache,
    query_timeout_secs: u32,
}

impl PoiService {
    /// # Errors
    ///
    /// Returns an error if the configured endpoint is not a valid URL or the
    /// HTTP client cannot be built.
    pub fn new(config: PoiServiceConfig) -> Result<Self, PoiError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Same as [`PoiService::new`] with an explicit clock for cache expiry.
    ///
    /// # Errors
    ///
    /// See [`PoiService::new`].
    pub fn with_clock(config: PoiServiceConfig, clock: Arc<dyn Clock>) -> Result<Self, PoiError> {
        let client = OverpassClient::new(
            &config.endpoint,
            config.request_timeout,
            &config.user_agent,
        )?;
        let ttl = TimeDelta::from_std(config.cache_ttl).unwrap_or(TimeDelta::MAX);
        Ok(Self {
            client,
            gate: RequestGate::new(config.min_request_interval),
            cache: PoiCache::new(ttl, clock),
            query_timeout_secs: config.query_timeout_secs,
        })
    }

    /// POIs near (`lat`, `lng`), served from cache when a fresh entry exists.
    ///
    /// On a backend failure an expired entry for the same key is returned
    /// instead, with every POI marked [`PoiSource::Cache`]. Cached lists are
    /// re-sorted and truncated to match `options` before they are returned.
    ///
    /// # Errors
    ///
    /// - [`PoiError::InvalidRequest`] for out-of-range coordinates, a zero
    ///   radius or limit, or an unknown category id.
    /// - [`PoiError::Fetch`] wrapping the backend failure when no cached
    ///   entry exists for the key.
    pub async fn get_nearby_pois(
        &self,
        lat: f64,
        lng: f64,
        options: &NearbyOptions,
    ) -> Result<SearchResult, PoiError> {
        let center = validated_center(lat, lng)?;
        if options.radius == 0 {
            return Err(PoiError::invalid("radius must be positive"));
        }
        if options.limit == 0 {
            return Err(PoiError::invalid("limit must be positive"));
        }
        let filter = CategoryFilter::from_ids(&options.categories)?;
        let requested = match &filter {
            CategoryFilter::Any => vec![ALL_CATEGORY_ID.to_owned()],
            CategoryFilter::Only(_) => options.categories.clone(),
        };
        let key = cache_key(center, options.radius, &requested);

        if let Some(entry) = self.cache.get_fresh(&key) {
            tracing::debug!(key = %key, pois = entry.pois.len(), "nearby cache hit");
            let pois = shape_for_request(entry.pois, center, options);
            return Ok(SearchResult {
                total: pois.len(),
                pois,
                radius: options.radius,
                center,
                categories: requested,
                source: ResultSource::Cache,
                timestamp: entry.created_at,
            });
        }

        match self.fetch_nearby(center, options, &filter).await {
            Ok(pois) => {
                let timestamp = self.cache.insert(key, pois.clone(), requested.clone());
                Ok(SearchResult {
                    total: pois.len(),
                    pois,
                    radius: options.radius,
                    center,
                    categories: requested,
                    source: ResultSource::Api,
                    timestamp,
                })
            }
            Err(error) => {
                let Some(entry) = self.cache.get_any(&key) else {
                    tracing::error!(key = %key, error = %error, "nearby fetch failed with no cached fallback");
                    return Err(error.into_fetch());
                };
                tracing::warn!(
                    key = %key,
                    error = %error,
                    cached_at = %entry.created_at,
                    "nearby fetch failed, serving stale cache entry"
                );
                let mut pois = shape_for_request(entry.pois, center, options);
                for poi in &mut pois {
                    poi.source = PoiSource::Cache;
                }
                Ok(SearchResult {
                    total: pois.len(),
                    pois,
                    radius: options.radius,
                    center,
                    categories: requested,
                    source: ResultSource::Cache,
                    timestamp: entry.created_at,
                })
            }
        }
    }

    /// Case-insensitive name search around a point, sorted by distance.
    ///
    /// Results are never cached. Pass `None` for the default 2 km radius.
    ///
    /// # Errors
    ///
    /// Every failure, validation included, is returned as [`PoiError::Search`]
    /// wrapping the cause.
    pub async fn search_pois(
        &self,
        query: &str,
        lat: f64,
        lng: f64,
        radius: Option<u32>,
    ) -> Result<Vec<Poi>, PoiError> {
        self.run_search(query, lat, lng, radius.unwrap_or(DEFAULT_SEARCH_RADIUS_M))
            .await
            .map_err(|error| {
                tracing::error!(query, error = %error, "POI search failed");
                error.into_search()
            })
    }

    /// The category catalog, wildcard first.
    #[must_use]
    pub fn get_categories(&self) -> &'static [&'static Category] {
        categories()
    }

    #[must_use]
    pub fn get_category_by_id(&self, id: &str) -> Option<&'static Category> {
        category_by_id(id)
    }

    /// Drops expired cache entries and returns how many were removed.
    pub fn clear_expired_cache(&self) -> usize {
        let removed = self.cache.clear_expired();
        tracing::debug!(removed, "cleared expired cache entries");
        removed
    }

    /// Drops every cache entry and returns how many were removed.
    pub fn clear_all_cache(&self) -> usize {
        let removed = self.cache.clear_all();
        tracing::info!(removed, "cleared POI cache");
        removed
    }

    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    async fn fetch_nearby(
        &self,
        center: GeoPoint,
        options: &NearbyOptions,
        filter: &CategoryFilter,
    ) -> Result<Vec<Poi>, PoiError> {
        let query = nearby_query(
            &filter.query_categories(),
            center,
            options.radius,
            self.query_timeout_secs,
        );
        let elements = self.send(&query).await?;
        let fetched_at = self.cache.now();
        let mut pois = into_pois(elements, filter, fetched_at);
        if options.include_distance {
            sort_by_distance(&mut pois, center);
        }
        pois.truncate(options.limit);
        tracing::info!(
            lat = center.lat,
            lng = center.lng,
            radius = options.radius,
            pois = pois.len(),
            "fetched nearby POIs"
        );
        Ok(pois)
    }

    async fn run_search(
        &self,
        text: &str,
        lat: f64,
        lng: f64,
        radius: u32,
    ) -> Result<Vec<Poi>, PoiError> {
        let center = validated_center(lat, lng)?;
        if text.trim().is_empty() {
            return Err(PoiError::invalid("search text must not be empty"));
        }
        if radius == 0 {
            return Err(PoiError::invalid("radius must be positive"));
        }

        let query = name_search_query(text, center, radius, self.query_timeout_secs);
        let elements = self.send(&query).await?;
        let mut pois = into_pois(elements, &CategoryFilter::Any, self.cache.now());
        sort_by_distance(&mut pois, center);
        tracing::info!(text, radius, pois = pois.len(), "POI search complete");
        Ok(pois)
    }

    /// Single outbound path; every backend request waits its turn here.
    async fn send(&self, query: &str) -> Result<Vec<OverpassElement>, PoiError> {
        self.gate.wait_turn().await;
        self.client.fetch_elements(query).await
    }
}

/// Periodically drops expired cache entries until the handle is aborted.
pub fn spawn_cache_sweeper(service: Arc<PoiService>, period: Duration) -> JoinHandle<()> {
    let period = period.max(Duration::from_millis(10));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // first tick fires immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed = service.clear_expired_cache();
            if removed > 0 {
                tracing::info!(removed, "cache sweeper removed expired entries");
            }
        }
    })
}

fn validated_center(lat: f64, lng: f64) -> Result<GeoPoint, PoiError> {
    let center = GeoPoint::new(lat, lng);
    if center.is_valid() {
        Ok(center)
    } else {
        Err(PoiError::invalid(format!(
            "coordinates out of range: lat={lat}, lng={lng}"
        )))
    }
}

/// Applies a request's distance and limit options to a cached POI list.
fn shape_for_request(mut pois: Vec<Poi>, center: GeoPoint, options: &NearbyOptions) -> Vec<Poi> {
    if options.include_distance {
        sort_by_distance(&mut pois, center);
    } else {
        for poi in &mut pois {
            poi.distance = None;
        }
    }
    pois.truncate(options.limit);
    pois
}

/// Converts elements to POIs, keeping the first occurrence of each id.
fn into_pois(
    elements: Vec<OverpassElement>,
    filter: &CategoryFilter,
    fetched_at: DateTime<Utc>,
) -> Vec<Poi> {
    let mut seen = HashSet::new();
    elements
        .into_iter()
        .filter_map(|element| element_to_poi(element, filter, fetched_at))
        .filter(|poi| seen.insert(poi.id.clone()))
        .collect()
}
