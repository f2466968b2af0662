//! Nearby point-of-interest lookup backed by the Overpass API.
//!
//! [`PoiService`] is the entry point. It classifies raw OSM elements into a
//! fixed category catalog, caches nearby results per grid cell, and spaces
//! outbound requests so the public backend is not hammered.

pub mod cache;
pub mod category;
pub mod client;
pub mod config;
pub mod error;
pub mod geo;
pub mod poi;
pub mod rate_limit;
pub mod service;
pub mod types;

pub use cache::{cache_key, CacheEntry, CacheStats, Clock, SystemClock};
pub use category::{categories, category_by_id, determine_category, Category, ALL_CATEGORY_ID};
pub use client::{OverpassClient, DEFAULT_OVERPASS_URL};
pub use config::PoiServiceConfig;
pub use error::PoiError;
pub use geo::{format_distance, grid_cell_id, haversine_meters, GeoPoint};
pub use poi::{Distance, Poi, PoiSource, ResultSource, SearchResult};
pub use rate_limit::RequestGate;
pub use service::{spawn_cache_sweeper, NearbyOptions, PoiService};
