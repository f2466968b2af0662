//! POI records and conversion from raw Overpass elements.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::category::{determine_category, Category, CategoryFilter};
use crate::geo::{format_distance, haversine_meters, GeoPoint};
use crate::types::OverpassElement;

/// Tags tried in order for a POI's display name. The local-language name wins,
/// then the English name, then whatever identifies the operator.
const NAME_TAGS: &[&str] = &["name", "name:id", "name:en", "brand", "operator"];

/// Address parts, joined in this order.
const ADDRESS_TAGS: &[&str] = &[
    "addr:street",
    "addr:housenumber",
    "addr:suburb",
    "addr:city",
    "addr:state",
];

/// Where a POI record came from.
///
/// `Cache` marks POIs served from an expired cache entry after a failed
/// fetch, so callers can tell they may be out of date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PoiSource {
    Overpass,
    Cache,
    Manual,
}

/// Whether a [`SearchResult`] was fetched just now or served from the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    Api,
    Cache,
}

/// Distance from the search center.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distance {
    pub meters: f64,
    /// `"350m"`, `"1.2km"`.
    pub formatted: String,
}

impl Distance {
    #[must_use]
    pub fn from_meters(meters: f64) -> Self {
        Self {
            meters,
            formatted: format_distance(meters),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Poi {
    /// `{element type}/{element id}`, e.g. `node/123`.
    pub id: String,
    pub name: String,
    pub category: &'static Category,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub tags: BTreeMap<String, String>,
    pub source: PoiSource,
    pub last_updated: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<Distance>,
}

impl Poi {
    #[must_use]
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    /// Sets [`Poi::distance`] relative to `center`.
    pub fn annotate_distance(&mut self, center: GeoPoint) {
        self.distance = Some(Distance::from_meters(haversine_meters(
            center,
            self.location(),
        )));
    }

    /// A hand-entered place, e.g. a pin the user dropped on the map.
    #[must_use]
    pub fn manual(
        name: &str,
        category: &'static Category,
        location: GeoPoint,
        entered_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: format!("manual/{:.6},{:.6}", location.lat, location.lng),
            name: name.trim().to_owned(),
            category,
            latitude: location.lat,
            longitude: location.lng,
            address: None,
            tags: BTreeMap::new(),
            source: PoiSource::Manual,
            last_updated: entered_at,
            distance: None,
        }
    }

    fn distance_meters(&self) -> f64 {
        self.distance.as_ref().map_or(f64::INFINITY, |d| d.meters)
    }
}

/// A list of POIs plus the parameters that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub pois: Vec<Poi>,
    pub total: usize,
    pub radius: u32,
    pub center: GeoPoint,
    pub categories: Vec<String>,
    pub source: ResultSource,
    pub timestamp: DateTime<Utc>,
}

/// Converts one element into a POI.
///
/// Returns `None` when the element has no usable coordinates, matches no
/// category rule, or resolves to a category the filter does not admit.
pub(crate) fn element_to_poi(
    element: OverpassElement,
    filter: &CategoryFilter,
    fetched_at: DateTime<Utc>,
) -> Option<Poi> {
    let (latitude, longitude) = element.coordinates()?;
    let category = determine_category(&element.tags)?;
    if !filter.admits(category) {
        return None;
    }

    let id = element.stable_id();
    let name = first_tag(&element.tags, NAME_TAGS).map_or_else(
        || format!("{} at {latitude:.5}, {longitude:.5}", category.name_en),
        str::to_owned,
    );
    let address = join_address(&element.tags);

    Some(Poi {
        id,
        name,
        category,
        latitude,
        longitude,
        address,
        tags: element.tags,
        source: PoiSource::Overpass,
        last_updated: fetched_at,
        distance: None,
    })
}

/// First non-blank value among `keys`, in order.
fn first_tag<'a>(tags: &'a BTreeMap<String, String>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| tags.get(*key))
        .map(|value| value.trim())
        .find(|value| !value.is_empty())
}

fn join_address(tags: &BTreeMap<String, String>) -> Option<String> {
    let parts: Vec<&str> = ADDRESS_TAGS
        .iter()
        .filter_map(|key| tags.get(*key))
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

/// Annotates every POI with its distance from `center` and sorts ascending.
///
/// Equal distances fall back to category priority, then id, so ordering is
/// deterministic.
pub(crate) fn sort_by_distance(pois: &mut [Poi], center: GeoPoint) {
    for poi in pois.iter_mut() {
        poi.annotate_distance(center);
    }
    pois.sort_by(|a, b| {
        a.distance_meters()
            .partial_cmp(&b.distance_meters())
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.category.priority.cmp(&b.category.priority))
            .then_with(|| a.id.cmp(&b.id))
    });
}
