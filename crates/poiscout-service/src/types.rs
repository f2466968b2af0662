//! Overpass API response types.
//!
//! ## Observed shape
//!
//! `[out:json]` queries return `{"version": .., "generator": .., "elements": [..]}`.
//! Each element carries `type` (`node`, `way`, `relation`) and a numeric `id`.
//! Nodes have top-level `lat` / `lon`; ways and relations only carry
//! coordinates when the query ends with `out center`, in which case they
//! appear under a nested `center` object. `tags` is a flat string map and is
//! omitted entirely for untagged elements.
//!
//! The element list is kept as raw JSON values so one malformed element
//! (unexpected type, non-string tag, missing id) can be skipped without
//! failing the whole response.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Top-level Overpass response envelope.
#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<serde_json::Value>,
    /// Set by Overpass when the query hit a runtime error or timeout.
    #[serde(default)]
    pub remark: Option<String>,
}

/// OSM element kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Node,
    Way,
    Relation,
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElementType::Node => write!(f, "node"),
            ElementType::Way => write!(f, "way"),
            ElementType::Relation => write!(f, "relation"),
        }
    }
}

/// A single tagged element as returned by Overpass.
#[derive(Debug, Clone, Deserialize)]
pub struct OverpassElement {
    #[serde(rename = "type")]
    pub element_type: ElementType,
    pub id: i64,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub center: Option<ElementCenter>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ElementCenter {
    pub lat: f64,
    pub lon: f64,
}

impl OverpassResponse {
    /// Decodes each element independently, dropping the ones that do not fit
    /// [`OverpassElement`].
    #[must_use]
    pub fn into_elements(self) -> Vec<OverpassElement> {
        let total = self.elements.len();
        let parsed: Vec<OverpassElement> = self
            .elements
            .into_iter()
            .filter_map(|value| serde_json::from_value::<OverpassElement>(value).ok())
            .collect();
        if parsed.len() < total {
            tracing::debug!(
                skipped = total - parsed.len(),
                total,
                "skipped malformed Overpass elements"
            );
        }
        parsed
    }
}

impl OverpassElement {
    /// Point coordinates as `(lat, lon)`.
    ///
    /// Prefers the element's own coordinates and falls back to `center`.
    /// Non-finite or out-of-range values count as missing.
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let direct = match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        };
        direct
            .filter(|&(lat, lon)| in_range(lat, lon))
            .or_else(|| {
                self.center
                    .map(|c| (c.lat, c.lon))
                    .filter(|&(lat, lon)| in_range(lat, lon))
            })
    }

    /// Stable identifier such as `node/123`.
    #[must_use]
    pub fn stable_id(&self) -> String {
        format!("{}/{}", self.element_type, self.id)
    }
}

fn in_range(lat: f64, lon: f64) -> bool {
    lat.is_finite()
        && lon.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lon)
}
