//! Great-circle distance, distance labels, and the spatial grid used for
//! cache keys.
//!
//! The grid quantizes latitude and longitude independently into fixed
//! 500-meter buckets (measured along a meridian), so searches started a few
//! meters apart land in the same cell and share cached results.

use serde::Serialize;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Edge length of one cache grid cell.
pub const GRID_CELL_METERS: u32 = 500;

const METERS_PER_DEGREE: f64 = 111_320.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// `true` for finite coordinates inside the WGS84 range.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Haversine distance between two points on a spherical Earth, in meters.
#[must_use]
pub fn haversine_meters(from: GeoPoint, to: GeoPoint) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lng = (to.lng - from.lng).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + from.lat.to_radians().cos() * to.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}

/// Human-readable distance: whole meters below 1 km, one-decimal
/// kilometers from 1 km up.
#[must_use]
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{}m", meters.round())
    } else {
        format!("{:.1}km", meters / 1000.0)
    }
}

/// Grid cell id for a search, e.g. `-1392_23855_2`.
///
/// The trailing component is the radius expressed in whole cells, rounded up.
/// Two radii that round to the same cell count share the id; this is an
/// approximation, not a precision guarantee.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn grid_cell_id(center: GeoPoint, radius_m: u32) -> String {
    let cell_degrees = f64::from(GRID_CELL_METERS) / METERS_PER_DEGREE;
    let cell_lat = (center.lat / cell_degrees).floor() as i64;
    let cell_lng = (center.lng / cell_degrees).floor() as i64;
    format!("{cell_lat}_{cell_lng}_{}", radius_cells(radius_m))
}

/// Radius rounded up to a whole number of grid cells.
#[must_use]
pub fn radius_cells(radius_m: u32) -> u32 {
    radius_m.div_ceil(GRID_CELL_METERS)
}
