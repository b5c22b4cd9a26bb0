//! Great-circle distance and service-area containment
//!
//! Distances use the haversine formula on a spherical Earth of radius
//! 6371 km. Everything here is pure.

use crate::constants::geo::EARTH_RADIUS_KM;
use crate::coord::{Coordinates, ReferencePoint, ServiceArea};

/// Calculate the distance between two points in kilometers (Haversine formula)
///
/// # Arguments
/// * `a` - First point
/// * `b` - Second point
///
/// # Returns
/// Distance in kilometers. Symmetric, and zero for identical points.
pub fn distance_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    // Rounding can push h just past 1 for antipodal points
    let h = ((delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2))
    .clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Check if a point is within `max_distance_km` of any reference point
///
/// Stops at the first reference in range. An empty reference list never
/// matches.
pub fn is_within_allowed_distance(
    point: Coordinates,
    references: &[ReferencePoint],
    max_distance_km: f64,
) -> bool {
    references
        .iter()
        .any(|reference| distance_km(point, reference.coords()) <= max_distance_km)
}

/// Check if a point lies inside a service area
pub fn is_within_service_area(point: Coordinates, area: &ServiceArea) -> bool {
    is_within_allowed_distance(point, area.points(), area.max_distance_km())
}

/// Find the reference point closest to `point`
///
/// # Returns
/// The nearest reference and its distance in kilometers, or None if the
/// list is empty
pub fn nearest_reference(
    point: Coordinates,
    references: &[ReferencePoint],
) -> Option<(&ReferencePoint, f64)> {
    references
        .iter()
        .map(|reference| (reference, distance_km(point, reference.coords())))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}
