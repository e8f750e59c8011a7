//! Spatial math for route geometry.

use crate::models::GeoPoint;

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculate distance between two points in meters (Haversine formula).
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();

    let a = (dphi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Evenly spaced points from `start` to `end`, both included.
pub fn interpolate(start: GeoPoint, end: GeoPoint, segments: usize) -> Vec<GeoPoint> {
    let segments = segments.max(1);
    (0..=segments)
        .map(|i| {
            let t = i as f64 / segments as f64;
            GeoPoint {
                lat: start.lat + (end.lat - start.lat) * t,
                lon: start.lon + (end.lon - start.lon) * t,
            }
        })
        .collect()
}
