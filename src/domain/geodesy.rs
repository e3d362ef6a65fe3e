//! Great-circle helpers on a spherical Earth.
//!
//! Coordinates are decimal degrees; bearings are degrees clockwise from true
//! north. Everything here is a pure function of its inputs.

use serde::{Deserialize, Serialize};

/// Earth's mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A (longitude, latitude) pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn lon_lat(&self) -> (f64, f64) {
        (self.lon, self.lat)
    }

    pub fn lat_lon(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }
}

/// Wrap an angle into `[0, 360)`.
pub fn normalize_bearing(deg: f64) -> f64 {
    ((deg % 360.0) + 360.0) % 360.0
}

/// Point reached by travelling `distance_km` from `origin` along the initial
/// great-circle bearing `bearing_deg`.
///
/// Any real bearing is accepted; `b` and `b + 360` land on the same point.
pub fn destination_point(origin: GeoPoint, bearing_deg: f64, distance_km: f64) -> GeoPoint {
    let lat1 = origin.lat.to_radians();
    let lon1 = origin.lon.to_radians();
    let theta = bearing_deg.to_radians();
    let delta = distance_km / EARTH_RADIUS_KM;

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * theta.cos()).asin();
    let lon2 = lon1
        + (theta.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

    GeoPoint::new(lon2.to_degrees(), lat2.to_degrees())
}

/// Initial great-circle bearing from `from` to `to`, in `[0, 360)`.
#[cfg(test)]
pub(crate) fn initial_bearing(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let dlon = (to.lon - from.lon).to_radians();

    let x = dlon.sin() * lat2.cos();
    let y = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();

    normalize_bearing(x.atan2(y).to_degrees())
}

/// Haversine distance between two points in kilometers.
#[cfg(test)]
pub(crate) fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn test_normalize_bearing() {
        assert_eq!(normalize_bearing(0.0), 0.0);
        assert_eq!(normalize_bearing(360.0), 0.0);
        assert_eq!(normalize_bearing(-30.0), 330.0);
        assert_eq!(normalize_bearing(725.0), 5.0);
        assert_eq!(normalize_bearing(-1e-20), 0.0);
    }

    #[test]
    fn test_zero_distance_returns_origin() {
        let origin = GeoPoint::new(106.8, -6.2);
        for bearing in [0.0, 45.0, 90.0, 179.5, 270.0, 359.9, -120.0, 1000.0] {
            let p = destination_point(origin, bearing, 0.0);
            assert!(approx_eq(p.lon, origin.lon, 1e-9), "lon drift at {bearing}: {}", p.lon);
            assert!(approx_eq(p.lat, origin.lat, 1e-9), "lat drift at {bearing}: {}", p.lat);
        }
    }

    #[test]
    fn test_bearing_is_periodic() {
        let origin = GeoPoint::new(-77.0, 38.0);
        for bearing in [0.0, 12.5, 90.0, 200.0, 333.3] {
            let a = destination_point(origin, bearing, 0.5);
            let b = destination_point(origin, bearing + 360.0, 0.5);
            assert!(approx_eq(a.lon, b.lon, 1e-9));
            assert!(approx_eq(a.lat, b.lat, 1e-9));
        }
    }

    #[test]
    fn test_due_north_one_degree() {
        // 111.195 km is one degree of arc on a 6371 km sphere
        let p = destination_point(GeoPoint::new(0.0, 0.0), 0.0, 111.19492664455873);
        assert!(approx_eq(p.lat, 1.0, 1e-9), "lat = {}", p.lat);
        assert!(approx_eq(p.lon, 0.0, 1e-9), "lon = {}", p.lon);
    }

    #[test]
    fn test_due_east_moves_longitude_only_at_equator() {
        let p = destination_point(GeoPoint::new(10.0, 0.0), 90.0, 111.19492664455873);
        assert!(approx_eq(p.lon, 11.0, 1e-9), "lon = {}", p.lon);
        assert!(approx_eq(p.lat, 0.0, 1e-9), "lat = {}", p.lat);
    }

    #[test]
    fn test_destination_agrees_with_inverse_helpers() {
        let origin = GeoPoint::new(106.8, -6.2);
        let p = destination_point(origin, 60.0, 0.5);

        assert!(approx_eq(distance_km(origin, p), 0.5, 1e-9));
        assert!(approx_eq(initial_bearing(origin, p), 60.0, 1e-6));
    }

    #[test]
    fn test_distance_zero() {
        let p = GeoPoint::new(-74.0, 40.0);
        assert_eq!(distance_km(p, p), 0.0);
    }
}
