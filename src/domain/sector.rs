use crate::domain::geodesy::{destination_point, normalize_bearing, GeoPoint};
use crate::utils::error::{CoverageError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_RADIUS_KM: f64 = 0.5;
pub const DEFAULT_ARC_SAMPLES: usize = 20;
/// Upper bound on arc subdivisions; one sample per 0.1° of a full circle.
pub const MAX_ARC_SAMPLES: usize = 3600;

/// Geometry of one antenna sector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectorSpec {
    pub origin: GeoPoint,
    /// Centerline bearing in degrees; any real value is wrapped.
    pub azimuth: f64,
    /// Angular width in degrees, centered on `azimuth`.
    pub beam_width: f64,
    pub radius_km: f64,
    /// Angular subdivisions of the arc. Zero yields a single arc point.
    pub arc_samples: usize,
}

impl SectorSpec {
    pub fn new(origin: GeoPoint, azimuth: f64, beam_width: f64) -> Self {
        Self {
            origin,
            azimuth,
            beam_width,
            radius_km: DEFAULT_RADIUS_KM,
            arc_samples: DEFAULT_ARC_SAMPLES,
        }
    }

    pub fn with_radius_km(mut self, radius_km: f64) -> Self {
        self.radius_km = radius_km;
        self
    }

    pub fn with_arc_samples(mut self, arc_samples: usize) -> Self {
        self.arc_samples = arc_samples;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let GeoPoint { lon, lat } = self.origin;
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(CoverageError::invalid_geometry(
                "longitude",
                lon,
                "must be a finite value in [-180, 180]",
            ));
        }
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(CoverageError::invalid_geometry(
                "latitude",
                lat,
                "must be a finite value in [-90, 90]",
            ));
        }
        if !self.azimuth.is_finite() {
            return Err(CoverageError::invalid_geometry(
                "azimuth",
                self.azimuth,
                "must be finite",
            ));
        }
        if !self.beam_width.is_finite() || self.beam_width <= 0.0 || self.beam_width > 360.0 {
            return Err(CoverageError::invalid_geometry(
                "beam_width",
                self.beam_width,
                "must be in (0, 360]",
            ));
        }
        if !self.radius_km.is_finite() || self.radius_km <= 0.0 {
            return Err(CoverageError::invalid_geometry(
                "radius_km",
                self.radius_km,
                "must be a finite distance greater than 0",
            ));
        }
        if self.arc_samples > MAX_ARC_SAMPLES {
            return Err(CoverageError::invalid_geometry(
                "arc_samples",
                self.arc_samples as f64,
                format!("must be at most {}", MAX_ARC_SAMPLES),
            ));
        }
        Ok(())
    }

    /// Bearings of the arc samples, in ring order, each wrapped into `[0, 360)`.
    pub fn arc_bearings(&self) -> impl Iterator<Item = f64> {
        let start = self.azimuth - self.beam_width / 2.0;
        let step = if self.arc_samples == 0 {
            self.beam_width
        } else {
            self.beam_width / self.arc_samples as f64
        };
        (0..=self.arc_samples).map(move |i| normalize_bearing(start + i as f64 * step))
    }
}

/// Closed tower-to-arc-to-tower polygon, stored in (lon, lat) order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorRing {
    points: Vec<GeoPoint>,
}

impl SectorRing {
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn is_closed(&self) -> bool {
        matches!((self.points.first(), self.points.last()), (Some(a), Some(b)) if a == b)
    }

    /// Points as (lon, lat), the order KML and GeoJSON expect.
    pub fn lon_lat(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(GeoPoint::lon_lat).collect()
    }

    /// Points as (lat, lon), the order web map overlays expect.
    pub fn lat_lon(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(GeoPoint::lat_lon).collect()
    }
}

/// Build the wedge polygon for `spec`: origin, `arc_samples + 1` arc points,
/// origin again.
pub fn build_sector_ring(spec: &SectorSpec) -> Result<SectorRing> {
    spec.validate()?;

    let mut points = Vec::with_capacity(spec.arc_samples + 3);
    points.push(spec.origin);
    points.extend(
        spec.arc_bearings()
            .map(|bearing| destination_point(spec.origin, bearing, spec.radius_km)),
    );
    points.push(spec.origin);

    Ok(SectorRing { points })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geodesy::{distance_km, initial_bearing};

    fn jakarta_spec() -> SectorSpec {
        SectorSpec::new(GeoPoint::new(106.8, -6.2), 90.0, 60.0)
    }

    #[test]
    fn test_jakarta_sector_ring() {
        let spec = jakarta_spec();
        let ring = build_sector_ring(&spec).unwrap();

        assert_eq!(ring.points().len(), 23);
        assert_eq!(ring.points()[0], GeoPoint::new(106.8, -6.2));
        assert_eq!(ring.points()[22], GeoPoint::new(106.8, -6.2));

        let first_arc = ring.points()[1];
        assert_eq!(first_arc, destination_point(spec.origin, 60.0, 0.5));
        assert!((distance_km(spec.origin, first_arc) - 0.5).abs() < 1e-9);
        assert!((initial_bearing(spec.origin, first_arc) - 60.0).abs() < 1e-6);

        let last_arc = ring.points()[21];
        assert_eq!(last_arc, destination_point(spec.origin, 120.0, 0.5));
        assert!((initial_bearing(spec.origin, last_arc) - 120.0).abs() < 1e-6);
    }

    #[test]
    fn test_ring_is_closed_with_expected_cardinality() {
        let cases = [
            (0.0, 65.0, 1),
            (350.0, 90.0, 7),
            (10.0, 360.0, 36),
            (-45.0, 30.0, 20),
            (725.0, 120.0, 4),
        ];
        for (azimuth, beam, samples) in cases {
            let spec = SectorSpec::new(GeoPoint::new(-0.1278, 51.5074), azimuth, beam)
                .with_arc_samples(samples)
                .with_radius_km(1.2);
            let ring = build_sector_ring(&spec).unwrap();

            assert!(ring.is_closed());
            assert_eq!(ring.points().len(), samples + 3);
            assert_eq!(ring.points()[0], spec.origin);
        }
    }

    #[test]
    fn test_arc_bearings_cover_the_beam() {
        for (azimuth, beam) in [(90.0, 60.0), (0.0, 65.0), (350.0, 40.0), (200.0, 360.0)] {
            let spec = SectorSpec::new(GeoPoint::new(0.0, 0.0), azimuth, beam);
            let bearings: Vec<f64> = spec.arc_bearings().collect();

            assert_eq!(bearings.len(), 21);
            let first = normalize_bearing(azimuth - beam / 2.0);
            let last = normalize_bearing(azimuth + beam / 2.0);
            assert!((bearings[0] - first).abs() < 1e-9, "first = {}", bearings[0]);
            assert!((bearings[20] - last).abs() < 1e-9, "last = {}", bearings[20]);
            assert!(bearings.iter().all(|b| (0.0..360.0).contains(b)));
        }
    }

    #[test]
    fn test_wrap_across_north() {
        let spec = SectorSpec::new(GeoPoint::new(0.0, 0.0), 0.0, 60.0).with_arc_samples(2);
        let bearings: Vec<f64> = spec.arc_bearings().collect();
        assert_eq!(bearings, vec![330.0, 0.0, 30.0]);
    }

    #[test]
    fn test_zero_arc_samples_is_a_triangle() {
        let spec = jakarta_spec().with_arc_samples(0);
        let ring = build_sector_ring(&spec).unwrap();

        assert_eq!(ring.points().len(), 3);
        assert!(ring.is_closed());
        assert_eq!(ring.points()[1], destination_point(spec.origin, 60.0, 0.5));
    }

    #[test]
    fn test_full_circle_keeps_near_duplicate_endpoints() {
        let spec = SectorSpec::new(GeoPoint::new(106.8, -6.2), 90.0, 360.0);
        let ring = build_sector_ring(&spec).unwrap();

        assert_eq!(ring.points().len(), 23);
        let first = ring.points()[1];
        let last = ring.points()[21];
        assert!((first.lon - last.lon).abs() < 1e-9);
        assert!((first.lat - last.lat).abs() < 1e-9);
    }

    #[test]
    fn test_axis_order_accessors() {
        let ring = build_sector_ring(&jakarta_spec()).unwrap();
        let lon_lat = ring.lon_lat();
        let lat_lon = ring.lat_lon();

        assert_eq!(lon_lat[0], (106.8, -6.2));
        assert_eq!(lat_lon[0], (-6.2, 106.8));
        for ((lon, lat), (lat2, lon2)) in lon_lat.iter().zip(lat_lon.iter()) {
            assert_eq!(lon, lon2);
            assert_eq!(lat, lat2);
        }
    }

    #[test]
    fn test_arc_samples_upper_bound() {
        let spec = jakarta_spec().with_arc_samples(MAX_ARC_SAMPLES);
        let ring = build_sector_ring(&spec).unwrap();
        assert_eq!(ring.points().len(), MAX_ARC_SAMPLES + 3);

        match build_sector_ring(&spec.with_arc_samples(usize::MAX)) {
            Err(CoverageError::InvalidSectorGeometry { field, .. }) => {
                assert_eq!(field, "arc_samples")
            }
            other => panic!("expected InvalidSectorGeometry, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_malformed_specs() {
        let origin = GeoPoint::new(106.8, -6.2);
        let bad = [
            SectorSpec::new(origin, 90.0, 0.0),
            SectorSpec::new(origin, 90.0, -10.0),
            SectorSpec::new(origin, 90.0, 360.5),
            SectorSpec::new(origin, f64::NAN, 60.0),
            SectorSpec::new(origin, 90.0, f64::INFINITY),
            SectorSpec::new(GeoPoint::new(f64::NAN, -6.2), 90.0, 60.0),
            SectorSpec::new(GeoPoint::new(106.8, 91.0), 90.0, 60.0),
            SectorSpec::new(GeoPoint::new(181.0, 0.0), 90.0, 60.0),
            SectorSpec::new(origin, 90.0, 60.0).with_radius_km(0.0),
            SectorSpec::new(origin, 90.0, 60.0).with_radius_km(f64::NAN),
            SectorSpec::new(origin, 90.0, 60.0).with_arc_samples(MAX_ARC_SAMPLES + 1),
            SectorSpec::new(origin, 90.0, 60.0).with_arc_samples(usize::MAX),
        ];
        for spec in bad {
            let err = build_sector_ring(&spec).unwrap_err();
            assert!(
                matches!(err, CoverageError::InvalidSectorGeometry { .. }),
                "unexpected error for {:?}: {}",
                spec,
                err
            );
        }
    }
}
