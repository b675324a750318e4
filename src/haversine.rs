//! Haversine fallback backend (when OSRM is unavailable).
//!
//! Implements all three collaborator seams from great-circle distance and
//! an assumed speed. Less accurate than a road network (snapping is the
//! identity, legs are straight lines) but always available, which also
//! makes it the deterministic backend of choice for tests.

use crate::polyline::Polyline;
use crate::traits::{CostTableProvider, LocationResolver, PathLeg, PathRouter};

/// Average driving speed assumption for time estimation.
const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle routing backend.
#[derive(Debug, Clone)]
pub struct HaversineRouter {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
}

impl Default for HaversineRouter {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl HaversineRouter {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    /// Great-circle distance between two (lat, lng) points in kilometers.
    fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
        let (lat1, lng1) = from;
        let (lat2, lng2) = to;

        let lat1_rad = lat1.to_radians();
        let lat2_rad = lat2.to_radians();
        let delta_lat = (lat2 - lat1).to_radians();
        let delta_lng = (lng2 - lng1).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_KM * c
    }

    fn km_to_seconds(&self, km: f64) -> f64 {
        km / self.speed_kmh * 3600.0
    }
}

impl LocationResolver for HaversineRouter {
    type Point = (f64, f64);

    /// No network to snap to; every coordinate resolves to itself.
    fn resolve(&self, coordinates: &[(f64, f64)]) -> Vec<(f64, f64)> {
        coordinates.to_vec()
    }
}

impl CostTableProvider for HaversineRouter {
    type Point = (f64, f64);

    fn pairwise_costs(&self, points: &[(f64, f64)]) -> Vec<Option<f64>> {
        let n = points.len();
        let mut table = Vec::with_capacity(n * n);
        for from in points {
            for to in points {
                table.push(Some(self.km_to_seconds(Self::haversine_km(*from, *to))));
            }
        }
        table
    }
}

impl PathRouter for HaversineRouter {
    type Point = (f64, f64);

    fn path(&self, from: &(f64, f64), to: &(f64, f64)) -> Option<PathLeg> {
        Some(PathLeg {
            cost: self.km_to_seconds(Self::haversine_km(*from, *to)),
            geometry: Polyline::between(*from, *to),
        })
    }
}
