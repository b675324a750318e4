//! OSRM HTTP backend for the trip planner seams.
//!
//! Talks to a running `osrm-routed` over its v1 HTTP API: `/nearest` for
//! snapping, `/table` for the pairwise duration matrix, `/route` for
//! individual legs. Failures degrade to the trait contracts (shortened
//! resolution, empty table, `None` leg) so the orchestrator maps them to
//! its own error kinds.

use serde::Deserialize;
use tracing::warn;

use crate::polyline::Polyline;
use crate::traits::{CostTableProvider, LocationResolver, PathLeg, PathRouter};

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn coordinate_path(points: &[(f64, f64)]) -> String {
        points
            .iter()
            .map(|(lat, lng)| format!("{:.6},{:.6}", lng, lat))
            .collect::<Vec<_>>()
            .join(";")
    }
}

impl LocationResolver for OsrmClient {
    type Point = (f64, f64);

    /// Snaps each coordinate through `/nearest`. Coordinates without a
    /// matching segment are skipped, shortening the result.
    fn resolve(&self, coordinates: &[(f64, f64)]) -> Vec<(f64, f64)> {
        let mut snapped = Vec::with_capacity(coordinates.len());

        for &(lat, lng) in coordinates {
            let url = format!(
                "{}/nearest/v1/{}/{:.6},{:.6}",
                self.config.base_url, self.config.profile, lng, lat
            );

            let response = self
                .client
                .get(url)
                .send()
                .and_then(|resp| resp.error_for_status())
                .and_then(|resp| resp.json::<OsrmNearestResponse>());

            match response {
                Ok(body) => {
                    // OSRM waypoint locations come back [lng, lat]
                    if let Some(waypoint) = body.waypoints.unwrap_or_default().into_iter().next() {
                        snapped.push((waypoint.location[1], waypoint.location[0]));
                    } else {
                        warn!(lat, lng, "nearest returned no waypoint");
                    }
                }
                Err(err) => {
                    warn!(lat, lng, error = %err, "nearest request failed");
                }
            }
        }

        snapped
    }
}

impl CostTableProvider for OsrmClient {
    type Point = (f64, f64);

    /// One `/table` call for the full matrix, flattened row-major with
    /// `null` cells preserved as unreachable. Empty on any failure.
    fn pairwise_costs(&self, points: &[(f64, f64)]) -> Vec<Option<f64>> {
        if points.is_empty() {
            return Vec::new();
        }

        let url = format!(
            "{}/table/v1/{}/{}?annotations=duration",
            self.config.base_url,
            self.config.profile,
            Self::coordinate_path(points)
        );

        let response = self
            .client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<OsrmTableResponse>());

        match response {
            Ok(body) => body
                .durations
                .unwrap_or_default()
                .into_iter()
                .flatten()
                .collect(),
            Err(err) => {
                warn!(error = %err, "table request failed");
                Vec::new()
            }
        }
    }
}

impl PathRouter for OsrmClient {
    type Point = (f64, f64);

    fn path(&self, from: &(f64, f64), to: &(f64, f64)) -> Option<PathLeg> {
        let url = format!(
            "{}/route/v1/{}/{}?overview=full&geometries=geojson",
            self.config.base_url,
            self.config.profile,
            Self::coordinate_path(&[*from, *to])
        );

        let response = self
            .client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<OsrmRouteResponse>());

        let body = match response {
            Ok(body) => body,
            Err(err) => {
                warn!(error = %err, "route request failed");
                return None;
            }
        };

        let route = body.routes.unwrap_or_default().into_iter().next()?;
        let points = route
            .geometry
            .map(|geometry| {
                geometry
                    .coordinates
                    .into_iter()
                    .map(|pair| (pair[1], pair[0]))
                    .collect()
            })
            .unwrap_or_default();

        Some(PathLeg {
            cost: route.duration,
            geometry: Polyline::new(points),
        })
    }
}

#[derive(Debug, Deserialize)]
struct OsrmNearestResponse {
    waypoints: Option<Vec<OsrmWaypoint>>,
}

#[derive(Debug, Deserialize)]
struct OsrmWaypoint {
    location: [f64; 2],
}

#[derive(Debug, Deserialize)]
struct OsrmTableResponse {
    durations: Option<Vec<Vec<Option<f64>>>>,
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    routes: Option<Vec<OsrmRoute>>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    duration: f64,
    geometry: Option<OsrmGeometry>,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}
