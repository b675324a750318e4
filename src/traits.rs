//! Collaborator seams for the trip planner.
//!
//! These are intentionally minimal. The planner core only ever needs three
//! things from the routing network: snap raw coordinates onto it, get a
//! full pairwise duration table, and route a single leg between two
//! snapped points. Concrete backends ([`crate::osrm`], [`crate::haversine`])
//! implement all three.

use serde::Serialize;

use crate::polyline::Polyline;

/// Snaps raw (lat, lng) coordinates onto the routing network.
///
/// May return fewer points than requested; the caller checks the count and
/// reports which coordinate failed to match.
pub trait LocationResolver {
    type Point: Clone;

    fn resolve(&self, coordinates: &[(f64, f64)]) -> Vec<Self::Point>;
}

/// Provides a full pairwise duration table for a set of snapped points.
///
/// The result is row-major with `points.len()²` cells; `None` means the
/// pair is unreachable. An empty vector signals backend failure.
pub trait CostTableProvider {
    type Point;

    fn pairwise_costs(&self, points: &[Self::Point]) -> Vec<Option<f64>>;
}

/// Routes one leg between two snapped points.
pub trait PathRouter {
    type Point;

    /// Returns `None` if the backend cannot route the leg.
    fn path(&self, from: &Self::Point, to: &Self::Point) -> Option<PathLeg>;
}

/// One routed leg: travel cost in seconds plus decoded geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathLeg {
    pub cost: f64,
    pub geometry: Polyline,
}
