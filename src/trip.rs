//! Trip orchestrator.
//!
//! Validates a trip request, acquires the pairwise cost table, encodes
//! fixed-endpoint constraints into it, picks an order solver by instance
//! size, normalizes the resulting order, and routes it leg by leg.

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::brute_force::brute_force_trip;
use crate::farthest_insertion::farthest_insertion_trip;
use crate::matrix::CostMatrix;
use crate::traits::{CostTableProvider, LocationResolver, PathRouter};

/// Largest instance the exact solver is allowed to chew on; anything at or
/// above this falls through to farthest insertion.
pub const BRUTE_FORCE_MAX_NODES: usize = 10;

/// Where the trip must begin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Source {
    /// Solver picks freely.
    #[default]
    Any,
    /// Trip must start at the first input coordinate.
    First,
}

/// Where the trip must end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Destination {
    /// Solver picks freely.
    #[default]
    Any,
    /// Trip must end at the last input coordinate.
    Last,
}

/// Request-level knobs for one trip computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripParameters {
    pub source: Source,
    pub destination: Destination,
    pub roundtrip: bool,
}

impl Default for TripParameters {
    fn default() -> Self {
        Self {
            source: Source::Any,
            destination: Destination::Any,
            roundtrip: true,
        }
    }
}

/// User-facing failure modes of [`TripPlanner::solve`]. All terminal; the
/// pipeline never retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TripError {
    /// Unsupported source/destination/roundtrip combination.
    #[error("this combination of source, destination and roundtrip is not supported")]
    NotImplemented,
    /// More locations than the configured maximum.
    #[error("too many trip coordinates: {count} exceeds the maximum of {max}")]
    TooBig { count: usize, max: usize },
    /// Malformed coordinates, or fixed-endpoint indices out of range.
    #[error("invalid coordinate or endpoint value")]
    InvalidValue,
    /// One or more coordinates could not be matched to the network.
    #[error("could not find a matching segment for coordinate {matched}")]
    NoSegment { matched: usize },
    /// At least one pair of locations is mutually unreachable.
    #[error("no trip visiting all destinations possible")]
    NoTrips,
    /// The many-to-many backend returned no usable table.
    #[error("cost table backend returned no usable result")]
    NoTable,
    /// A leg of the chosen order could not be routed.
    #[error("could not route a leg of the chosen trip")]
    NoRoute,
}

/// One routed leg of the final trip, between two input locations
/// identified by their index in the request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripLeg {
    pub from: usize,
    pub to: usize,
    pub cost: f64,
    pub geometry: crate::polyline::Polyline,
}

/// A solved trip: the normalized visiting order over the input indices,
/// the routed legs realizing it, and their summed cost.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripPlan {
    pub order: Vec<usize>,
    pub legs: Vec<TripLeg>,
    pub total_cost: f64,
}

/// Drives one trip computation end to end against a resolver, a cost-table
/// backend and a per-leg router sharing one snapped-point type.
#[derive(Debug, Clone)]
pub struct TripPlanner<R, T, P>
where
    R: LocationResolver,
    T: CostTableProvider<Point = R::Point>,
    P: PathRouter<Point = R::Point>,
{
    resolver: R,
    table: T,
    router: P,
    /// Maximum accepted location count; 0 means unlimited.
    max_locations: usize,
}

impl<R, T, P> TripPlanner<R, T, P>
where
    R: LocationResolver,
    T: CostTableProvider<Point = R::Point>,
    P: PathRouter<Point = R::Point>,
{
    pub fn new(resolver: R, table: T, router: P) -> Self {
        Self {
            resolver,
            table,
            router,
            max_locations: 0,
        }
    }

    pub fn with_max_locations(mut self, max_locations: usize) -> Self {
        self.max_locations = max_locations;
        self
    }

    /// Computes a low-cost visiting order over `coordinates` and routes it.
    ///
    /// The pipeline is strictly sequential and fail-fast: validation, one
    /// many-to-many table call, feasibility, the fixed-ends transform when
    /// both endpoints are pinned, solver dispatch by size, rotation to the
    /// canonical start, then one path call per leg.
    pub fn solve(
        &self,
        coordinates: &[(f64, f64)],
        params: &TripParameters,
    ) -> Result<TripPlan, TripError> {
        let n = coordinates.len();
        let fixed_start = params.source == Source::First;
        let fixed_end = params.destination == Destination::Last;

        if !supported_combination(fixed_start, fixed_end, params.roundtrip) {
            return Err(TripError::NotImplemented);
        }
        if self.max_locations > 0 && n > self.max_locations {
            return Err(TripError::TooBig {
                count: n,
                max: self.max_locations,
            });
        }
        if n < 2 || !coordinates.iter().all(|&c| valid_coordinate(c)) {
            return Err(TripError::InvalidValue);
        }

        let points = self.resolver.resolve(coordinates);
        if points.len() != n {
            return Err(TripError::NoSegment {
                matched: points.len(),
            });
        }

        let source_id = 0;
        let destination_id = n - 1;
        if fixed_start && fixed_end && (source_id >= n || destination_id >= n) {
            return Err(TripError::InvalidValue);
        }

        let durations = self.table.pairwise_costs(&points);
        if durations.is_empty() {
            return Err(TripError::NoTable);
        }
        let matrix = CostMatrix::from_durations(n, &durations).ok_or(TripError::NoTable)?;

        if !matrix.is_feasible() {
            return Err(TripError::NoTrips);
        }

        // Feasibility is judged on the original costs; the transform
        // deliberately plants sentinels afterwards.
        let matrix = if fixed_start && fixed_end {
            matrix.with_fixed_ends(source_id, destination_id)
        } else {
            matrix
        };

        let mut order = if n < BRUTE_FORCE_MAX_NODES {
            debug!(locations = n, solver = "brute_force", "selecting trip order");
            brute_force_trip(&matrix)
        } else {
            debug!(locations = n, solver = "farthest_insertion", "selecting trip order");
            farthest_insertion_trip(&matrix)
        };
        debug_assert!(is_permutation(&order, n), "solver output is not a permutation");

        normalize_order(&mut order, fixed_start, fixed_end, params.roundtrip, destination_id);

        let plan = self.assemble_route(&points, order, params.roundtrip)?;
        Ok(plan)
    }

    /// Routes the ordered trip one leg at a time, closing the cycle when
    /// the request is a roundtrip.
    fn assemble_route(
        &self,
        points: &[R::Point],
        order: Vec<usize>,
        roundtrip: bool,
    ) -> Result<TripPlan, TripError> {
        let mut legs = Vec::with_capacity(order.len());
        let mut total_cost = 0.0;

        for pair in order.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            let leg = self
                .router
                .path(&points[from], &points[to])
                .ok_or(TripError::NoRoute)?;
            total_cost += leg.cost;
            legs.push(TripLeg {
                from,
                to,
                cost: leg.cost,
                geometry: leg.geometry,
            });
        }

        if roundtrip {
            let (&from, &to) = (
                order.last().expect("order is non-empty"),
                order.first().expect("order is non-empty"),
            );
            let leg = self
                .router
                .path(&points[from], &points[to])
                .ok_or(TripError::NoRoute)?;
            total_cost += leg.cost;
            legs.push(TripLeg {
                from,
                to,
                cost: leg.cost,
                geometry: leg.geometry,
            });
        }

        let expected = if roundtrip { order.len() } else { order.len() - 1 };
        assert_eq!(legs.len(), expected, "trip leg count does not match the order");

        Ok(TripPlan {
            order,
            legs,
            total_cost,
        })
    }
}

/// Only two families of requests are supported: fixed start *and* end
/// without roundtrip, or anything with roundtrip.
fn supported_combination(fixed_start: bool, fixed_end: bool, roundtrip: bool) -> bool {
    (fixed_start && fixed_end && !roundtrip) || roundtrip
}

fn valid_coordinate((lat, lng): (f64, f64)) -> bool {
    lat.is_finite() && lng.is_finite() && (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng)
}

/// Rotates the cyclic solver output so it starts at the canonical index.
/// Pure re-indexing; adjacencies are untouched.
fn normalize_order(
    order: &mut [usize],
    fixed_start: bool,
    fixed_end: bool,
    roundtrip: bool,
    destination_id: usize,
) {
    if !fixed_end || fixed_start {
        rotate_to_front(order, 0);
    } else if roundtrip {
        rotate_to_front(order, destination_id);
    }
    // fixed end without start or roundtrip: rejected by validation, and
    // deliberately left unrotated here.
}

fn rotate_to_front(order: &mut [usize], start: usize) {
    let position = order
        .iter()
        .position(|&index| index == start)
        .expect("solver output is missing a location index");
    order.rotate_left(position);
}

fn is_permutation(order: &[usize], n: usize) -> bool {
    let mut seen = vec![false; n];
    order.len() == n
        && order.iter().all(|&index| {
            let fresh = index < n && !seen[index];
            if fresh {
                seen[index] = true;
            }
            fresh
        })
}
