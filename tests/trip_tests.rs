//! Full-pipeline trip tests over scripted collaborators.
//!
//! Covers request validation, collaborator failure mapping, feasibility,
//! fixed-endpoint handling, and leg assembly.

use trip_planner::traits::{CostTableProvider, LocationResolver, PathLeg, PathRouter};
use trip_planner::trip::{Destination, Source, TripError, TripParameters, TripPlanner};
use trip_planner::polyline::Polyline;

// ============================================================================
// Test Fixtures
// ============================================================================

/// A scripted network: coordinates are (index, 0.0) so points map straight
/// back to matrix indices, the duration table is given up front, and legs
/// are routed off the same table.
#[derive(Clone)]
struct ScriptedNetwork {
    n: usize,
    table: Vec<Option<f64>>,
    /// Indices the resolver pretends it cannot snap.
    unresolved: Vec<usize>,
    /// Return an empty table, simulating backend failure.
    fail_table: bool,
}

impl ScriptedNetwork {
    fn new(n: usize) -> Self {
        // default: fully connected, cost = |i - j| seconds
        let mut table = Vec::with_capacity(n * n);
        for i in 0..n {
            for j in 0..n {
                table.push(Some((i as f64 - j as f64).abs()));
            }
        }
        Self {
            n,
            table,
            unresolved: Vec::new(),
            fail_table: false,
        }
    }

    fn with_cost(mut self, from: usize, to: usize, cost: f64) -> Self {
        self.table[from * self.n + to] = Some(cost);
        self
    }

    fn with_symmetric_cost(self, a: usize, b: usize, cost: f64) -> Self {
        self.with_cost(a, b, cost).with_cost(b, a, cost)
    }

    fn with_unreachable(mut self, from: usize, to: usize) -> Self {
        self.table[from * self.n + to] = None;
        self
    }

    fn with_unresolved(mut self, index: usize) -> Self {
        self.unresolved.push(index);
        self
    }

    fn with_failing_table(mut self) -> Self {
        self.fail_table = true;
        self
    }

    fn coordinates(&self) -> Vec<(f64, f64)> {
        (0..self.n).map(|i| (i as f64, 0.0)).collect()
    }

    fn planner(&self) -> TripPlanner<ScriptedNetwork, ScriptedNetwork, ScriptedNetwork> {
        TripPlanner::new(self.clone(), self.clone(), self.clone())
    }
}

impl LocationResolver for ScriptedNetwork {
    type Point = (f64, f64);

    fn resolve(&self, coordinates: &[(f64, f64)]) -> Vec<(f64, f64)> {
        coordinates
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.unresolved.contains(i))
            .map(|(_, &c)| c)
            .collect()
    }
}

impl CostTableProvider for ScriptedNetwork {
    type Point = (f64, f64);

    fn pairwise_costs(&self, points: &[(f64, f64)]) -> Vec<Option<f64>> {
        if self.fail_table {
            return Vec::new();
        }
        assert_eq!(points.len(), self.n);
        self.table.clone()
    }
}

impl PathRouter for ScriptedNetwork {
    type Point = (f64, f64);

    fn path(&self, from: &(f64, f64), to: &(f64, f64)) -> Option<PathLeg> {
        let (from, to) = (from.0 as usize, to.0 as usize);
        let cost = self.table[from * self.n + to]?;
        Some(PathLeg {
            cost,
            geometry: Polyline::between((from as f64, 0.0), (to as f64, 0.0)),
        })
    }
}

fn roundtrip() -> TripParameters {
    TripParameters::default()
}

fn fixed_ends() -> TripParameters {
    TripParameters {
        source: Source::First,
        destination: Destination::Last,
        roundtrip: false,
    }
}

fn is_permutation(order: &[usize], n: usize) -> bool {
    let mut seen = vec![false; n];
    order.len() == n
        && order.iter().all(|&i| {
            let fresh = i < n && !seen[i];
            if fresh {
                seen[i] = true;
            }
            fresh
        })
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn rejects_one_sided_fixed_endpoint_without_roundtrip() {
    let network = ScriptedNetwork::new(4);
    let planner = network.planner();

    for params in [
        TripParameters {
            source: Source::First,
            destination: Destination::Any,
            roundtrip: false,
        },
        TripParameters {
            source: Source::Any,
            destination: Destination::Last,
            roundtrip: false,
        },
        TripParameters {
            source: Source::Any,
            destination: Destination::Any,
            roundtrip: false,
        },
    ] {
        assert_eq!(
            planner.solve(&network.coordinates(), &params),
            Err(TripError::NotImplemented),
            "{:?}",
            params
        );
    }
}

#[test]
fn rejects_oversized_requests() {
    let network = ScriptedNetwork::new(5);
    let planner = network.planner().with_max_locations(4);

    assert_eq!(
        planner.solve(&network.coordinates(), &roundtrip()),
        Err(TripError::TooBig { count: 5, max: 4 })
    );
}

#[test]
fn unlimited_when_max_locations_unset() {
    let network = ScriptedNetwork::new(5);
    let planner = network.planner();
    assert!(planner.solve(&network.coordinates(), &roundtrip()).is_ok());
}

#[test]
fn rejects_malformed_coordinates() {
    let network = ScriptedNetwork::new(2);
    let planner = network.planner();

    assert_eq!(
        planner.solve(&[(0.0, 0.0)], &roundtrip()),
        Err(TripError::InvalidValue),
        "fewer than two locations"
    );
    assert_eq!(
        planner.solve(&[(95.0, 0.0), (0.0, 0.0)], &roundtrip()),
        Err(TripError::InvalidValue),
        "latitude out of range"
    );
}

#[test]
fn reports_unmatched_coordinate_count() {
    let network = ScriptedNetwork::new(4).with_unresolved(2);
    let planner = network.planner();

    assert_eq!(
        planner.solve(&network.coordinates(), &roundtrip()),
        Err(TripError::NoSegment { matched: 3 })
    );
}

// ============================================================================
// Collaborator failures and feasibility
// ============================================================================

#[test]
fn empty_table_is_backend_failure_not_no_trips() {
    let network = ScriptedNetwork::new(3).with_failing_table();
    let planner = network.planner();

    assert_eq!(
        planner.solve(&network.coordinates(), &roundtrip()),
        Err(TripError::NoTable)
    );
}

#[test]
fn unreachable_pair_fails_with_no_trips() {
    // one unreachable cell is enough, no matter the constraints
    let network = ScriptedNetwork::new(4).with_unreachable(1, 2);
    let planner = network.planner();

    assert_eq!(
        planner.solve(&network.coordinates(), &roundtrip()),
        Err(TripError::NoTrips)
    );
    assert_eq!(
        planner.solve(&network.coordinates(), &fixed_ends()),
        Err(TripError::NoTrips)
    );
}

// ============================================================================
// Roundtrips
// ============================================================================

#[test]
fn free_roundtrip_finds_optimal_cycle() {
    // optimum cycle is 0-1-2-3 with total cost 7
    let network = ScriptedNetwork::new(4)
        .with_symmetric_cost(0, 1, 1.0)
        .with_symmetric_cost(0, 2, 4.0)
        .with_symmetric_cost(0, 3, 3.0)
        .with_symmetric_cost(1, 2, 2.0)
        .with_symmetric_cost(1, 3, 5.0)
        .with_symmetric_cost(2, 3, 1.0);
    let planner = network.planner();

    let plan = planner
        .solve(&network.coordinates(), &roundtrip())
        .expect("solvable");

    assert!(is_permutation(&plan.order, 4));
    assert_eq!(plan.order[0], 0, "roundtrip starts at the first coordinate");
    assert_eq!(plan.legs.len(), 4, "closed cycle has n legs");
    assert!((plan.total_cost - 7.0).abs() < 1e-9, "got {}", plan.total_cost);
}

#[test]
fn roundtrip_legs_chain_and_close() {
    let network = ScriptedNetwork::new(5);
    let planner = network.planner();
    let plan = planner
        .solve(&network.coordinates(), &roundtrip())
        .expect("solvable");

    for (leg, pair) in plan.legs.iter().zip(plan.order.windows(2)) {
        assert_eq!((leg.from, leg.to), (pair[0], pair[1]));
    }
    let closing = plan.legs.last().expect("non-empty");
    assert_eq!(closing.from, *plan.order.last().expect("non-empty"));
    assert_eq!(closing.to, plan.order[0]);
    assert!((plan.total_cost - plan.legs.iter().map(|l| l.cost).sum::<f64>()).abs() < 1e-9);
}

#[test]
fn fixed_start_roundtrip_starts_at_first() {
    let network = ScriptedNetwork::new(6);
    let planner = network.planner();
    let params = TripParameters {
        source: Source::First,
        destination: Destination::Any,
        roundtrip: true,
    };

    let plan = planner.solve(&network.coordinates(), &params).expect("solvable");
    assert_eq!(plan.order[0], 0);
    assert_eq!(plan.legs.len(), 6);
}

#[test]
fn fixed_end_roundtrip_starts_at_destination() {
    let network = ScriptedNetwork::new(6);
    let planner = network.planner();
    let params = TripParameters {
        source: Source::Any,
        destination: Destination::Last,
        roundtrip: true,
    };

    let plan = planner.solve(&network.coordinates(), &params).expect("solvable");
    assert_eq!(plan.order[0], 5, "rotated so the fixed end leads the cycle");
    assert!(is_permutation(&plan.order, 6));
}

// ============================================================================
// Fixed start and end (non-roundtrip)
// ============================================================================

#[test]
fn fixed_ends_returns_exact_expected_order() {
    // going via 1 is far cheaper than the direct hop
    let network = ScriptedNetwork::new(3)
        .with_symmetric_cost(0, 1, 1.0)
        .with_symmetric_cost(1, 2, 1.0)
        .with_symmetric_cost(0, 2, 5.0);
    let planner = network.planner();

    let plan = planner
        .solve(&network.coordinates(), &fixed_ends())
        .expect("solvable");

    assert_eq!(plan.order, vec![0, 1, 2]);
    assert_eq!(plan.legs.len(), 2, "open trip has n - 1 legs");
    assert!((plan.total_cost - 2.0).abs() < 1e-9);
}

#[test]
fn fixed_ends_pins_first_and_last() {
    let n = 7;
    let network = ScriptedNetwork::new(n);
    let planner = network.planner();

    let plan = planner
        .solve(&network.coordinates(), &fixed_ends())
        .expect("solvable");

    assert!(is_permutation(&plan.order, n));
    assert_eq!(plan.order[0], 0, "starts at the source");
    assert_eq!(*plan.order.last().expect("non-empty"), n - 1, "ends at the destination");
    assert_eq!(plan.legs.len(), n - 1);
}

// ============================================================================
// Large instances (heuristic dispatch)
// ============================================================================

#[test]
fn heuristic_sized_roundtrip_is_valid() {
    let n = 14;
    let network = ScriptedNetwork::new(n);
    let planner = network.planner();

    let plan = planner
        .solve(&network.coordinates(), &roundtrip())
        .expect("solvable");

    assert!(is_permutation(&plan.order, n));
    assert_eq!(plan.order[0], 0);
    assert_eq!(plan.legs.len(), n);
}

#[test]
fn heuristic_sized_fixed_ends_pins_endpoints() {
    let n = 13;
    let network = ScriptedNetwork::new(n);
    let planner = network.planner();

    let plan = planner
        .solve(&network.coordinates(), &fixed_ends())
        .expect("solvable");

    assert!(is_permutation(&plan.order, n));
    assert_eq!(plan.order[0], 0);
    assert_eq!(*plan.order.last().expect("non-empty"), n - 1);
    assert_eq!(plan.legs.len(), n - 1);
}
