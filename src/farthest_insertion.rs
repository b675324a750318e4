//! Heuristic order solver: farthest-insertion tour construction.
//!
//! Grows a tour by repeatedly taking the not-yet-inserted location that is
//! farthest from the partial tour and splicing it in at the position with
//! the least cycle-cost increase. Polynomial time, no optimality claim.

use crate::matrix::{CostMatrix, EdgeCost};

/// Stand-in weight for unreachable cells in the insertion-delta
/// arithmetic. Large enough to lose against any finite alternative, small
/// enough that sums of a few of them cannot overflow `i64`.
const UNREACHABLE_WEIGHT: i64 = 1 << 40;

/// Builds a low-cost permutation of `[0, n)` by farthest insertion.
///
/// Deterministic: every selection takes the first-encountered candidate on
/// ties. Always yields a complete permutation, even when the matrix
/// carries sentinel cells from the fixed-ends transform.
///
/// # Panics
///
/// Panics if the matrix is empty.
pub fn farthest_insertion_trip(matrix: &CostMatrix) -> Vec<usize> {
    let n = matrix.len();
    assert!(n > 0, "farthest insertion needs at least one location");
    if n == 1 {
        return vec![0];
    }

    let (seed_from, seed_to) = costliest_pair(matrix);
    let mut tour = vec![seed_from, seed_to];
    let mut inserted = vec![false; n];
    inserted[seed_from] = true;
    inserted[seed_to] = true;

    while tour.len() < n {
        let next = farthest_from_tour(matrix, &tour, &inserted);
        let position = cheapest_insertion(matrix, &tour, next);
        tour.insert(position, next);
        inserted[next] = true;
    }

    tour
}

/// The pair of distinct locations with the greatest edge cost, first
/// occurrence winning. Seeds the tour with the hardest edge so the rest of
/// the construction works inward from it.
fn costliest_pair(matrix: &CostMatrix) -> (usize, usize) {
    let n = matrix.len();
    let mut best = (0, 1);
    let mut best_cost = matrix.get(0, 1);
    for from in 0..n {
        for to in 0..n {
            if from != to && matrix.get(from, to) > best_cost {
                best_cost = matrix.get(from, to);
                best = (from, to);
            }
        }
    }
    best
}

/// The uninserted location whose minimum distance to any tour member is
/// greatest.
fn farthest_from_tour(matrix: &CostMatrix, tour: &[usize], inserted: &[bool]) -> usize {
    let mut farthest = None;
    let mut farthest_distance = EdgeCost::Finite(0);

    for candidate in 0..matrix.len() {
        if inserted[candidate] {
            continue;
        }
        let distance = tour
            .iter()
            .map(|&member| {
                matrix
                    .get(member, candidate)
                    .min(matrix.get(candidate, member))
            })
            .min()
            .expect("tour is never empty");
        if farthest.is_none() || distance > farthest_distance {
            farthest = Some(candidate);
            farthest_distance = distance;
        }
    }

    farthest.expect("called with at least one uninserted location")
}

/// Index in `tour` at which inserting `node` increases the cycle cost the
/// least.
fn cheapest_insertion(matrix: &CostMatrix, tour: &[usize], node: usize) -> usize {
    let mut best_position = 0;
    let mut best_increase = i64::MAX;

    for position in 0..tour.len() {
        let before = tour[if position == 0 { tour.len() - 1 } else { position - 1 }];
        let after = tour[position];
        let increase = weight(matrix.get(before, node)) + weight(matrix.get(node, after))
            - weight(matrix.get(before, after));
        if increase < best_increase {
            best_increase = increase;
            best_position = position;
        }
    }

    best_position
}

fn weight(cost: EdgeCost) -> i64 {
    match cost {
        EdgeCost::Finite(value) => value as i64,
        EdgeCost::Unreachable => UNREACHABLE_WEIGHT,
    }
}
