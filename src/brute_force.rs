//! Exact order solver: exhaustive minimum-cost cycle search.
//!
//! Only used for small instances; the orchestrator caps it at
//! [`crate::trip::BRUTE_FORCE_MAX_NODES`] locations.

use crate::matrix::{CostMatrix, EdgeCost};

/// Returns the permutation of `[0, n)` with minimum cycle cost under the
/// given matrix.
///
/// The first element stays pinned at 0: cycle cost is rotation-invariant,
/// so enumerating the `(n-1)!` arrangements of the rest covers every
/// distinct tour. Ties go to the first arrangement encountered in
/// lexicographic order, which makes the result deterministic.
///
/// # Panics
///
/// Panics if the matrix is empty.
pub fn brute_force_trip(matrix: &CostMatrix) -> Vec<usize> {
    let n = matrix.len();
    assert!(n > 0, "brute force needs at least one location");

    let mut tail: Vec<usize> = (1..n).collect();
    let mut best = Vec::with_capacity(n);
    best.push(0);
    best.extend_from_slice(&tail);
    let mut best_cost = cycle_cost(matrix, &best);

    while next_permutation(&mut tail) {
        let mut candidate = Vec::with_capacity(n);
        candidate.push(0);
        candidate.extend_from_slice(&tail);
        let cost = cycle_cost(matrix, &candidate);
        if cost < best_cost {
            best_cost = cost;
            best = candidate;
        }
    }

    best
}

/// Total cost of visiting `order` as a closed cycle.
pub fn cycle_cost(matrix: &CostMatrix, order: &[usize]) -> EdgeCost {
    let mut total = EdgeCost::Finite(0);
    for pair in order.windows(2) {
        total = total.plus(matrix.get(pair[0], pair[1]));
    }
    if let (Some(&last), Some(&first)) = (order.last(), order.first()) {
        total = total.plus(matrix.get(last, first));
    }
    total
}

/// Advances `items` to the next lexicographic permutation, returning false
/// once the sequence has wrapped back to sorted order.
fn next_permutation(items: &mut [usize]) -> bool {
    let n = items.len();
    if n < 2 {
        return false;
    }
    let Some(pivot) = (0..n - 1).rev().find(|&i| items[i] < items[i + 1]) else {
        return false;
    };
    let successor = (pivot + 1..n)
        .rev()
        .find(|&j| items[j] > items[pivot])
        .expect("pivot has a successor by construction");
    items.swap(pivot, successor);
    items[pivot + 1..].reverse();
    true
}
