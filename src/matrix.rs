//! Pairwise travel-cost matrix.
//!
//! Costs between snapped locations, stored dense and row-major. A cell is
//! either a finite duration in whole seconds or [`EdgeCost::Unreachable`];
//! keeping the sentinel as a variant rules out accidental arithmetic on it.

/// Travel cost of a single directed edge.
///
/// `Unreachable` sorts above every finite cost, so `min`/`max` over cells
/// behave the way the solvers need without special-casing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EdgeCost {
    Finite(u32),
    Unreachable,
}

impl EdgeCost {
    pub fn is_unreachable(self) -> bool {
        matches!(self, EdgeCost::Unreachable)
    }

    /// Sum of two edge costs; `Unreachable` absorbs.
    pub fn plus(self, other: EdgeCost) -> EdgeCost {
        match (self, other) {
            (EdgeCost::Finite(a), EdgeCost::Finite(b)) => EdgeCost::Finite(a.saturating_add(b)),
            _ => EdgeCost::Unreachable,
        }
    }
}

/// A dense n×n travel-cost matrix in row-major order.
///
/// Square by construction, size fixed at creation, asymmetric: the cost
/// from `i` to `j` need not equal the cost from `j` to `i`.
#[derive(Debug, Clone)]
pub struct CostMatrix {
    data: Vec<EdgeCost>,
    n: usize,
}

impl CostMatrix {
    /// Creates a matrix of the given size with all cells at zero cost.
    pub fn new(n: usize) -> Self {
        Self {
            data: vec![EdgeCost::Finite(0); n * n],
            n,
        }
    }

    /// Builds a matrix from a flat row-major duration table, as returned by
    /// a many-to-many query. `None` cells become `Unreachable`; durations
    /// round to whole seconds, negatives clamp to zero.
    ///
    /// Returns `None` if the table length is not `n * n`.
    pub fn from_durations(n: usize, durations: &[Option<f64>]) -> Option<Self> {
        if durations.len() != n * n {
            return None;
        }
        let data = durations
            .iter()
            .map(|cell| match cell {
                Some(seconds) => EdgeCost::Finite(seconds.max(0.0).round() as u32),
                None => EdgeCost::Unreachable,
            })
            .collect();
        Some(Self { data, n })
    }

    /// Cost of the directed edge from `from` to `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> EdgeCost {
        self.data[from * self.n + to]
    }

    pub fn set(&mut self, from: usize, to: usize, cost: EdgeCost) {
        self.data[from * self.n + to] = cost;
    }

    /// Number of locations in this matrix.
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// True iff every pair of locations is mutually reachable.
    ///
    /// A flat scan is sufficient: the table comes from true shortest-path
    /// costs, so any finite cell already implies network reachability.
    pub fn is_feasible(&self) -> bool {
        !self.data.iter().any(|cost| cost.is_unreachable())
    }

    /// Rewrites the matrix so that a free roundtrip solver yields a tour
    /// fixed to start at `source` and end at `destination`.
    ///
    /// The two endpoints are fused into one virtual node: nothing may enter
    /// the source or leave the destination except the zero-cost
    /// destination→source return leg, and the direct source→destination hop
    /// is forbidden so the tour must pass through everything else first.
    ///
    /// Consumes the matrix: feasibility must be judged on the original
    /// costs, and the transform must run at most once.
    pub fn with_fixed_ends(mut self, source: usize, destination: usize) -> Self {
        for i in 0..self.n {
            if i != source {
                self.set(i, source, EdgeCost::Unreachable);
            }
        }
        for i in 0..self.n {
            if i != destination {
                self.set(destination, i, EdgeCost::Unreachable);
            }
        }
        self.set(destination, source, EdgeCost::Finite(0));
        self.set(source, destination, EdgeCost::Unreachable);
        self
    }
}
