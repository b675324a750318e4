//! Route geometry as decoded coordinate sequences.
//!
//! Legs carry their geometry decoded; encoding to the compact wire format
//! is the response layer's business, not the trip core's.

use serde::{Deserialize, Serialize};

/// A leg geometry as a sequence of (latitude, longitude) points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<(f64, f64)>,
}

impl Polyline {
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    /// Straight-line geometry between two points; what fallback backends
    /// emit when no road shape is available.
    pub fn between(from: (f64, f64), to: (f64, f64)) -> Self {
        Self {
            points: vec![from, to],
        }
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn into_points(self) -> Vec<(f64, f64)> {
        self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
