//! trip-planner core
//!
//! Computes an efficient visiting order for a set of coordinates over a
//! routing network, then materializes that order into a concrete route.
//! Network access (snapping, duration tables, per-leg paths) goes through
//! the traits in [`traits`]; [`osrm`] and [`haversine`] provide backends.

pub mod traits;
pub mod matrix;
pub mod brute_force;
pub mod farthest_insertion;
pub mod trip;
pub mod osrm;
pub mod osrm_data;
pub mod haversine;
pub mod polyline;
