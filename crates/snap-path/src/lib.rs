//! Bounded shortest-path search over traversal cost fields.
//!
//! The graph is the 8-neighborhood pixel grid of a [`snap_cost::CostField`].
//! Moving between neighbors costs the mean of both pixel costs, times
//! `sqrt(2)` on diagonals. Costs are strictly positive, so there are no
//! zero-weight cycles and the search always terminates.
//!
//! Determinism: neighbors are visited clockwise starting north
//! (N, NE, E, SE, S, SW, W, NW), queue ties pop in insertion order and a
//! parent is only replaced by a strictly cheaper route. Identical inputs give
//! identical paths.
//!
//! The search never leaves the start/end bounding box grown by
//! [`SearchParams::search_radius`], which bounds the work to the window area.

mod search;
mod segment;

pub use search::{SearchParams, SearchStrategy, find_path};
pub use segment::EdgeSegment;
