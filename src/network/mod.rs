//! Road network construction.
//!
//! Stations are joined by an undirected edge when they lie within a
//! proximity threshold of each other (great-circle distance). The resulting
//! [`RoadNetwork`] is the search space for both the genetic route search and
//! the shortest-path baseline.

mod geo;
mod graph;

pub use geo::{haversine_km, EARTH_RADIUS_KM};
pub use graph::{build_network, RoadNetwork, DEFAULT_PROXIMITY_KM};
