//! Route planning entry points.
//!
//! - [`optimize_route`]: genetic search over battery-feasible routes
//! - [`shortest_path`]: distance-only Dijkstra baseline
//! - [`BenchmarkReport`]: compares the two

mod baseline;
mod benchmark;
mod optimizer;

pub use baseline::shortest_path;
pub use benchmark::{BenchmarkReport, BASELINE_COST_PER_KM};
pub use optimizer::{
    optimize_route, optimize_route_with, optimize_route_with_rng, OptimizeOptions, OptimizedRoute,
    RouteCandidate, RouteProblem,
};
