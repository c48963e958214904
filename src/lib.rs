//! Battery-aware route planning for electric vehicles.
//!
//! Given a table of charging stations, the crate plans a multi-stop route
//! between two of them that minimizes a composite of travel time, energy
//! use and charging expense, while never letting the battery run dry.
//!
//! - **Stations**: [`StationCatalog`] owns the station records; it can be
//!   built directly or aggregated from raw charging sessions.
//! - **Road network**: [`build_network`] links every pair of stations within
//!   a proximity threshold (20 km by default) by great-circle distance.
//! - **Cost model**: [`CostModel`] walks a route leg by leg, charging when
//!   needed, and yields a [`RouteCost`] that is either feasible or not.
//! - **Genetic search**: [`optimize_route`] evolves candidate routes with
//!   the generic engine in [`ga`].
//! - **Baseline**: [`shortest_path`] is a distance-only Dijkstra search,
//!   and [`BenchmarkReport`] compares the two.
//!
//! # Example
//!
//! ```
//! use ev_ecoroute::{build_network, optimize_route, CostModel, GaConfig, Station, StationCatalog};
//!
//! let catalog = StationCatalog::new(vec![
//!     Station::new("A", 37.440, -122.160, 6.6, 0.25),
//!     Station::new("B", 37.445, -122.150, 6.6, 0.25),
//!     Station::new("C", 37.450, -122.140, 6.6, 0.25),
//! ])?;
//! let network = build_network(&catalog, 20.0);
//! let config = GaConfig::default().with_seed(42);
//!
//! let best = optimize_route("A", "C", &catalog, &network, &CostModel::default(), &config)?;
//! assert_eq!(best.route.first(), catalog.id_of("A"));
//! assert!(best.cost.is_feasible());
//! # Ok::<(), ev_ecoroute::RouteError>(())
//! ```
//!
//! # Features
//!
//! - `parallel` (default): evaluate each generation with rayon
//! - `serde`: serialization for stations, routes, configs and results
//! - `wasm`: a `wasm-bindgen` entry point

pub mod cost;
pub mod error;
pub mod ga;
pub mod network;
pub mod planner;
pub mod route;
pub mod station;
#[cfg(feature = "wasm")]
pub mod wasm;

pub use cost::{evaluate_route, CostModel, EvParams, RouteCost};
pub use error::{Result, RouteError};
pub use ga::GaConfig;
pub use network::{build_network, RoadNetwork};
pub use planner::{optimize_route, shortest_path, BenchmarkReport, OptimizedRoute};
pub use route::Route;
pub use station::{Station, StationCatalog};
