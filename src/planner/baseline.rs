//! Distance-only shortest path over the road network.

use crate::error::{Result, RouteError};
use crate::network::RoadNetwork;
use crate::route::Route;
use crate::station::StationCatalog;
use ordered_float::OrderedFloat;
use petgraph::algo::astar;
use petgraph::graph::NodeIndex;
use tracing::instrument;

/// Shortest path from `start` to `end` by raw edge distance.
///
/// Runs Dijkstra (A* with a zero heuristic). Battery range is ignored, so
/// the path is a comparison point for the optimizer rather than a
/// drivable plan.
///
/// # Errors
///
/// - [`RouteError::InsufficientStations`] when the catalog has fewer than
///   two stations
/// - [`RouteError::UnknownStation`] for names missing from the catalog
/// - [`RouteError::SameEndpoints`] when `start` and `end` name one station
/// - [`RouteError::NoPathExists`] when the stations lie in different
///   components
#[instrument(level = "debug", skip_all, fields(start = start, end = end))]
pub fn shortest_path(
    network: &RoadNetwork,
    catalog: &StationCatalog,
    start: &str,
    end: &str,
) -> Result<(Route, f64)> {
    if catalog.len() < 2 {
        return Err(RouteError::InsufficientStations {
            count: catalog.len(),
        });
    }
    let from = catalog.resolve(start)?;
    let to = catalog.resolve(end)?;
    if from == to {
        return Err(RouteError::SameEndpoints {
            name: start.to_string(),
        });
    }
    if network.node_count() != catalog.len() {
        return Err(RouteError::InvalidConfig(
            "road network was not built from this catalog".into(),
        ));
    }

    let goal = NodeIndex::new(to);
    let (distance, path) = astar(
        network.graph(),
        NodeIndex::new(from),
        |n| n == goal,
        |e| OrderedFloat(*e.weight()),
        |_| OrderedFloat(0.0),
    )
    .ok_or_else(|| RouteError::NoPathExists {
        from: start.to_string(),
        to: end.to_string(),
    })?;

    let route = Route::new(path.into_iter().map(|n| n.index()).collect());
    tracing::debug!(hops = route.len().saturating_sub(1), km = distance.0, "baseline path");
    Ok((route, distance.0))
}
