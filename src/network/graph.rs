//! Proximity road network over the station catalog.

use super::geo::haversine_km;
use crate::error::{Result, RouteError};
use crate::station::StationCatalog;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::instrument;

/// Maximum great-circle distance (km) for two stations to be directly
/// connected.
pub const DEFAULT_PROXIMITY_KM: f64 = 20.0;

/// Undirected, distance-weighted graph whose nodes are catalog stations.
///
/// Node `i` is station id `i` of the catalog the network was built from.
/// An edge joins two distinct stations iff their great-circle distance is
/// at most the proximity threshold; there are no self-loops and the graph
/// may be disconnected. The network is never mutated after construction.
#[derive(Debug, Clone)]
pub struct RoadNetwork {
    graph: UnGraph<usize, f64>,
    proximity_km: f64,
}

/// Builds the road network with `O(N²)` pairwise distance computations.
///
/// Fewer than two stations yields a network without edges; routing requests
/// against it fail with [`RouteError::InsufficientStations`].
#[instrument(level = "debug", skip_all, fields(stations = catalog.len(), proximity_km = proximity_km))]
pub fn build_network(catalog: &StationCatalog, proximity_km: f64) -> RoadNetwork {
    let n = catalog.len();
    let mut graph = UnGraph::with_capacity(n, 0);
    for id in 0..n {
        graph.add_node(id);
    }

    let within = |i: usize, j: usize| {
        let (lat1, lon1) = catalog.station(i).coordinates();
        let (lat2, lon2) = catalog.station(j).coordinates();
        let d = haversine_km(lat1, lon1, lat2, lon2);
        (d <= proximity_km).then_some((i, j, d))
    };

    #[cfg(feature = "parallel")]
    let edges: Vec<(usize, usize, f64)> = (0..n)
        .into_par_iter()
        .flat_map_iter(|i| ((i + 1)..n).filter_map(move |j| within(i, j)))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let edges: Vec<(usize, usize, f64)> = (0..n)
        .flat_map(|i| ((i + 1)..n).filter_map(move |j| within(i, j)))
        .collect();

    for (i, j, d) in edges {
        graph.add_edge(NodeIndex::new(i), NodeIndex::new(j), d);
    }

    tracing::debug!(edges = graph.edge_count(), "road network built");
    RoadNetwork {
        graph,
        proximity_km,
    }
}

impl RoadNetwork {
    /// Number of stations (nodes).
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Threshold the network was built with.
    pub fn proximity_km(&self) -> f64 {
        self.proximity_km
    }

    /// Whether `a` and `b` are directly connected. Always `false` for
    /// `a == b` and for ids outside the network.
    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.find(a, b).is_some()
    }

    /// Distance in km of the edge between `a` and `b`.
    pub fn edge_distance(&self, a: usize, b: usize) -> Result<f64> {
        self.find(a, b)
            .ok_or(RouteError::NoSuchEdge { from: a, to: b })
    }

    /// Stations directly connected to `a`, in ascending id order.
    pub fn neighbors(&self, a: usize) -> Vec<usize> {
        if a >= self.node_count() {
            return Vec::new();
        }
        let mut out: Vec<usize> = self
            .graph
            .neighbors(NodeIndex::new(a))
            .map(|n| n.index())
            .collect();
        out.sort_unstable();
        out
    }

    /// All edges as `(a, b, distance_km)` with `a < b`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.graph.edge_references().map(|e| {
            let (a, b) = (e.source().index(), e.target().index());
            (a.min(b), a.max(b), *e.weight())
        })
    }

    pub(crate) fn graph(&self) -> &UnGraph<usize, f64> {
        &self.graph
    }

    fn find(&self, a: usize, b: usize) -> Option<f64> {
        let n = self.node_count();
        if a == b || a >= n || b >= n {
            return None;
        }
        self.graph
            .find_edge(NodeIndex::new(a), NodeIndex::new(b))
            .map(|e| self.graph[e])
    }
}
