//! Error type shared by the planning entry points.
//!
//! An infeasible route is *not* an error: it is an ordinary outcome of the
//! search and is carried by [`RouteCost::Infeasible`](crate::cost::RouteCost).
//! Only conditions that stop a request from being answered at all end up
//! here.

/// Errors returned by catalog construction, network queries and planning.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RouteError {
    #[error("unknown station: {name}")]
    UnknownStation { name: String },

    #[error("at least 2 stations are required for routing, catalog has {count}")]
    InsufficientStations { count: usize },

    #[error("start and end are the same station: {name}")]
    SameEndpoints { name: String },

    #[error("no path exists between {from} and {to}")]
    NoPathExists { from: String, to: String },

    #[error("no edge between station #{from} and station #{to}")]
    NoSuchEdge { from: usize, to: usize },

    #[error("duplicate station identifier: {name}")]
    DuplicateStation { name: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result alias with [`RouteError`] as the default error type.
pub type Result<T, E = RouteError> = std::result::Result<T, E>;
