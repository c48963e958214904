//! Route cost model.
//!
//! Scores a candidate route under EV battery, time and charging rules.
//!
//! # Key Types
//!
//! - [`EvParams`]: vehicle range, consumption and pricing
//! - [`CostModel`]: the pure evaluation function plus its speed strategy
//! - [`RouteCost`]: typed cost, `Feasible(f64)` or `Infeasible`
//! - [`RouteBreakdown`]: per-leg battery and cost profile of a feasible route
//!
//! Infeasible routes are expected during search and are never errors.

mod config;
mod model;
mod speed;
mod types;

pub use config::EvParams;
pub use model::{evaluate_route, CostModel};
pub use speed::{
    ConstantSpeed, Segment, SpeedEstimator, TrafficProfile, DEFAULT_SPEED_KMH, MIN_SPEED_KMH,
};
pub use types::{Infeasibility, Leg, RouteBreakdown, RouteCost};
