//! Optimizer versus distance-only baseline.

use super::optimizer::OptimizedRoute;
use crate::cost::RouteCost;
use crate::route::Route;
use crate::station::StationCatalog;
use std::fmt;

/// Nominal cost per km used to price the baseline path.
pub const BASELINE_COST_PER_KM: f64 = 10.0;

/// Side-by-side numbers for one optimizer run and its baseline.
///
/// The baseline ignores battery range and time, so its cost is estimated as
/// `distance * baseline_cost_per_km`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BenchmarkReport {
    pub optimized_stops: Vec<String>,
    pub optimized_cost: RouteCost,
    /// `None` when the baseline found no path.
    pub baseline_stops: Option<Vec<String>>,
    pub baseline_distance_km: Option<f64>,
    pub baseline_cost_per_km: f64,
}

impl BenchmarkReport {
    /// Compares an optimizer outcome with a baseline path.
    ///
    /// Pass `None` as `baseline` when [`shortest_path`](super::shortest_path)
    /// failed.
    pub fn new(
        optimized: &OptimizedRoute,
        baseline: Option<(&Route, f64)>,
        catalog: &StationCatalog,
    ) -> Self {
        Self {
            optimized_stops: owned_names(&optimized.route, catalog),
            optimized_cost: optimized.cost,
            baseline_stops: baseline.map(|(route, _)| owned_names(route, catalog)),
            baseline_distance_km: baseline.map(|(_, km)| km),
            baseline_cost_per_km: BASELINE_COST_PER_KM,
        }
    }

    pub fn with_baseline_cost_per_km(mut self, cost_per_km: f64) -> Self {
        self.baseline_cost_per_km = cost_per_km;
        self
    }

    /// Estimated cost of the baseline path.
    pub fn baseline_cost(&self) -> Option<f64> {
        self.baseline_distance_km
            .map(|km| km * self.baseline_cost_per_km)
    }

    /// Percentage by which the optimized cost undercuts the baseline
    /// estimate; negative when it is more expensive.
    ///
    /// `None` if either side is unusable: an infeasible optimized route, a
    /// missing baseline, or a zero baseline estimate.
    pub fn improvement_pct(&self) -> Option<f64> {
        let cost = self.optimized_cost.feasible()?;
        let base = self.baseline_cost()?;
        if base <= 0.0 || !base.is_finite() {
            return None;
        }
        Some((base - cost) / base * 100.0)
    }
}

fn owned_names(route: &Route, catalog: &StationCatalog) -> Vec<String> {
    route.names(catalog).into_iter().map(str::to_owned).collect()
}

impl fmt::Display for BenchmarkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Eco-route: {}", self.optimized_stops.join(" -> "))?;
        writeln!(f, "  cost: {}", self.optimized_cost)?;
        match (&self.baseline_stops, self.baseline_distance_km) {
            (Some(stops), Some(km)) => {
                writeln!(f, "Baseline: {}", stops.join(" -> "))?;
                writeln!(f, "  distance: {km:.2} km")?;
                writeln!(
                    f,
                    "  estimated cost: {:.2}",
                    km * self.baseline_cost_per_km
                )?;
            }
            _ => writeln!(f, "Baseline: no path")?,
        }
        match self.improvement_pct() {
            Some(pct) => write!(f, "Improvement: {pct:.2}%"),
            None => write!(f, "Improvement: n/a"),
        }
    }
}
