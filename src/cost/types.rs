//! Cost values and per-leg breakdowns.

use crate::ga::Fitness;
use chrono::NaiveDateTime;
use std::cmp::Ordering;
use std::fmt;

/// Total cost of a route. Lower is better.
///
/// Infeasible routes are a normal search outcome rather than an error and
/// order after every feasible cost.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RouteCost {
    Feasible(f64),
    Infeasible,
}

impl RouteCost {
    /// Wraps a raw cost; `+∞` and NaN become [`RouteCost::Infeasible`].
    pub fn from_f64(value: f64) -> Self {
        if value.is_finite() {
            RouteCost::Feasible(value)
        } else {
            RouteCost::Infeasible
        }
    }

    /// Raw cost, `f64::INFINITY` when infeasible.
    pub fn value(self) -> f64 {
        match self {
            RouteCost::Feasible(v) => v,
            RouteCost::Infeasible => f64::INFINITY,
        }
    }

    pub fn is_feasible(self) -> bool {
        matches!(self, RouteCost::Feasible(_))
    }

    pub fn feasible(self) -> Option<f64> {
        match self {
            RouteCost::Feasible(v) => Some(v),
            RouteCost::Infeasible => None,
        }
    }
}

impl PartialOrd for RouteCost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (RouteCost::Feasible(a), RouteCost::Feasible(b)) => a.partial_cmp(b),
            (RouteCost::Feasible(_), RouteCost::Infeasible) => Some(Ordering::Less),
            (RouteCost::Infeasible, RouteCost::Feasible(_)) => Some(Ordering::Greater),
            (RouteCost::Infeasible, RouteCost::Infeasible) => Some(Ordering::Equal),
        }
    }
}

impl Fitness for RouteCost {
    fn worst() -> Self {
        RouteCost::Infeasible
    }

    fn to_f64(self) -> f64 {
        self.value()
    }
}

impl fmt::Display for RouteCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteCost::Feasible(v) => write!(f, "{v:.2}"),
            RouteCost::Infeasible => f.write_str("infeasible"),
        }
    }
}

/// Why a route cannot be driven. `leg` is the zero-based leg index.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum Infeasibility {
    #[error("route has {stops} stop(s), at least 2 are required")]
    TooShort { stops: usize },

    #[error("leg {leg}: no road between station #{from} and station #{to}")]
    NoEdge { leg: usize, from: usize, to: usize },

    #[error("leg {leg}: station #{station} cannot charge (rate is not positive)")]
    CannotCharge { leg: usize, station: usize },

    #[error("leg {leg}: charge falls short by {deficit:.3} between station #{from} and station #{to}")]
    ChargeShortfall {
        leg: usize,
        from: usize,
        to: usize,
        deficit: f64,
    },
}

/// One costed leg of a feasible route.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Leg {
    pub from: usize,
    pub to: usize,
    pub distance_km: f64,
    pub energy_kwh: f64,
    /// Charge added at `from` before departing (0 when no stop was needed).
    pub charge_added: f64,
    pub charging_hours: f64,
    pub charging_cost: f64,
    pub speed_kmh: f64,
    pub travel_hours: f64,
    /// Remaining charge on arrival at `to`.
    pub charge_after: f64,
    pub departure: NaiveDateTime,
    pub cost: f64,
}

impl Leg {
    pub fn charged(&self) -> bool {
        self.charge_added > 0.0
    }
}

/// Leg-by-leg account of a feasible route: the battery profile plus the
/// cost components the total is built from.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteBreakdown {
    pub legs: Vec<Leg>,
    pub total_cost: f64,
    pub arrival: NaiveDateTime,
}

impl RouteBreakdown {
    pub fn total_distance_km(&self) -> f64 {
        self.legs.iter().map(|l| l.distance_km).sum()
    }

    pub fn total_energy_kwh(&self) -> f64 {
        self.legs.iter().map(|l| l.energy_kwh).sum()
    }

    pub fn total_hours(&self) -> f64 {
        self.legs
            .iter()
            .map(|l| l.travel_hours + l.charging_hours)
            .sum()
    }

    /// Legs that began with a charging stop.
    pub fn charging_stops(&self) -> impl Iterator<Item = &Leg> {
        self.legs.iter().filter(|l| l.charged())
    }
}
