//! Travel-speed estimation for route legs.
//!
//! Speed forecasting lives outside this crate. The cost model only needs a
//! km/h figure per leg and departure time, supplied through
//! [`SpeedEstimator`]. Two built-in strategies exist: [`ConstantSpeed`]
//! (the default, 35 km/h) and [`TrafficProfile`], a deterministic
//! time-of-day profile. Any `Fn(&Segment, NaiveDateTime) -> f64` closure is
//! also an estimator.

use crate::station::Station;
use chrono::{Datelike, NaiveDateTime, Timelike};

/// Default urban travel speed.
pub const DEFAULT_SPEED_KMH: f64 = 35.0;

/// Lowest speed the cost model will use. Estimates at or below zero, or
/// non-finite ones, are replaced by this value.
pub const MIN_SPEED_KMH: f64 = 1.0;

/// One directed leg of a route being costed.
#[derive(Debug, Clone, Copy)]
pub struct Segment<'a> {
    pub from: usize,
    pub to: usize,
    pub from_station: &'a Station,
    pub to_station: &'a Station,
    pub distance_km: f64,
}

/// Supplies travel speed (km/h) for a leg departing at a given time.
///
/// Implementations are shared across evaluation workers and must be pure
/// with respect to their inputs.
pub trait SpeedEstimator: Send + Sync {
    fn speed_kmh(&self, segment: &Segment<'_>, departure: NaiveDateTime) -> f64;
}

impl<F> SpeedEstimator for F
where
    F: Fn(&Segment<'_>, NaiveDateTime) -> f64 + Send + Sync,
{
    fn speed_kmh(&self, segment: &Segment<'_>, departure: NaiveDateTime) -> f64 {
        self(segment, departure)
    }
}

/// Same speed for every leg at every time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantSpeed(pub f64);

impl Default for ConstantSpeed {
    fn default() -> Self {
        ConstantSpeed(DEFAULT_SPEED_KMH)
    }
}

impl SpeedEstimator for ConstantSpeed {
    fn speed_kmh(&self, _segment: &Segment<'_>, _departure: NaiveDateTime) -> f64 {
        self.0
    }
}

/// Time-of-day traffic profile.
///
/// `base * hour_factor * weekend_factor * usage_factor`, clamped to
/// `[min_kmh, max_kmh]`:
///
/// | hours                 | factor |
/// |-----------------------|--------|
/// | 7–9, 17–19            | 0.6    |
/// | 10, 11, 14–16         | 0.8    |
/// | 22–23, 0–5            | 1.2    |
/// | otherwise             | 1.0    |
///
/// Saturdays and Sundays get an extra ×1.1. The usage factor is
/// `1 + usage_count / 1000 * 0.2` of the departure station.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrafficProfile {
    pub base_kmh: f64,
    pub min_kmh: f64,
    pub max_kmh: f64,
}

impl Default for TrafficProfile {
    fn default() -> Self {
        Self {
            base_kmh: DEFAULT_SPEED_KMH,
            min_kmh: 10.0,
            max_kmh: 80.0,
        }
    }
}

impl TrafficProfile {
    fn hour_factor(hour: u32) -> f64 {
        match hour {
            7..=9 | 17..=19 => 0.6,
            10 | 11 | 14..=16 => 0.8,
            22 | 23 | 0..=5 => 1.2,
            _ => 1.0,
        }
    }
}

impl SpeedEstimator for TrafficProfile {
    fn speed_kmh(&self, segment: &Segment<'_>, departure: NaiveDateTime) -> f64 {
        let mut factor = Self::hour_factor(departure.hour());
        if departure.weekday().num_days_from_monday() >= 5 {
            factor *= 1.1;
        }
        let usage = 1.0 + (segment.from_station.usage_count as f64 / 1000.0) * 0.2;
        (self.base_kmh * factor * usage).clamp(self.min_kmh, self.max_kmh)
    }
}

/// Replaces unusable estimates with [`MIN_SPEED_KMH`].
pub(crate) fn sanitize_speed(kmh: f64, segment: &Segment<'_>) -> f64 {
    if kmh.is_finite() && kmh > 0.0 {
        kmh
    } else {
        tracing::warn!(
            from = %segment.from_station.name,
            to = %segment.to_station.name,
            estimate = kmh,
            "speed estimate not usable, clamping to {MIN_SPEED_KMH} km/h"
        );
        MIN_SPEED_KMH
    }
}
