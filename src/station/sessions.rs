//! Aggregation of raw charging-session records into a [`StationCatalog`].
//!
//! The station table consumed by the planner is usually derived from a log
//! of individual charging sessions. Reading that log is the caller's job;
//! this module only folds already-parsed records into per-station averages.

use super::types::{Station, StationCatalog};
use crate::error::Result;
use std::collections::BTreeMap;

/// One charging session as recorded by a station operator.
///
/// With the `serde` feature the field names match the column headers of the
/// public charging-session exports, so a CSV/JSON reader can deserialize
/// rows directly.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChargingSession {
    #[cfg_attr(feature = "serde", serde(rename = "Station Name"))]
    pub station_name: String,

    #[cfg_attr(feature = "serde", serde(rename = "Latitude"))]
    pub latitude: f64,

    #[cfg_attr(feature = "serde", serde(rename = "Longitude"))]
    pub longitude: f64,

    #[cfg_attr(feature = "serde", serde(rename = "Address 1", default))]
    pub address: String,

    #[cfg_attr(feature = "serde", serde(rename = "Energy (kWh)"))]
    pub energy_kwh: f64,

    /// Charging duration, `HH:MM:SS` or `N days HH:MM:SS`.
    #[cfg_attr(feature = "serde", serde(rename = "Charging Time (hh:mm:ss)"))]
    pub charging_time: String,

    #[cfg_attr(feature = "serde", serde(rename = "Fee", default))]
    pub fee: f64,
}

impl ChargingSession {
    /// Average power over the session in kW, or 0 when the duration is
    /// zero or cannot be parsed.
    pub fn charging_rate_kw(&self) -> f64 {
        match parse_duration_hours(&self.charging_time) {
            Some(hours) if hours > 0.0 => self.energy_kwh / hours,
            Some(_) => 0.0,
            None => {
                tracing::debug!(
                    station = %self.station_name,
                    value = %self.charging_time,
                    "unparseable charging time, rate counted as 0"
                );
                0.0
            }
        }
    }
}

/// Parses `HH:MM:SS` or `N days HH:MM:SS` (also `N day HH:MM:SS`) into
/// fractional hours.
pub fn parse_duration_hours(text: &str) -> Option<f64> {
    let mut parts = text.split_whitespace();
    let first = parts.next()?;
    let (days, clock) = match parts.next() {
        Some(unit) if unit.starts_with("day") => {
            let days: u32 = first.parse().ok()?;
            (days, parts.next()?)
        }
        Some(_) => return None,
        None => (0, first),
    };
    if parts.next().is_some() {
        return None;
    }

    let mut fields = clock.split(':');
    let h: u32 = fields.next()?.parse().ok()?;
    let m: u32 = fields.next()?.parse().ok()?;
    let s: u32 = fields.next()?.parse().ok()?;
    if fields.next().is_some() {
        return None;
    }

    Some(days as f64 * 24.0 + h as f64 + m as f64 / 60.0 + s as f64 / 3600.0)
}

#[derive(Default)]
struct Accumulator {
    latitude: f64,
    longitude: f64,
    address: String,
    sessions: u32,
    energy_sum: f64,
    rate_sum: f64,
    fee_sum: f64,
}

impl StationCatalog {
    /// Builds a catalog from charging sessions.
    ///
    /// Per station: coordinates and address from the first session seen,
    /// mean energy, session count as usage, mean per-session charging rate
    /// and mean fee. Stations are ordered by name.
    pub fn from_sessions<'a, I>(sessions: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a ChargingSession>,
    {
        let mut groups: BTreeMap<&str, Accumulator> = BTreeMap::new();

        for session in sessions {
            let acc = groups
                .entry(session.station_name.as_str())
                .or_insert_with(|| Accumulator {
                    latitude: session.latitude,
                    longitude: session.longitude,
                    address: session.address.clone(),
                    ..Accumulator::default()
                });
            acc.sessions += 1;
            acc.energy_sum += session.energy_kwh;
            acc.rate_sum += session.charging_rate_kw();
            acc.fee_sum += session.fee;
        }

        let stations = groups
            .into_iter()
            .map(|(name, acc)| {
                let n = acc.sessions as f64;
                Station::new(
                    name,
                    acc.latitude,
                    acc.longitude,
                    acc.rate_sum / n,
                    acc.fee_sum / n,
                )
                .with_address(acc.address)
                .with_avg_energy_kwh(acc.energy_sum / n)
                .with_usage_count(acc.sessions)
            })
            .collect();

        let catalog = StationCatalog::new(stations)?;
        tracing::debug!(stations = catalog.len(), "aggregated charging sessions");
        Ok(catalog)
    }
}
