//! Station records and the read-only catalog that owns them.

use crate::error::{Result, RouteError};
use std::collections::HashMap;

/// A charging location with fixed attributes.
///
/// Stations are identified by their unique `name`. Inside the crate a
/// station is referred to by its position in the [`StationCatalog`]
/// (a plain `usize`), which is also its node index in the road network.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Station {
    /// Unique identifier.
    pub name: String,

    /// Latitude in decimal degrees.
    pub latitude: f64,

    /// Longitude in decimal degrees.
    pub longitude: f64,

    /// Street address, informational only.
    #[cfg_attr(feature = "serde", serde(default))]
    pub address: String,

    /// Average energy dispensed per session (kWh).
    #[cfg_attr(feature = "serde", serde(default))]
    pub avg_energy_kwh: f64,

    /// Number of recorded charging sessions.
    #[cfg_attr(feature = "serde", serde(default))]
    pub usage_count: u32,

    /// Average charging rate (kW).
    pub charging_rate_kw: f64,

    /// Average fee (currency per kWh).
    pub fee_per_kwh: f64,
}

impl Station {
    /// Creates a station with the attributes the cost model reads.
    ///
    /// Address, average energy and usage count default to empty / zero.
    pub fn new(
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
        charging_rate_kw: f64,
        fee_per_kwh: f64,
    ) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
            address: String::new(),
            avg_energy_kwh: 0.0,
            usage_count: 0,
            charging_rate_kw,
            fee_per_kwh,
        }
    }

    /// Sets the street address.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Sets the session count.
    pub fn with_usage_count(mut self, usage_count: u32) -> Self {
        self.usage_count = usage_count;
        self
    }

    /// Sets the average energy dispensed per session.
    pub fn with_avg_energy_kwh(mut self, kwh: f64) -> Self {
        self.avg_energy_kwh = kwh;
        self
    }

    /// `(latitude, longitude)` pair.
    pub fn coordinates(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

/// Immutable collection of stations, indexed by name.
///
/// Insertion order is preserved: the station at position `i` has id `i`.
#[derive(Debug, Clone, Default)]
pub struct StationCatalog {
    stations: Vec<Station>,
    by_name: HashMap<String, usize>,
}

impl StationCatalog {
    /// Builds a catalog, rejecting duplicate station names.
    pub fn new(stations: Vec<Station>) -> Result<Self> {
        let mut by_name = HashMap::with_capacity(stations.len());
        for (idx, station) in stations.iter().enumerate() {
            if by_name.insert(station.name.clone(), idx).is_some() {
                return Err(RouteError::DuplicateStation {
                    name: station.name.clone(),
                });
            }
        }
        Ok(Self { stations, by_name })
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Returns the station with the given id.
    ///
    /// # Panics
    /// Panics if `id` is out of range. Ids only come from this catalog, so
    /// an out-of-range id is a caller bug.
    pub fn station(&self, id: usize) -> &Station {
        &self.stations[id]
    }

    /// Returns the station with the given id, if any.
    pub fn get(&self, id: usize) -> Option<&Station> {
        self.stations.get(id)
    }

    /// Looks up a station id by name.
    pub fn id_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Looks up a station id by name, failing with
    /// [`RouteError::UnknownStation`].
    pub fn resolve(&self, name: &str) -> Result<usize> {
        self.id_of(name).ok_or_else(|| RouteError::UnknownStation {
            name: name.to_string(),
        })
    }

    /// Name of the station with the given id.
    pub fn name(&self, id: usize) -> &str {
        &self.stations[id].name
    }

    pub fn iter(&self) -> impl Iterator<Item = &Station> {
        self.stations.iter()
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }
}
