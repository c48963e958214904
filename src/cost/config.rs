//! EV parameters for the route cost model.

/// Vehicle and pricing parameters, fixed for one optimization run.
///
/// # Defaults
///
/// ```
/// use ev_ecoroute::cost::EvParams;
///
/// let params = EvParams::default();
/// assert_eq!(params.max_range_km, 300.0);
/// assert_eq!(params.consumption_kwh_per_km, 0.2);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EvParams {
    /// Charge capacity; the battery starts every evaluation full.
    pub max_range_km: f64,

    /// Energy drawn per kilometer driven.
    pub consumption_kwh_per_km: f64,

    /// Cost per hour spent driving or charging.
    pub time_penalty_per_hour: f64,

    /// Cost per kWh consumed while driving.
    pub energy_cost_per_kwh: f64,
}

impl Default for EvParams {
    fn default() -> Self {
        Self {
            max_range_km: 300.0,
            consumption_kwh_per_km: 0.2,
            time_penalty_per_hour: 10.0,
            energy_cost_per_kwh: 0.3,
        }
    }
}

impl EvParams {
    pub fn with_max_range_km(mut self, km: f64) -> Self {
        self.max_range_km = km;
        self
    }

    pub fn with_consumption_kwh_per_km(mut self, kwh: f64) -> Self {
        self.consumption_kwh_per_km = kwh;
        self
    }

    pub fn with_time_penalty_per_hour(mut self, penalty: f64) -> Self {
        self.time_penalty_per_hour = penalty;
        self
    }

    pub fn with_energy_cost_per_kwh(mut self, cost: f64) -> Self {
        self.energy_cost_per_kwh = cost;
        self
    }

    /// Validates the parameters.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.max_range_km.is_finite() && self.max_range_km > 0.0) {
            return Err("max_range_km must be positive and finite".into());
        }
        if !(self.consumption_kwh_per_km.is_finite() && self.consumption_kwh_per_km >= 0.0) {
            return Err("consumption_kwh_per_km must be non-negative and finite".into());
        }
        if !(self.time_penalty_per_hour.is_finite() && self.time_penalty_per_hour >= 0.0) {
            return Err("time_penalty_per_hour must be non-negative and finite".into());
        }
        if !(self.energy_cost_per_kwh.is_finite() && self.energy_cost_per_kwh >= 0.0) {
            return Err("energy_cost_per_kwh must be non-negative and finite".into());
        }
        Ok(())
    }
}
