//! Battery-aware route cost evaluation.

use super::config::EvParams;
use super::speed::{sanitize_speed, ConstantSpeed, Segment, SpeedEstimator};
use super::types::{Infeasibility, Leg, RouteBreakdown, RouteCost};
use crate::network::RoadNetwork;
use crate::route::Route;
use crate::station::{Station, StationCatalog};
use chrono::{Duration, NaiveDateTime};
use std::fmt;
use std::sync::Arc;

/// Scores routes against the EV's battery, time and charging rules.
///
/// The model holds no mutable state: an evaluation is a pure function of
/// the route, the network, the catalog, the parameters and the start time,
/// so one model can be shared by any number of evaluation workers.
///
/// For each leg, starting full at `max_range_km`:
///
/// 1. no edge → infeasible
/// 2. `energy = distance * consumption`
/// 3. if the charge is below `energy`, fill the battery at the departure
///    station (`time = added / rate`, `cost = added * fee`)
/// 4. `travel = distance / speed(leg, now)`
/// 5. deduct `energy`; a negative charge → infeasible
/// 6. `cost += (travel + charging) * time_penalty + energy * energy_cost + charging_cost`
/// 7. advance the clock by `travel + charging`
#[derive(Clone)]
pub struct CostModel {
    params: EvParams,
    speed: Arc<dyn SpeedEstimator>,
}

impl fmt::Debug for CostModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CostModel")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl Default for CostModel {
    fn default() -> Self {
        Self::new(EvParams::default())
    }
}

impl CostModel {
    /// Creates a model using [`ConstantSpeed`] (35 km/h).
    pub fn new(params: EvParams) -> Self {
        Self {
            params,
            speed: Arc::new(ConstantSpeed::default()),
        }
    }

    /// Replaces the speed estimator.
    pub fn with_speed_estimator<S: SpeedEstimator + 'static>(self, estimator: S) -> Self {
        self.with_shared_speed_estimator(Arc::new(estimator))
    }

    /// Replaces the speed estimator with an already shared one.
    pub fn with_shared_speed_estimator(mut self, estimator: Arc<dyn SpeedEstimator>) -> Self {
        self.speed = estimator;
        self
    }

    pub fn params(&self) -> &EvParams {
        &self.params
    }

    /// Total cost of `route` departing at `start_time`.
    ///
    /// # Panics
    /// Panics if the route references a station outside `catalog`, or if
    /// `network` was not built from `catalog`.
    pub fn evaluate(
        &self,
        route: &Route,
        network: &RoadNetwork,
        catalog: &StationCatalog,
        start_time: NaiveDateTime,
    ) -> RouteCost {
        match self.walk(route.stops(), network, catalog, start_time, |_| {}) {
            Ok((total, _)) => RouteCost::from_f64(total),
            Err(_) => RouteCost::Infeasible,
        }
    }

    /// Leg-by-leg account of `route`, or the reason it cannot be driven.
    pub fn breakdown(
        &self,
        route: &Route,
        network: &RoadNetwork,
        catalog: &StationCatalog,
        start_time: NaiveDateTime,
    ) -> Result<RouteBreakdown, Infeasibility> {
        let mut legs = Vec::with_capacity(route.len().saturating_sub(1));
        let (total_cost, arrival) =
            self.walk(route.stops(), network, catalog, start_time, |leg| legs.push(leg))?;
        Ok(RouteBreakdown {
            legs,
            total_cost,
            arrival,
        })
    }

    fn walk<F: FnMut(Leg)>(
        &self,
        stops: &[usize],
        network: &RoadNetwork,
        catalog: &StationCatalog,
        start_time: NaiveDateTime,
        mut on_leg: F,
    ) -> Result<(f64, NaiveDateTime), Infeasibility> {
        assert_eq!(
            network.node_count(),
            catalog.len(),
            "road network and station catalog do not match"
        );
        if stops.len() < 2 {
            return Err(Infeasibility::TooShort { stops: stops.len() });
        }

        let p = &self.params;
        let mut charge = p.max_range_km;
        let mut now = start_time;
        let mut total = 0.0;

        for (leg, pair) in stops.windows(2).enumerate() {
            let (from, to) = (pair[0], pair[1]);
            let from_station = station(catalog, from);
            let to_station = station(catalog, to);

            let distance_km = network
                .edge_distance(from, to)
                .map_err(|_| Infeasibility::NoEdge { leg, from, to })?;
            let energy_kwh = distance_km * p.consumption_kwh_per_km;

            let (charge_added, charging_hours, charging_cost) = if charge < energy_kwh {
                let rate = from_station.charging_rate_kw;
                if !(rate.is_finite() && rate > 0.0) {
                    return Err(Infeasibility::CannotCharge { leg, station: from });
                }
                let headroom = p.max_range_km - charge;
                let added = (headroom + energy_kwh).min(headroom);
                charge = (charge + added).min(p.max_range_km);
                (added, added / rate, added * from_station.fee_per_kwh)
            } else {
                (0.0, 0.0, 0.0)
            };

            let segment = Segment {
                from,
                to,
                from_station,
                to_station,
                distance_km,
            };
            let speed_kmh = sanitize_speed(self.speed.speed_kmh(&segment, now), &segment);
            let travel_hours = distance_km / speed_kmh;

            charge -= energy_kwh;
            if charge < 0.0 {
                return Err(Infeasibility::ChargeShortfall {
                    leg,
                    from,
                    to,
                    deficit: -charge,
                });
            }

            let cost = (travel_hours + charging_hours) * p.time_penalty_per_hour
                + energy_kwh * p.energy_cost_per_kwh
                + charging_cost;
            total += cost;

            on_leg(Leg {
                from,
                to,
                distance_km,
                energy_kwh,
                charge_added,
                charging_hours,
                charging_cost,
                speed_kmh,
                travel_hours,
                charge_after: charge,
                departure: now,
                cost,
            });

            now = advance(now, travel_hours + charging_hours);
        }

        Ok((total, now))
    }
}

/// Cost of `route` under `model`; [`RouteCost::Infeasible`] when any leg is
/// missing an edge or runs the battery below zero.
pub fn evaluate_route(
    route: &Route,
    network: &RoadNetwork,
    catalog: &StationCatalog,
    model: &CostModel,
    start_time: NaiveDateTime,
) -> RouteCost {
    model.evaluate(route, network, catalog, start_time)
}

fn station(catalog: &StationCatalog, id: usize) -> &Station {
    catalog
        .get(id)
        .unwrap_or_else(|| panic!("route references station #{id} outside the catalog"))
}

fn advance(t: NaiveDateTime, hours: f64) -> NaiveDateTime {
    let ms = (hours * 3_600_000.0).round();
    if !(ms.is_finite() && ms.abs() < 1e15) {
        return NaiveDateTime::MAX;
    }
    t.checked_add_signed(Duration::milliseconds(ms as i64))
        .unwrap_or(NaiveDateTime::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::TrafficProfile;
    use crate::network::build_network;
    use chrono::{NaiveDate, Timelike};
    use proptest::prelude::*;

    // degrees of longitude per 10 km on the equator
    const STEP: f64 = 10.0 / 111.194_926_644_558_74;

    fn t0() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2018, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    /// A, B, C in a line 10 km apart, D 100 km away, E co-located with A
    /// but unable to charge.
    fn fixture() -> (StationCatalog, RoadNetwork) {
        let catalog = StationCatalog::new(vec![
            Station::new("A", 0.0, 0.0, 10.0, 0.5),
            Station::new("B", 0.0, STEP, 10.0, 0.5),
            Station::new("C", 0.0, 2.0 * STEP, 10.0, 0.5),
            Station::new("D", 0.0, 10.0 * STEP, 10.0, 0.5),
            Station::new("E", 0.0, 0.0, 0.0, 0.5),
        ])
        .unwrap();
        let network = build_network(&catalog, 20.0);
        (catalog, network)
    }

    fn leg_cost(distance: f64, params: &EvParams) -> f64 {
        (distance / 35.0) * params.time_penalty_per_hour
            + distance * params.consumption_kwh_per_km * params.energy_cost_per_kwh
    }

    #[test]
    fn test_single_leg_cost() {
        let (catalog, network) = fixture();
        let model = CostModel::default();
        let cost = model.evaluate(&Route::new(vec![0, 1]), &network, &catalog, t0());
        let expected = leg_cost(10.0, model.params());
        assert!((cost.value() - expected).abs() < 1e-6, "{cost:?} vs {expected}");
    }

    #[test]
    fn test_costs_add_up_over_legs() {
        let (catalog, network) = fixture();
        let model = CostModel::default();
        let cost = evaluate_route(&Route::new(vec![0, 1, 2]), &network, &catalog, &model, t0());
        let expected = 2.0 * leg_cost(10.0, model.params());
        assert!((cost.value() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_missing_edge_is_infeasible() {
        let (catalog, network) = fixture();
        let model = CostModel::default();
        let route = Route::new(vec![0, 1, 3]);
        assert_eq!(
            model.evaluate(&route, &network, &catalog, t0()),
            RouteCost::Infeasible
        );
        assert_eq!(
            model.breakdown(&route, &network, &catalog, t0()).unwrap_err(),
            Infeasibility::NoEdge { leg: 1, from: 1, to: 3 }
        );
    }

    #[test]
    fn test_short_routes_are_infeasible() {
        let (catalog, network) = fixture();
        let model = CostModel::default();
        for stops in [vec![], vec![2]] {
            let route = Route::new(stops.clone());
            assert_eq!(model.evaluate(&route, &network, &catalog, t0()), RouteCost::Infeasible);
            assert_eq!(
                model.breakdown(&route, &network, &catalog, t0()).unwrap_err(),
                Infeasibility::TooShort { stops: stops.len() }
            );
        }
    }

    #[test]
    fn test_charging_stop_fills_battery() {
        let (catalog, network) = fixture();
        let params = EvParams::default().with_max_range_km(3.0);
        let model = CostModel::new(params.clone());
        let route = Route::new(vec![0, 1, 2]);

        let breakdown = model.breakdown(&route, &network, &catalog, t0()).unwrap();
        assert_eq!(breakdown.legs.len(), 2);

        let first = &breakdown.legs[0];
        assert!(!first.charged());
        assert!((first.charge_after - 1.0).abs() < 1e-6);

        // 1 left, 2 needed: fill the 2 missing up to 3
        let second = &breakdown.legs[1];
        assert!(second.charged());
        assert!((second.charge_added - 2.0).abs() < 1e-6);
        assert!((second.charging_hours - 0.2).abs() < 1e-6);
        assert!((second.charging_cost - 1.0).abs() < 1e-6);
        assert!((second.charge_after - 1.0).abs() < 1e-6);

        let expected = leg_cost(10.0, &params) + leg_cost(10.0, &params) + 0.2 * 10.0 + 1.0;
        assert!((breakdown.total_cost - expected).abs() < 1e-6);
        assert_eq!(breakdown.charging_stops().count(), 1);
        assert!((breakdown.total_distance_km() - 20.0).abs() < 1e-6);
        assert!((breakdown.total_energy_kwh() - 4.0).abs() < 1e-6);

        let cost = model.evaluate(&route, &network, &catalog, t0());
        assert!((cost.value() - breakdown.total_cost).abs() < 1e-12);
    }

    #[test]
    fn test_leg_beyond_full_battery_is_infeasible() {
        let (catalog, network) = fixture();
        // 10 km needs 4 kWh, the battery holds 3
        let model = CostModel::new(
            EvParams::default()
                .with_max_range_km(3.0)
                .with_consumption_kwh_per_km(0.4),
        );
        let route = Route::new(vec![0, 1]);
        assert_eq!(model.evaluate(&route, &network, &catalog, t0()), RouteCost::Infeasible);
        match model.breakdown(&route, &network, &catalog, t0()) {
            Err(Infeasibility::ChargeShortfall { leg, deficit, .. }) => {
                assert_eq!(leg, 0);
                assert!((deficit - 1.0).abs() < 1e-6);
            }
            other => panic!("expected charge shortfall, got {other:?}"),
        }
    }

    #[test]
    fn test_station_without_charger() {
        let (catalog, network) = fixture();
        let model = CostModel::new(EvParams::default().with_max_range_km(3.0));

        // E never has to charge here: it departs full
        let route = Route::new(vec![4, 1, 0]);
        assert!(model.evaluate(&route, &network, &catalog, t0()).is_feasible());

        // B->A leaves 1, A->E is 0 km, E->B needs 2 and E has no charger
        let route = Route::new(vec![1, 0, 4, 1]);
        assert_eq!(
            model.breakdown(&route, &network, &catalog, t0()).unwrap_err(),
            Infeasibility::CannotCharge { leg: 2, station: 4 }
        );
    }

    fn stalled(_segment: &Segment<'_>, _departure: NaiveDateTime) -> f64 {
        0.0
    }

    #[test]
    fn test_zero_speed_is_clamped() {
        let (catalog, network) = fixture();
        let model = CostModel::default().with_speed_estimator(stalled);
        let breakdown = model
            .breakdown(&Route::new(vec![0, 1]), &network, &catalog, t0())
            .unwrap();
        assert_eq!(breakdown.legs[0].speed_kmh, crate::cost::MIN_SPEED_KMH);
        assert!(breakdown.total_cost.is_finite());
        assert!((breakdown.legs[0].travel_hours - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_clock_advances_between_legs() {
        let (catalog, network) = fixture();
        // Monday 06:45: first leg before the rush hour, second inside it
        let start = NaiveDate::from_ymd_opt(2018, 1, 1)
            .unwrap()
            .and_hms_opt(6, 45, 0)
            .unwrap();
        let model = CostModel::default().with_speed_estimator(TrafficProfile::default());
        let breakdown = model
            .breakdown(&Route::new(vec![0, 1, 2]), &network, &catalog, start)
            .unwrap();

        assert_eq!(breakdown.legs[0].departure, start);
        assert!((breakdown.legs[0].speed_kmh - 35.0).abs() < 1e-9);
        // 10 km at 35 km/h is ~17 minutes, so the second leg leaves after 07:00
        assert_eq!(breakdown.legs[1].departure.hour(), 7);
        assert!((breakdown.legs[1].speed_kmh - 21.0).abs() < 1e-9);
        assert!(breakdown.arrival > breakdown.legs[1].departure);
        assert!((breakdown.total_hours() - (10.0 / 35.0 + 10.0 / 21.0)).abs() < 1e-6);
    }

    #[test]
    #[should_panic(expected = "outside the catalog")]
    fn test_unknown_station_id_panics() {
        let (catalog, network) = fixture();
        CostModel::default().evaluate(&Route::new(vec![0, 99]), &network, &catalog, t0());
    }

    proptest! {
        #[test]
        fn prop_evaluation_is_deterministic(stops in prop::collection::vec(0usize..5, 0..8)) {
            let (catalog, network) = fixture();
            let model = CostModel::default().with_speed_estimator(TrafficProfile::default());
            let route = Route::new(stops);
            let a = model.evaluate(&route, &network, &catalog, t0());
            let b = model.evaluate(&route, &network, &catalog, t0());
            prop_assert_eq!(a, b);
        }
    }
}
