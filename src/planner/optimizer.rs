//! Genetic search for the cheapest drivable route.
//!
//! Candidates are `[start] + intermediates + [end]` with every station at
//! most once. [`RouteProblem`] binds the route operators and the
//! [`CostModel`] to the generic [`GaRunner`].

use crate::cost::{CostModel, RouteCost};
use crate::error::{Result, RouteError};
use crate::ga::operators::{one_point_crossover, replace_mutation};
use crate::ga::{create_rng, GaConfig, GaProblem, GaRunner, Individual};
use crate::network::RoadNetwork;
use crate::route::Route;
use crate::station::StationCatalog;
use chrono::NaiveDateTime;
use rand::Rng;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::instrument;

/// A route plus its (possibly stale) cost.
#[derive(Debug, Clone)]
pub struct RouteCandidate {
    route: Route,
    cost: Option<RouteCost>,
}

impl RouteCandidate {
    pub fn new(route: Route) -> Self {
        Self { route, cost: None }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }
}

impl Individual for RouteCandidate {
    type Fitness = RouteCost;

    fn fitness(&self) -> RouteCost {
        self.cost.unwrap_or(RouteCost::Infeasible)
    }

    fn set_fitness(&mut self, cost: RouteCost) {
        self.cost = Some(cost);
    }

    fn is_evaluated(&self) -> bool {
        self.cost.is_some()
    }

    fn invalidate(&mut self) {
        self.cost = None;
    }
}

/// Route search between two fixed stations.
pub struct RouteProblem<'a> {
    network: &'a RoadNetwork,
    catalog: &'a StationCatalog,
    model: &'a CostModel,
    start: usize,
    end: usize,
    intermediates: Vec<usize>,
    max_stops: usize,
    departure: NaiveDateTime,
}

impl<'a> RouteProblem<'a> {
    /// Every station other than `start` and `end` is a candidate stop.
    pub fn new(
        network: &'a RoadNetwork,
        catalog: &'a StationCatalog,
        model: &'a CostModel,
        start: usize,
        end: usize,
        departure: NaiveDateTime,
    ) -> Self {
        let intermediates = (0..catalog.len())
            .filter(|&id| id != start && id != end)
            .collect();
        Self {
            network,
            catalog,
            model,
            start,
            end,
            intermediates,
            max_stops: GaConfig::default().max_intermediate_stops,
            departure,
        }
    }

    /// Caps the intermediate stops of freshly created routes.
    pub fn with_max_stops(mut self, max_stops: usize) -> Self {
        self.max_stops = max_stops.max(1);
        self
    }

    pub fn intermediates(&self) -> &[usize] {
        &self.intermediates
    }

    fn with_endpoints(&self, interior: impl IntoIterator<Item = usize>) -> Route {
        let mut stops = vec![self.start];
        stops.extend(interior);
        stops.push(self.end);
        Route::new(stops)
    }
}

impl GaProblem for RouteProblem<'_> {
    type Individual = RouteCandidate;

    fn create_individual<R: Rng>(&self, rng: &mut R) -> RouteCandidate {
        let pool = self.intermediates.len();
        if pool == 0 {
            return RouteCandidate::new(self.with_endpoints(std::iter::empty()));
        }
        let k = rng.random_range(1..=self.max_stops.min(pool));
        let picks = rand::seq::index::sample(rng, pool, k);
        RouteCandidate::new(self.with_endpoints(picks.iter().map(|i| self.intermediates[i])))
    }

    fn evaluate(&self, candidate: &RouteCandidate) -> RouteCost {
        self.model
            .evaluate(&candidate.route, self.network, self.catalog, self.departure)
    }

    fn crossover<R: Rng>(
        &self,
        parent1: &RouteCandidate,
        parent2: &RouteCandidate,
        rng: &mut R,
    ) -> (RouteCandidate, RouteCandidate) {
        let (c1, c2) = one_point_crossover(parent1.route.stops(), parent2.route.stops(), rng);
        (
            RouteCandidate::new(Route::new(c1)),
            RouteCandidate::new(Route::new(c2)),
        )
    }

    fn mutate<R: Rng>(&self, candidate: &mut RouteCandidate, rng: &mut R) {
        let mut stops = std::mem::take(&mut candidate.route).into_stops();
        replace_mutation(&mut stops, &self.intermediates, rng);
        candidate.route = Route::new(stops);
    }
}

/// Outcome of [`optimize_route`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizedRoute {
    /// Cheapest route seen during the run.
    pub route: Route,
    /// Cost of `route`.
    pub cost: RouteCost,
    /// Cheapest cost in the initial population.
    pub initial_best_cost: RouteCost,
    /// Cheapest cost in the last population.
    pub final_population_cost: RouteCost,
    pub generations: usize,
    pub cancelled: bool,
    pub timed_out: bool,
    /// Best-so-far cost after initialization and after each generation;
    /// `+∞` while nothing feasible has been found.
    pub cost_history: Vec<f64>,
}

/// Options for a single optimization request beyond [`GaConfig`].
#[derive(Debug, Clone, Default)]
pub struct OptimizeOptions {
    /// Departure time; the local clock when `None`.
    pub departure: Option<NaiveDateTime>,
    /// Stops the run before the next generation once set.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl OptimizeOptions {
    pub fn with_departure(mut self, departure: NaiveDateTime) -> Self {
        self.departure = Some(departure);
        self
    }

    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

/// Searches for the cheapest route from `start` to `end`, departing now.
///
/// The returned route always begins at `start` and ends at `end`. An
/// infeasible cost is a regular result: it means no drivable route was
/// found, e.g. when the endpoints lie in different components.
///
/// # Errors
///
/// - [`RouteError::InsufficientStations`] when the catalog has fewer than
///   two stations
/// - [`RouteError::UnknownStation`] for names missing from the catalog
/// - [`RouteError::SameEndpoints`] when `start` and `end` name one station
/// - [`RouteError::InvalidConfig`] for an invalid `config` or EV parameter
///   set, or a network built from a different catalog
pub fn optimize_route(
    start: &str,
    end: &str,
    catalog: &StationCatalog,
    network: &RoadNetwork,
    model: &CostModel,
    config: &GaConfig,
) -> Result<OptimizedRoute> {
    optimize_route_with(
        start,
        end,
        catalog,
        network,
        model,
        config,
        OptimizeOptions::default(),
    )
}

/// [`optimize_route`] with an explicit departure time and cancellation.
pub fn optimize_route_with(
    start: &str,
    end: &str,
    catalog: &StationCatalog,
    network: &RoadNetwork,
    model: &CostModel,
    config: &GaConfig,
    options: OptimizeOptions,
) -> Result<OptimizedRoute> {
    let mut rng = create_rng(config.seed.unwrap_or_else(rand::random));
    optimize_route_with_rng(
        start, end, catalog, network, model, config, options, &mut rng,
    )
}

/// [`optimize_route_with`] drawing every random decision from `rng`.
///
/// `config.seed` is ignored.
#[allow(clippy::too_many_arguments)]
#[instrument(
    level = "debug",
    skip_all,
    fields(start = start, end = end, population = config.population_size, generations = config.max_generations)
)]
pub fn optimize_route_with_rng<R: Rng>(
    start: &str,
    end: &str,
    catalog: &StationCatalog,
    network: &RoadNetwork,
    model: &CostModel,
    config: &GaConfig,
    options: OptimizeOptions,
    rng: &mut R,
) -> Result<OptimizedRoute> {
    if catalog.len() < 2 {
        return Err(RouteError::InsufficientStations {
            count: catalog.len(),
        });
    }
    let from = catalog.resolve(start)?;
    let to = catalog.resolve(end)?;
    if from == to {
        return Err(RouteError::SameEndpoints {
            name: start.to_string(),
        });
    }
    if network.node_count() != catalog.len() {
        return Err(RouteError::InvalidConfig(
            "road network was not built from this catalog".into(),
        ));
    }
    config.validate().map_err(RouteError::InvalidConfig)?;
    model
        .params()
        .validate()
        .map_err(RouteError::InvalidConfig)?;

    let departure = options
        .departure
        .unwrap_or_else(|| chrono::Local::now().naive_local());
    let problem = RouteProblem::new(network, catalog, model, from, to, departure)
        .with_max_stops(config.max_intermediate_stops);

    let result = GaRunner::run_with_rng(&problem, config, rng, options.cancel);

    tracing::info!(
        cost = %result.best_fitness,
        stops = result.best.route.len(),
        generations = result.generations,
        "route optimization finished"
    );

    Ok(OptimizedRoute {
        route: result.best.route,
        cost: result.best_fitness,
        initial_best_cost: result.initial_best_fitness,
        final_population_cost: result.final_best_fitness,
        generations: result.generations,
        cancelled: result.cancelled,
        timed_out: result.timed_out,
        cost_history: result.fitness_history,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::EvParams;
    use crate::network::build_network;
    use crate::station::Station;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    const STEP: f64 = 10.0 / 111.194_926_644_558_74;

    fn t0() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2018, 3, 5)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn at_t0() -> OptimizeOptions {
        OptimizeOptions::default().with_departure(t0())
    }

    fn square() -> (StationCatalog, RoadNetwork) {
        let catalog = StationCatalog::new(vec![
            Station::new("A", 0.0, 0.0, 7.0, 0.3),
            Station::new("B", 0.0, STEP, 7.0, 0.3),
            Station::new("C", STEP, STEP, 7.0, 0.3),
            Station::new("D", STEP, 0.0, 7.0, 0.3),
        ])
        .unwrap();
        let network = build_network(&catalog, 20.0);
        (catalog, network)
    }

    /// 4x4 grid with 8 km spacing.
    fn grid() -> (StationCatalog, RoadNetwork) {
        let step = 0.8 * STEP;
        let stations = (0..16)
            .map(|i| {
                Station::new(
                    format!("G{i}"),
                    step * (i / 4) as f64,
                    step * (i % 4) as f64,
                    7.0,
                    0.3,
                )
            })
            .collect();
        let catalog = StationCatalog::new(stations).unwrap();
        let network = build_network(&catalog, 20.0);
        (catalog, network)
    }

    fn config(seed: u64) -> GaConfig {
        GaConfig::default().with_seed(seed).with_parallel(false)
    }

    fn cost_of(names: &[&str], catalog: &StationCatalog, network: &RoadNetwork) -> f64 {
        let route = Route::from_names(catalog, names).unwrap();
        CostModel::default()
            .evaluate(&route, network, catalog, t0())
            .value()
    }

    #[test]
    fn test_square_finds_direct_diagonal() {
        let (catalog, network) = square();
        let model = CostModel::default();

        let result =
            optimize_route_with("A", "C", &catalog, &network, &model, &config(42), at_t0())
                .unwrap();

        assert_eq!(result.route.names(&catalog), vec!["A", "C"]);
        let cost = result.cost.value();
        assert!(cost <= cost_of(&["A", "B", "C"], &catalog, &network));
        assert!(cost <= cost_of(&["A", "B", "D", "C"], &catalog, &network));
        // 14.14 km at 35 km/h plus 2.83 kWh of energy
        assert!((cost - (14.142 / 35.0 * 10.0 + 14.142 * 0.2 * 0.3)).abs() < 0.01);
    }

    #[test]
    fn test_best_not_worse_than_initial_population() {
        let (catalog, network) = grid();
        let model = CostModel::default();

        for seed in 0..5 {
            let result =
                optimize_route_with("G0", "G15", &catalog, &network, &model, &config(seed), at_t0())
                    .unwrap();
            assert!(result.cost <= result.initial_best_cost);
            assert!(result.cost <= result.final_population_cost);
            assert_eq!(result.cost_history.len(), result.generations + 1);
        }
    }

    #[test]
    fn test_disconnected_endpoints_are_infeasible() {
        let catalog = StationCatalog::new(vec![
            Station::new("A", 0.0, 0.0, 7.0, 0.3),
            Station::new("B", 0.0, 2.5 * STEP, 7.0, 0.3),
        ])
        .unwrap();
        let network = build_network(&catalog, 20.0);

        let result = optimize_route_with(
            "A",
            "B",
            &catalog,
            &network,
            &CostModel::default(),
            &config(1),
            at_t0(),
        )
        .unwrap();

        assert_eq!(result.cost, RouteCost::Infeasible);
        assert_eq!(result.route.names(&catalog), vec!["A", "B"]);
    }

    #[test]
    fn test_single_station_rejected() {
        let catalog = StationCatalog::new(vec![Station::new("A", 0.0, 0.0, 7.0, 0.3)]).unwrap();
        let network = build_network(&catalog, 20.0);
        assert_eq!(network.edge_count(), 0);

        let err = optimize_route(
            "A",
            "A",
            &catalog,
            &network,
            &CostModel::default(),
            &config(1),
        )
        .unwrap_err();
        assert_eq!(err, RouteError::InsufficientStations { count: 1 });
    }

    #[test]
    fn test_unknown_station() {
        let (catalog, network) = square();
        let err = optimize_route(
            "A",
            "Nowhere",
            &catalog,
            &network,
            &CostModel::default(),
            &config(1),
        )
        .unwrap_err();
        assert_eq!(
            err,
            RouteError::UnknownStation {
                name: "Nowhere".into()
            }
        );
    }

    #[test]
    fn test_unknown_start_station() {
        let (catalog, network) = square();
        let err = optimize_route(
            "Nowhere",
            "C",
            &catalog,
            &network,
            &CostModel::default(),
            &config(1),
        )
        .unwrap_err();
        assert_eq!(
            err,
            RouteError::UnknownStation {
                name: "Nowhere".into()
            }
        );
    }

    #[test]
    fn test_same_start_and_end_rejected() {
        let (catalog, network) = square();
        let model = CostModel::default();

        for seed in 0..20 {
            let err =
                optimize_route_with("A", "A", &catalog, &network, &model, &config(seed), at_t0())
                    .unwrap_err();
            assert_eq!(err, RouteError::SameEndpoints { name: "A".into() });
        }
    }

    #[test]
    fn test_invalid_config() {
        let (catalog, network) = square();
        let bad_ga = config(1).with_population_size(0);
        assert!(matches!(
            optimize_route("A", "C", &catalog, &network, &CostModel::default(), &bad_ga),
            Err(RouteError::InvalidConfig(_))
        ));

        let bad_ev = CostModel::new(EvParams::default().with_max_range_km(-1.0));
        assert!(matches!(
            optimize_route("A", "C", &catalog, &network, &bad_ev, &config(1)),
            Err(RouteError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_cancelled_before_first_generation() {
        let (catalog, network) = grid();
        let options = at_t0().with_cancel(Arc::new(AtomicBool::new(true)));

        let result = optimize_route_with(
            "G0",
            "G15",
            &catalog,
            &network,
            &CostModel::default(),
            &config(3),
            options,
        )
        .unwrap();

        assert!(result.cancelled);
        assert_eq!(result.generations, 0);
        assert_eq!(result.cost, result.initial_best_cost);
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let (catalog, network) = grid();
        let model = CostModel::default();
        let run = |parallel: bool| {
            let config = config(9).with_parallel(parallel);
            optimize_route_with("G0", "G15", &catalog, &network, &model, &config, at_t0())
                .unwrap()
        };

        let a = run(false);
        let b = run(true);
        assert_eq!(a.route, b.route);
        assert_eq!(a.cost_history, b.cost_history);
    }

    #[test]
    fn test_initial_routes_respect_stop_cap() {
        let (catalog, network) = grid();
        let model = CostModel::default();
        let problem = RouteProblem::new(&network, &catalog, &model, 0, 15, t0()).with_max_stops(3);
        let mut rng = create_rng(5);

        for _ in 0..200 {
            let candidate = problem.create_individual(&mut rng);
            let route = candidate.route();
            assert!((3..=5).contains(&route.len()), "{route:?}");
            assert_eq!(route.first(), Some(0));
            assert_eq!(route.last(), Some(15));
            assert!(route.is_simple());
            assert!(!candidate.is_evaluated());
        }
    }

    #[test]
    fn test_empty_pool_degrades_to_direct_route() {
        let catalog = StationCatalog::new(vec![
            Station::new("A", 0.0, 0.0, 7.0, 0.3),
            Station::new("B", 0.0, STEP, 7.0, 0.3),
        ])
        .unwrap();
        let network = build_network(&catalog, 20.0);
        let model = CostModel::default();
        let problem = RouteProblem::new(&network, &catalog, &model, 0, 1, t0());
        let mut rng = create_rng(5);

        assert!(problem.intermediates().is_empty());
        let mut candidate = problem.create_individual(&mut rng);
        assert_eq!(candidate.route().stops(), &[0, 1]);
        problem.mutate(&mut candidate, &mut rng);
        assert_eq!(candidate.route().stops(), &[0, 1]);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_endpoints_preserved(
            start in 0usize..16,
            end in 0usize..16,
            seed in any::<u64>(),
        ) {
            prop_assume!(start != end);
            let (catalog, network) = grid();
            let config = GaConfig::default()
                .with_population_size(20)
                .with_max_generations(10)
                .with_seed(seed)
                .with_parallel(false);
            let result = optimize_route_with(
                catalog.name(start),
                catalog.name(end),
                &catalog,
                &network,
                &CostModel::default(),
                &config,
                at_t0(),
            )
            .unwrap();

            prop_assert_eq!(result.route.first(), Some(start));
            prop_assert_eq!(result.route.last(), Some(end));
            prop_assert!(result.route.is_simple());
        }
    }
}
