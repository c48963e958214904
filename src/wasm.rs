//! WebAssembly bindings.
//!
//! Values cross the boundary as plain JS objects through
//! `serde-wasm-bindgen`.

use crate::cost::{CostModel, EvParams};
use crate::ga::GaConfig;
use crate::network::{build_network, DEFAULT_PROXIMITY_KM};
use crate::planner::{optimize_route_with, OptimizeOptions};
use crate::station::{Station, StationCatalog};
use chrono::NaiveDateTime;
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
struct PlannedRoute {
    stops: Vec<String>,
    /// `null` when no drivable route was found.
    cost: Option<f64>,
    generations: usize,
}

/// Plans a route over `stations` (an array of station objects).
///
/// `departure` is an ISO-8601 local timestamp such as
/// `"2018-03-05T09:30:00"`. `config` and `ev` may be `undefined` to use
/// the defaults.
#[wasm_bindgen(js_name = planRoute)]
pub fn plan_route(
    stations: JsValue,
    start: &str,
    end: &str,
    departure: &str,
    config: JsValue,
    ev: JsValue,
) -> Result<JsValue, JsError> {
    let stations: Vec<Station> = serde_wasm_bindgen::from_value(stations)?;
    let config: GaConfig = serde_wasm_bindgen::from_value::<Option<GaConfig>>(config)?
        .unwrap_or_default()
        .with_parallel(false);
    let ev: EvParams = serde_wasm_bindgen::from_value::<Option<EvParams>>(ev)?.unwrap_or_default();
    let departure: NaiveDateTime = departure.parse()?;

    let catalog = StationCatalog::new(stations)?;
    let network = build_network(&catalog, DEFAULT_PROXIMITY_KM);
    let model = CostModel::new(ev);
    let result = optimize_route_with(
        start,
        end,
        &catalog,
        &network,
        &model,
        &config,
        OptimizeOptions::default().with_departure(departure),
    )?;

    let planned = PlannedRoute {
        stops: result
            .route
            .names(&catalog)
            .into_iter()
            .map(str::to_owned)
            .collect(),
        cost: result.cost.feasible(),
        generations: result.generations,
    };
    Ok(serde_wasm_bindgen::to_value(&planned)?)
}
