//! Charging-station records.
//!
//! - [`Station`]: one charging location with its averaged attributes
//! - [`StationCatalog`]: the read-only, name-indexed station table
//! - [`ChargingSession`]: a raw session record, folded into a catalog with
//!   [`StationCatalog::from_sessions`]

mod sessions;
mod types;

pub use sessions::{parse_duration_hours, ChargingSession};
pub use types::{Station, StationCatalog};
