//! The route value type.

use crate::error::Result;
use crate::station::StationCatalog;

/// Ordered sequence of station ids.
///
/// A planned route runs from the requested start to the requested end and
/// visits each station at most once. Routes are plain values: every
/// candidate in a population owns its own sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    stops: Vec<usize>,
}

impl Route {
    pub fn new(stops: Vec<usize>) -> Self {
        Self { stops }
    }

    /// Builds a route from station names.
    pub fn from_names(catalog: &StationCatalog, names: &[&str]) -> Result<Self> {
        let stops = names
            .iter()
            .map(|name| catalog.resolve(name))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { stops })
    }

    pub fn stops(&self) -> &[usize] {
        &self.stops
    }

    pub fn into_stops(self) -> Vec<usize> {
        self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn first(&self) -> Option<usize> {
        self.stops.first().copied()
    }

    pub fn last(&self) -> Option<usize> {
        self.stops.last().copied()
    }

    /// Whether no station appears twice.
    pub fn is_simple(&self) -> bool {
        let mut seen = std::collections::HashSet::with_capacity(self.stops.len());
        self.stops.iter().all(|s| seen.insert(*s))
    }

    /// Station names along the route.
    pub fn names<'c>(&self, catalog: &'c StationCatalog) -> Vec<&'c str> {
        self.stops.iter().map(|&id| catalog.name(id)).collect()
    }
}

impl From<Vec<usize>> for Route {
    fn from(stops: Vec<usize>) -> Self {
        Self::new(stops)
    }
}
