use std::iter;

use rocket_okapi::okapi::schemars::{self, JsonSchema};
use serde::{Deserialize, Serialize};

use super::facets::{Condition, PlayerFacets, VenueType};

/// One way of picking a projected score out of a player's facets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", tag = "strategy", content = "value")]
pub enum Strategy {
    Venue(VenueType),
    Condition(Condition),
    Overall,
}

impl Strategy {
    pub fn average(self, facets: &PlayerFacets) -> Option<f64> {
        match self {
            Self::Venue(venue) => facets.venue(venue),
            Self::Condition(condition) => facets.condition(condition),
            Self::Overall => facets.overall,
        }
    }
}

/// Ordered strategies, tried until one yields a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackChain(Vec<Strategy>);

impl FallbackChain {
    pub fn new(strategies: Vec<Strategy>) -> Self {
        Self(strategies)
    }

    /// Selected venue, then selected condition, then overall.
    pub fn for_selection(venue: Option<VenueType>, condition: Option<Condition>) -> Self {
        Self(
            venue
                .map(Strategy::Venue)
                .into_iter()
                .chain(condition.map(Strategy::Condition))
                .chain(iter::once(Strategy::Overall))
                .collect(),
        )
    }

    pub fn strategies(&self) -> &[Strategy] {
        &self.0
    }

    pub fn resolve(&self, facets: &PlayerFacets) -> Option<(Strategy, f64)> {
        self.0
            .iter()
            .find_map(|strategy| strategy.average(facets).map(|average| (*strategy, average)))
    }
}
