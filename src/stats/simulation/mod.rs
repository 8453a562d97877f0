//! Projects how a small team would score at a given venue and in given
//! conditions, using each player's history scaled to eighteen holes.

mod facets;
mod fallback;
mod normalize;

use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use log::debug;
use rocket_okapi::okapi::schemars::{self, gen::SchemaGenerator, schema::Schema, JsonSchema};
use serde::{Deserialize, Serialize};

pub use facets::{index_courses, is_home_round, Condition, PlayerFacets, VenueType, SPECIALIST_MARGIN};
pub use fallback::{FallbackChain, Strategy};
pub use normalize::{normalized_par, normalized_score, EIGHTEEN_HOLE_PAR, NINE_HOLE_PAR};

use crate::model::{Course, Profile, Round};
use crate::util::{mean, round_to};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    #[error("Unsupported match format: \"{0}\"")]
    UnsupportedFormat(String),
    #[error("Expected {expected} players, got {found}")]
    TeamSize { expected: usize, found: usize },
    #[error("Player {0} was selected twice")]
    DuplicatePlayer(String),
    #[error("Player {0} not found")]
    PlayerNotFound(String),
    #[error("Player {0} is not in the selected squad")]
    NotInSquad(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum MatchLocation {
    Home,
    Away,
}

impl MatchLocation {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Away => "away",
        }
    }
}

/// Team size and venue side, written as `"3-home"` or `"2-away"`. The side
/// is carried through to the output as a label; projections only depend on
/// the selected venue type and condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MatchFormat {
    pub team_size: usize,
    pub location: MatchLocation,
}

impl MatchFormat {
    pub const TEAM_SIZES: [usize; 2] = [2, 3];

    pub fn new(team_size: usize, location: MatchLocation) -> Result<Self, SimulationError> {
        if Self::TEAM_SIZES.contains(&team_size) {
            Ok(Self {
                team_size,
                location,
            })
        } else {
            Err(SimulationError::UnsupportedFormat(format!(
                "{team_size}-{}",
                location.label()
            )))
        }
    }
}

impl FromStr for MatchFormat {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unsupported = || SimulationError::UnsupportedFormat(s.to_owned());
        let (size, location) = s.trim().split_once('-').ok_or_else(unsupported)?;
        let team_size = size.trim().parse::<usize>().map_err(|_| unsupported())?;
        let location = match location.trim().to_lowercase().as_str() {
            "home" => MatchLocation::Home,
            "away" => MatchLocation::Away,
            _ => return Err(unsupported()),
        };
        Self::new(team_size, location).map_err(|_| unsupported())
    }
}

impl fmt::Display for MatchFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.team_size, self.location.label())
    }
}

impl TryFrom<String> for MatchFormat {
    type Error = SimulationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MatchFormat> for String {
    fn from(value: MatchFormat) -> Self {
        value.to_string()
    }
}

impl JsonSchema for MatchFormat {
    fn schema_name() -> String {
        "MatchFormat".to_owned()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        String::json_schema(gen)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub format: MatchFormat,
    pub player_ids: Vec<String>,
    /// Members of the squad the team is picked from, if any.
    #[serde(default)]
    pub squad_member_ids: Option<Vec<String>>,
    pub venue: Option<VenueType>,
    pub condition: Option<Condition>,
}

impl Selection {
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.player_ids.len() != self.format.team_size {
            return Err(SimulationError::TeamSize {
                expected: self.format.team_size,
                found: self.player_ids.len(),
            });
        }
        if let Some(duplicate) = self.player_ids.iter().duplicates().next() {
            return Err(SimulationError::DuplicatePlayer(duplicate.clone()));
        }
        if let Some(members) = &self.squad_member_ids {
            if let Some(outsider) = self.player_ids.iter().find(|id| !members.contains(id)) {
                return Err(SimulationError::NotInSquad(outsider.clone()));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProjection {
    pub player_id: String,
    pub name: String,
    pub projected: Option<f64>,
    /// Which strategy produced `projected`.
    pub source: Option<Strategy>,
    pub venue_specialist: bool,
    pub specialties: Vec<VenueType>,
    pub facets: PlayerFacets,
}

impl PlayerProjection {
    fn new(facets: PlayerFacets, resolved: Option<(Strategy, f64)>, venue: Option<VenueType>) -> Self {
        Self {
            player_id: facets.player_id.clone(),
            name: facets.name.clone(),
            projected: resolved.map(|(_, value)| round_to(value, 1)),
            source: resolved.map(|(strategy, _)| strategy),
            venue_specialist: venue.is_some_and(|venue| facets.is_venue_specialist(venue)),
            specialties: facets.specialties(),
            facets,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Specialist {
    pub player_id: String,
    pub name: String,
    pub average: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    pub wind_specialist: Option<Specialist>,
    pub course_specialist: Option<Specialist>,
    pub home_specialist: Option<Specialist>,
    pub road_specialist: Option<Specialist>,
}

impl Insights {
    fn new(players: &[PlayerFacets], venue: Option<VenueType>) -> Self {
        Self {
            wind_specialist: specialist(players, |facets| facets.condition(Condition::Windy)),
            course_specialist: venue.and_then(|venue| specialist(players, |facets| facets.venue(venue))),
            home_specialist: specialist(players, |facets| facets.home),
            road_specialist: specialist(players, |facets| facets.away),
        }
    }
}

/// Lowest average among the players who have one; the first wins ties.
fn specialist<F>(players: &[PlayerFacets], average: F) -> Option<Specialist>
where
    F: Fn(&PlayerFacets) -> Option<f64>,
{
    players
        .iter()
        .filter_map(|facets| average(facets).map(|value| (facets, value)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(facets, value)| Specialist {
            player_id: facets.player_id.clone(),
            name: facets.name.clone(),
            average: round_to(value, 1),
        })
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamProjection {
    pub format: MatchFormat,
    pub venue: Option<VenueType>,
    pub condition: Option<Condition>,
    pub players: Vec<PlayerProjection>,
    /// Sum of the players' projections, `None` when any player has none.
    pub projected_score: Option<f64>,
    pub team_avg_score: Option<f64>,
    pub team_avg_par: Option<f64>,
    /// 0 to 100, 50 being a team that plays to par.
    pub strength: Option<f64>,
    pub insights: Insights,
}

pub fn team_strength(team_avg_score: f64, team_avg_par: f64) -> f64 {
    (50.0 - 5.0 * (team_avg_score - team_avg_par)).clamp(0.0, 100.0)
}

fn find_profile<'a>(profiles: &'a [Profile], id: &str) -> Result<&'a Profile, SimulationError> {
    profiles
        .iter()
        .find(|profile| profile.id == id)
        .ok_or_else(|| SimulationError::PlayerNotFound(id.to_owned()))
}

pub fn project_team(
    selection: &Selection,
    profiles: &[Profile],
    rounds: &[Round],
    courses: &[Course],
) -> Result<TeamProjection, SimulationError> {
    selection.validate()?;
    let course_index = index_courses(courses);
    let facets = selection
        .player_ids
        .iter()
        .map(|id| Ok::<_, SimulationError>(PlayerFacets::build(find_profile(profiles, id)?, rounds, &course_index)))
        .collect::<Result<Vec<_>, _>>()?;

    let chain = FallbackChain::for_selection(selection.venue, selection.condition);
    let resolved = facets.iter().map(|player| chain.resolve(player)).collect_vec();
    let projected_score = resolved
        .iter()
        .map(|resolved| resolved.map(|(_, value)| value))
        .sum::<Option<f64>>();
    let team_size = facets.len() as f64;
    let team_avg_score = projected_score.map(|total| total / team_size);
    let team_avg_par = projected_score.and_then(|_| {
        facets
            .iter()
            .map(|player| player.average_par)
            .collect::<Option<Vec<_>>>()
            .and_then(mean)
    });
    let strength = team_avg_score
        .zip(team_avg_par)
        .map(|(score, par)| round_to(team_strength(score, par), 1));
    debug!(
        "Projected {} for {} ({:?} / {:?})",
        projected_score.map_or("nothing".to_owned(), |score| score.to_string()),
        selection.format,
        selection.venue,
        selection.condition
    );

    let insights = Insights::new(&facets, selection.venue);
    let players = facets
        .into_iter()
        .zip(resolved)
        .map(|(player, resolved)| PlayerProjection::new(player, resolved, selection.venue))
        .collect_vec();

    Ok(TeamProjection {
        format: selection.format,
        venue: selection.venue,
        condition: selection.condition,
        players,
        projected_score: projected_score.map(|score| round_to(score, 1)),
        team_avg_score: team_avg_score.map(|score| round_to(score, 1)),
        team_avg_par: team_avg_par.map(|par| round_to(par, 1)),
        strength,
        insights,
    })
}

/// The format's team size of candidates with the lowest projections. Players
/// without any projection are never suggested; ties keep candidate order.
pub fn suggest_lineup(
    format: MatchFormat,
    candidate_ids: &[String],
    venue: Option<VenueType>,
    condition: Option<Condition>,
    profiles: &[Profile],
    rounds: &[Round],
    courses: &[Course],
) -> Result<Vec<PlayerProjection>, SimulationError> {
    let course_index = index_courses(courses);
    let chain = FallbackChain::for_selection(venue, condition);
    let mut projected = candidate_ids
        .iter()
        .unique()
        .map(|id| {
            let facets = PlayerFacets::build(find_profile(profiles, id)?, rounds, &course_index);
            let resolved = chain.resolve(&facets);
            Ok::<_, SimulationError>((resolved, facets))
        })
        .filter_ok(|(resolved, _)| resolved.is_some())
        .collect::<Result<Vec<_>, _>>()?;
    projected.sort_by(|a, b| {
        let value = |resolved: &Option<(Strategy, f64)>| resolved.map_or(f64::INFINITY, |(_, value)| value);
        value(&a.0).total_cmp(&value(&b.0))
    });
    Ok(projected
        .into_iter()
        .take(format.team_size)
        .map(|(resolved, facets)| PlayerProjection::new(facets, resolved, venue))
        .collect_vec())
}
