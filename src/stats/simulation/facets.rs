use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use itertools::Itertools;
use regex::Regex;
use rocket_okapi::okapi::schemars::{self, JsonSchema};
use serde::{Deserialize, Serialize};

use super::normalize::{normalized_par, normalized_score};
use crate::model::{Course, CourseType, Profile, Round};
use crate::stats::environment::WindBand;
use crate::util::mean;

/// How much better than overall a venue average has to be to count as a speciality.
pub const SPECIALIST_MARGIN: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Calm,
    Windy,
    Rainy,
}

fn rain_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)rain|drizzle|shower|storm").expect("rain pattern"))
}

fn wind_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)wind|gale|gust").expect("wind pattern"))
}

impl Condition {
    /// Rain wins over wind; a round with neither is calm.
    pub fn of(round: &Round) -> Self {
        let weather = round.weather_text().unwrap_or_default();
        let windy_speed = round
            .wind_speed_kph
            .is_some_and(|kph| WindBand::from_kph(kph) >= WindBand::Windy);
        if rain_pattern().is_match(weather) {
            Self::Rainy
        } else if windy_speed || wind_pattern().is_match(weather) {
            Self::Windy
        } else {
            Self::Calm
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum VenueType {
    Links,
    Parkland,
    Heath,
    Cliffside,
}

const VENUE_KEYWORDS: [(&str, VenueType); 4] = [
    ("cliff", VenueType::Cliffside),
    ("links", VenueType::Links),
    ("heath", VenueType::Heath),
    ("park", VenueType::Parkland),
];

impl VenueType {
    /// Course type first, then keywords in the course name and location.
    pub fn of(course: &Course) -> Option<Self> {
        match course.course_type {
            Some(CourseType::Links) => return Some(Self::Links),
            Some(CourseType::Parkland) => return Some(Self::Parkland),
            Some(CourseType::Heathland) => return Some(Self::Heath),
            _ => {}
        }
        let text = format!(
            "{} {}",
            course.name,
            course.location.as_deref().unwrap_or_default()
        )
        .to_lowercase();
        VENUE_KEYWORDS
            .iter()
            .find(|(keyword, _)| text.contains(keyword))
            .map(|(_, venue)| *venue)
    }
}

/// `Some(true)` for a home round. The player's home club decides when it is
/// known, otherwise the round's own flag.
pub fn is_home_round(round: &Round, course: Option<&Course>, home_club: Option<&str>) -> Option<bool> {
    match (home_club, course) {
        (Some(club), Some(course)) => Some(
            course
                .name
                .trim()
                .to_lowercase()
                .starts_with(&club.to_lowercase()),
        ),
        _ => round.is_home,
    }
}

/// A player's normalised averages split along every facet the team
/// simulation looks at. Facets without rounds are absent.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayerFacets {
    pub player_id: String,
    pub name: String,
    pub rounds: usize,
    pub overall: Option<f64>,
    pub average_par: Option<f64>,
    pub by_condition: BTreeMap<Condition, f64>,
    pub by_venue: BTreeMap<VenueType, f64>,
    pub home: Option<f64>,
    pub away: Option<f64>,
}

impl PlayerFacets {
    pub fn build(profile: &Profile, rounds: &[Round], courses: &HashMap<&str, &Course>) -> Self {
        let scored = rounds
            .iter()
            .filter(|round| round.user_id == profile.id)
            .filter_map(|round| {
                let course = courses.get(round.course_id.as_str()).copied();
                normalized_score(round).map(|score| (round, course, score))
            })
            .collect_vec();

        let by_condition = scored
            .iter()
            .map(|(round, _, score)| (Condition::of(round), *score))
            .into_group_map();
        let by_venue = scored
            .iter()
            .filter_map(|(_, course, score)| course.and_then(VenueType::of).map(|venue| (venue, *score)))
            .into_group_map();
        let home_away = scored
            .iter()
            .filter_map(|(round, course, score)| {
                is_home_round(round, *course, profile.home_club()).map(|home| (home, *score))
            })
            .into_group_map();

        Self {
            player_id: profile.id.clone(),
            name: profile.display_name().to_owned(),
            rounds: scored.len(),
            overall: mean(scored.iter().map(|(_, _, score)| *score)),
            average_par: mean(scored.iter().filter_map(|(round, _, _)| normalized_par(round))),
            by_condition: averages(by_condition),
            by_venue: averages(by_venue),
            home: home_away.get(&true).and_then(|scores| mean(scores.iter().copied())),
            away: home_away.get(&false).and_then(|scores| mean(scores.iter().copied())),
        }
    }

    pub fn condition(&self, condition: Condition) -> Option<f64> {
        self.by_condition.get(&condition).copied()
    }

    pub fn venue(&self, venue: VenueType) -> Option<f64> {
        self.by_venue.get(&venue).copied()
    }

    pub fn is_venue_specialist(&self, venue: VenueType) -> bool {
        match (self.venue(venue), self.overall) {
            (Some(venue), Some(overall)) => venue <= overall - SPECIALIST_MARGIN,
            _ => false,
        }
    }

    pub fn specialties(&self) -> Vec<VenueType> {
        self.by_venue
            .keys()
            .copied()
            .filter(|venue| self.is_venue_specialist(*venue))
            .collect_vec()
    }
}

fn averages<K: Ord>(groups: HashMap<K, Vec<f64>>) -> BTreeMap<K, f64> {
    groups
        .into_iter()
        .filter_map(|(key, scores)| mean(scores).map(|average| (key, average)))
        .collect()
}

pub fn index_courses(courses: &[Course]) -> HashMap<&str, &Course> {
    courses.iter().map(|course| (course.id.as_str(), course)).collect()
}
