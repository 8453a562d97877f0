use std::collections::{BTreeMap, HashMap};

use itertools::Itertools;
use rocket_okapi::okapi::schemars::{self, JsonSchema};
use serde::Serialize;

use crate::model::{Course, CourseType, Round};
use crate::util::{mean, round_to};

pub const OTHER_COURSE_TYPE: &str = "Other";
pub const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, JsonSchema)]
pub enum WindBand {
    Calm,
    Breezy,
    Windy,
    Strong,
}

impl WindBand {
    pub fn from_kph(kph: f64) -> Self {
        match kph {
            kph if kph < 10.0 => Self::Calm,
            kph if kph < 20.0 => Self::Breezy,
            kph if kph < 30.0 => Self::Windy,
            _ => Self::Strong,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Calm => "Calm",
            Self::Breezy => "Breezy",
            Self::Windy => "Windy",
            Self::Strong => "Strong",
        }
    }

    pub const fn to_colour(self) -> &'static str {
        match self {
            Self::Calm => "#A6F8BB",
            Self::Breezy => "#7FB7BE",
            Self::Windy => "#4F7CAC",
            Self::Strong => "#3F334D",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownEntry {
    pub label: String,
    pub avg_score: f64,
    pub round_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalBreakdown {
    pub by_course_type: Vec<BreakdownEntry>,
    pub by_weather: Vec<BreakdownEntry>,
    pub by_wind: Vec<BreakdownEntry>,
    pub by_home_away: Vec<BreakdownEntry>,
}

/// Capitalised weather text so "sunny" and "Sunny " share a bucket.
pub fn weather_label(round: &Round) -> String {
    match round.weather_text() {
        Some(weather) => {
            let mut chars = weather.chars();
            chars
                .next()
                .map(|first| first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect())
                .unwrap_or_else(|| UNKNOWN.to_owned())
        }
        None => UNKNOWN.to_owned(),
    }
}

/// Groups valid rounds along each dimension independently. Every valid
/// round lands in exactly one bucket per dimension; uncategorised rounds go
/// to "Other"/"Unknown". Each list is sorted best (lowest) average first.
pub fn environmental_breakdown(rounds: &[Round], courses: &[Course]) -> EnvironmentalBreakdown {
    let course_types: HashMap<&str, Option<CourseType>> = courses
        .iter()
        .map(|course| (course.id.as_str(), course.course_type))
        .collect();
    let valid = rounds
        .iter()
        .filter_map(|round| round.valid_strokes().map(|strokes| (round, strokes)))
        .collect_vec();

    EnvironmentalBreakdown {
        by_course_type: breakdown(&valid, |round| {
            match course_types.get(round.course_id.as_str()).copied().flatten() {
                Some(course_type) => (
                    course_type.label().to_owned(),
                    Some(course_type.to_colour()),
                ),
                None => (OTHER_COURSE_TYPE.to_owned(), None),
            }
        }),
        by_weather: breakdown(&valid, |round| (weather_label(round), None)),
        by_wind: breakdown(&valid, |round| match round.wind_speed_kph {
            Some(kph) => {
                let band = WindBand::from_kph(kph);
                (band.label().to_owned(), Some(band.to_colour()))
            }
            None => (UNKNOWN.to_owned(), None),
        }),
        by_home_away: breakdown(&valid, |round| {
            let label = match round.is_home {
                Some(true) => "Home",
                Some(false) => "Away",
                None => UNKNOWN,
            };
            (label.to_owned(), None)
        }),
    }
}

fn breakdown<F>(rounds: &[(&Round, i32)], categorise: F) -> Vec<BreakdownEntry>
where
    F: Fn(&Round) -> (String, Option<&'static str>),
{
    let mut groups: BTreeMap<String, (Option<&'static str>, Vec<f64>)> = BTreeMap::new();
    for (round, strokes) in rounds {
        let (label, colour) = categorise(round);
        groups
            .entry(label)
            .or_insert_with(|| (colour, vec![]))
            .1
            .push(f64::from(*strokes));
    }

    groups
        .into_iter()
        .filter_map(|(label, (colour, scores))| {
            let average = mean(scores.iter().copied())?;
            Some((average, label, colour, scores.len()))
        })
        .sorted_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(average, label, colour, round_count)| BreakdownEntry {
            label,
            avg_score: round_to(average, 1),
            round_count,
            color: colour.map(str::to_owned),
        })
        .collect_vec()
}
