use std::collections::HashMap;

use chrono::NaiveDate;
use itertools::Itertools;
use rocket_okapi::okapi::schemars::{self, JsonSchema};
use serde::Serialize;

use crate::model::{Course, Round};
use crate::util::{mean, round_to};

pub const STANDARD_SLOPE: f64 = 113.0;
pub const MAX_HANDICAP_INDEX: f64 = 54.0;
/// Only the most recent differentials count towards the index.
pub const DIFFERENTIAL_WINDOW: usize = 20;

/// `(113 / slope) × (strokes − rating)` for a complete eighteen-hole round.
pub fn score_differential(round: &Round, course: &Course) -> Option<f64> {
    if round.is_nine_holes() {
        return None;
    }
    let strokes = round.valid_strokes()?;
    let rating = course.rating?;
    let slope = course.slope.filter(|slope| *slope > 0)?;
    Some(round_to(
        STANDARD_SLOPE / f64::from(slope) * (f64::from(strokes) - rating),
        1,
    ))
}

/// How many of the lowest differentials count, and the adjustment applied,
/// for a record of `count` differentials.
const fn lowest_used(count: usize) -> Option<(usize, f64)> {
    match count {
        0..=2 => None,
        3 => Some((1, -2.0)),
        4 => Some((1, -1.0)),
        5 => Some((1, 0.0)),
        6 => Some((2, -1.0)),
        7 | 8 => Some((2, 0.0)),
        9..=11 => Some((3, 0.0)),
        12..=14 => Some((4, 0.0)),
        15 | 16 => Some((5, 0.0)),
        17 | 18 => Some((6, 0.0)),
        19 => Some((7, 0.0)),
        _ => Some((8, 0.0)),
    }
}

/// Handicap index from differentials ordered most recent first.
pub fn handicap_index(differentials: &[f64]) -> Option<f64> {
    let recent = &differentials[..differentials.len().min(DIFFERENTIAL_WINDOW)];
    let (used, adjustment) = lowest_used(recent.len())?;
    let average = mean(
        recent
            .iter()
            .copied()
            .sorted_by(f64::total_cmp)
            .take(used),
    )?;
    Some(round_to(average + adjustment, 1).min(MAX_HANDICAP_INDEX))
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoundDifferential {
    pub round_id: String,
    pub date: NaiveDate,
    pub differential: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HandicapRecord {
    pub player_id: String,
    /// Most recent first.
    pub differentials: Vec<RoundDifferential>,
    pub handicap_index: Option<f64>,
}

pub fn handicap_record(player_id: &str, rounds: &[Round], courses: &[Course]) -> HandicapRecord {
    let courses: HashMap<&str, &Course> = courses.iter().map(|course| (course.id.as_str(), course)).collect();
    let differentials = rounds
        .iter()
        .filter(|round| round.user_id == player_id)
        .filter_map(|round| {
            let course = courses.get(round.course_id.as_str())?;
            Some(RoundDifferential {
                round_id: round.id.clone(),
                date: round.date_of_round,
                differential: score_differential(round, course)?,
            })
        })
        .sorted_by(|a, b| b.date.cmp(&a.date))
        .collect_vec();
    let handicap_index = handicap_index(&differentials.iter().map(|d| d.differential).collect_vec());
    HandicapRecord {
        player_id: player_id.to_owned(),
        differentials,
        handicap_index,
    }
}
