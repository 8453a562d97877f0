//! Flat report rows for admins, and their CSV rendering.

mod csv;

use std::collections::HashMap;

use chrono::{Datelike, Days, NaiveDate};
use itertools::Itertools;
use rocket_okapi::okapi::schemars::{self, JsonSchema};
use serde::{Deserialize, Serialize};

pub use self::csv::{report_filename, to_csv, CSV_HEADER};
use crate::model::{Course, Profile, Round};

pub const MAX_RANGE_DAYS: i64 = 60;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error("Date range of {days} days is longer than the allowed {max}")]
    RangeTooLong { days: i64, max: i64 },
    #[error("Date range starts ({from}) after it ends ({to})")]
    ReversedRange { from: NaiveDate, to: NaiveDate },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportFilter {
    /// Inclusive.
    pub from: Option<NaiveDate>,
    /// Inclusive.
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub squad_member_ids: Option<Vec<String>>,
    /// Compared case-insensitively with the round's weather.
    pub weather: Option<String>,
}

impl ReportFilter {
    /// The inclusive range the report covers. A missing end lies `max_days`
    /// from the given one; with neither, the range ends on `today`.
    pub fn validate(&self, today: NaiveDate, max_days: i64) -> Result<(NaiveDate, NaiveDate), ReportError> {
        let span = Days::new(u64::try_from(max_days).unwrap_or_default());
        let (from, to) = match (self.from, self.to) {
            (Some(from), Some(to)) => (from, to),
            (Some(from), None) => (from, from.checked_add_days(span).unwrap_or(NaiveDate::MAX)),
            (None, Some(to)) => (to.checked_sub_days(span).unwrap_or(NaiveDate::MIN), to),
            (None, None) => (today.checked_sub_days(span).unwrap_or(NaiveDate::MIN), today),
        };
        if from > to {
            return Err(ReportError::ReversedRange { from, to });
        }
        let days = i64::from(to.num_days_from_ce()) - i64::from(from.num_days_from_ce());
        if days > max_days {
            return Err(ReportError::RangeTooLong { days, max: max_days });
        }
        Ok((from, to))
    }

    fn matches(&self, (from, to): (NaiveDate, NaiveDate), round: &Round) -> bool {
        let in_range = (from..=to).contains(&round.date_of_round);
        let in_squad = self
            .squad_member_ids
            .as_ref()
            .map_or(true, |members| members.contains(&round.user_id));
        let weather_matches = self
            .weather
            .as_deref()
            .map(str::trim)
            .filter(|weather| !weather.is_empty())
            .map_or(true, |wanted| {
                round
                    .weather_text()
                    .is_some_and(|weather| weather.to_lowercase() == wanted.to_lowercase())
            });
        in_range && in_squad && weather_matches
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub player_name: String,
    pub date: Option<NaiveDate>,
    pub course: Option<String>,
    pub score: Option<i32>,
    pub par: Option<i32>,
    pub weather: Option<String>,
    pub wind_kph: Option<f64>,
    pub temp_c: Option<f64>,
}

/// Rounds matching `filter`, newest first; rounds on the same day keep their
/// input order. `today` anchors a filter without dates.
pub fn build_rows(
    filter: &ReportFilter,
    today: NaiveDate,
    max_days: i64,
    rounds: &[Round],
    profiles: &[Profile],
    courses: &[Course],
) -> Result<Vec<ReportRow>, ReportError> {
    let range = filter.validate(today, max_days)?;
    let profiles: HashMap<&str, &Profile> = profiles.iter().map(|profile| (profile.id.as_str(), profile)).collect();
    let courses: HashMap<&str, &Course> = courses.iter().map(|course| (course.id.as_str(), course)).collect();

    let mut rows = rounds
        .iter()
        .filter(|round| filter.matches(range, round))
        .map(|round| {
            let course = courses.get(round.course_id.as_str());
            ReportRow {
                player_name: profiles
                    .get(round.user_id.as_str())
                    .map_or(Profile::UNKNOWN_NAME, |profile| profile.display_name())
                    .to_owned(),
                date: Some(round.date_of_round),
                course: course.map(|course| course.name.clone()),
                score: round.valid_strokes(),
                par: round.total_par.or_else(|| course.and_then(|course| course.par)),
                weather: round.weather_text().map(str::to_owned),
                wind_kph: round.wind_speed_kph,
                temp_c: round.temp_c,
            }
        })
        .collect_vec();
    rows.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(rows)
}
