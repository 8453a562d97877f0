use std::cmp::Reverse;
use std::collections::HashMap;

use chrono::{Days, NaiveDate};
use itertools::Itertools;
use rocket_okapi::okapi::schemars::{self, JsonSchema};
use serde::Serialize;

use crate::model::{Course, Profile, Round};
use crate::util::{fix_score, mean, round_to};

pub const DIGEST_DAYS: u64 = 7;
pub const UNKNOWN_COURSE: &str = "Unknown Course";

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BestRound {
    pub player_id: String,
    pub name: String,
    pub course: String,
    pub score: i32,
    /// Relative to par as a scorecard prints it, e.g. `+3`.
    pub to_par: Option<String>,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayerWeek {
    pub player_id: String,
    pub name: String,
    pub rounds: usize,
    pub best_score: Option<i32>,
    pub avg_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyDigest {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub rounds_played: usize,
    pub active_players: usize,
    pub club_average: Option<f64>,
    pub best_round: Option<BestRound>,
    pub most_active: Option<PlayerWeek>,
    /// Best score first.
    pub players: Vec<PlayerWeek>,
}

/// Summary of the seven days ending on, and including, `week_end`.
pub fn weekly_digest(week_end: NaiveDate, profiles: &[Profile], rounds: &[Round], courses: &[Course]) -> WeeklyDigest {
    let week_start = week_end
        .checked_sub_days(Days::new(DIGEST_DAYS - 1))
        .unwrap_or(NaiveDate::MIN);
    let names: HashMap<&str, &str> = profiles
        .iter()
        .map(|profile| (profile.id.as_str(), profile.display_name()))
        .collect();
    let name_of = |id: &str| names.get(id).copied().unwrap_or(Profile::UNKNOWN_NAME).to_owned();

    let played = rounds
        .iter()
        .filter(|round| (week_start..=week_end).contains(&round.date_of_round))
        .filter_map(|round| round.valid_strokes().map(|strokes| (round, strokes)))
        .collect_vec();

    let best_round = played
        .iter()
        .min_by_key(|(round, strokes)| (*strokes, round.date_of_round))
        .map(|(round, strokes)| BestRound {
            player_id: round.user_id.clone(),
            name: name_of(&round.user_id),
            course: courses
                .iter()
                .find(|course| course.id == round.course_id)
                .map_or(UNKNOWN_COURSE, |course| course.name.as_str())
                .to_owned(),
            score: *strokes,
            to_par: round.total_par.map(|par| fix_score(strokes.saturating_sub(par))),
            date: round.date_of_round,
        });

    let by_player = played
        .iter()
        .map(|(round, strokes)| (round.user_id.as_str(), *strokes))
        .into_group_map();
    let mut players = played
        .iter()
        .map(|(round, _)| round.user_id.as_str())
        .unique()
        .map(|id| {
            let scores = by_player.get(id).map(Vec::as_slice).unwrap_or_default();
            PlayerWeek {
                player_id: id.to_owned(),
                name: name_of(id),
                rounds: scores.len(),
                best_score: scores.iter().min().copied(),
                avg_score: mean(scores.iter().map(|score| f64::from(*score))).map(|avg| round_to(avg, 1)),
            }
        })
        .collect_vec();
    let most_active = players.iter().min_by_key(|player| Reverse(player.rounds)).cloned();
    players.sort_by_key(|player| player.best_score);

    WeeklyDigest {
        week_start,
        week_end,
        rounds_played: played.len(),
        active_players: players.len(),
        club_average: mean(played.iter().map(|(_, strokes)| f64::from(*strokes))).map(|avg| round_to(avg, 1)),
        best_round,
        most_active,
        players,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::testing::{course, date, profile, round};

    #[test]
    fn empty_week() {
        let digest = weekly_digest(date(10), &[profile("a", "Ann")], &[round("1", "a", "c1", 1, 80)], &[]);
        assert_eq!(digest.week_start, date(4));
        assert_eq!(digest.rounds_played, 0);
        assert_eq!(digest.active_players, 0);
        assert_eq!(digest.club_average, None);
        assert_eq!(digest.best_round, None);
        assert_eq!(digest.most_active, None);
        assert!(digest.players.is_empty());
    }

    #[test]
    fn summarises_the_week() {
        let profiles = vec![profile("a", "Ann"), profile("b", "Bob")];
        let courses = vec![course("c1", "Oak Park", None)];
        let rounds = vec![
            round("1", "a", "c1", 3, 70),
            round("2", "a", "c1", 4, 82),
            round("3", "b", "c1", 5, 79),
            round("4", "b", "c1", 6, 0),
            round("5", "a", "c1", 7, 84),
            round("6", "b", "missing", 10, 79),
            round("7", "x", "c1", 8, 90),
        ];
        let digest = weekly_digest(date(10), &profiles, &rounds, &courses);
        assert_eq!(digest.rounds_played, 5);
        assert_eq!(digest.active_players, 3);
        assert_eq!(digest.club_average, Some(82.8));

        let best = digest.best_round.unwrap();
        assert_eq!((best.player_id.as_str(), best.score, best.date), ("b", 79, date(5)));
        assert_eq!(best.course, "Oak Park");
        assert_eq!(best.to_par.as_deref(), Some("+7"));

        assert_eq!(
            digest
                .players
                .iter()
                .map(|p| (p.player_id.as_str(), p.name.as_str(), p.rounds, p.best_score))
                .collect_vec(),
            vec![
                ("b", "Bob", 2, Some(79)),
                ("a", "Ann", 2, Some(82)),
                ("x", Profile::UNKNOWN_NAME, 1, Some(90)),
            ]
        );
        assert_eq!(digest.most_active.unwrap().player_id, "a");
    }

    #[test]
    fn extreme_par_saturates() {
        let mut odd = round("1", "a", "c1", 3, 80);
        odd.total_par = Some(i32::MIN);
        let digest = weekly_digest(date(10), &[profile("a", "Ann")], &[odd], &[]);
        let best = digest.best_round.unwrap();
        assert_eq!(best.to_par, Some(format!("+{}", i32::MAX)));
        assert_eq!(best.course, UNKNOWN_COURSE);
    }
}
