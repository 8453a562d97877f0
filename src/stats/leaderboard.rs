use itertools::Itertools;
use rocket_okapi::okapi::schemars::{self, JsonSchema};
use serde::Serialize;

use crate::model::{Profile, Round};
use crate::util::{mean, round_to};

pub const DEFAULT_TREND_WINDOW: usize = 10;
const TREND_MIN_ROUNDS: usize = 4;
const TREND_THRESHOLD: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStanding {
    pub player_id: String,
    pub name: String,
    pub rounds_played: usize,
    pub best_score: Option<i32>,
    pub avg_score: Option<f64>,
    pub trend: Option<Trend>,
    /// Competition rank (1, 2, 2, 4). `None` in the unranked view.
    pub rank: Option<usize>,
    pub tied: bool,
}

impl PlayerStanding {
    fn new(profile: &Profile, rounds: &[&Round], trend_window: usize) -> Self {
        let scores = rounds.iter().filter_map(|round| round.valid_strokes()).collect_vec();
        Self {
            player_id: profile.id.clone(),
            name: profile.display_name().to_owned(),
            rounds_played: scores.len(),
            best_score: scores.iter().min().copied(),
            avg_score: mean(scores.iter().map(|score| f64::from(*score))).map(|avg| round_to(avg, 1)),
            trend: trend(rounds, trend_window),
            rank: None,
            tied: false,
        }
    }
}

/// Every profile in input order with its round statistics, including players
/// who have not played yet.
pub fn player_standings(profiles: &[Profile], rounds: &[Round], trend_window: usize) -> Vec<PlayerStanding> {
    let by_player = rounds
        .iter()
        .filter(|round| round.is_valid())
        .into_group_map_by(|round| round.user_id.as_str());
    profiles
        .iter()
        .map(|profile| {
            let rounds = by_player
                .get(profile.id.as_str())
                .map(Vec::as_slice)
                .unwrap_or_default();
            PlayerStanding::new(profile, rounds, trend_window)
        })
        .collect_vec()
}

/// Players with at least one valid round, best score first. Equal best
/// scores keep their input order and share a rank.
pub fn leaderboard(profiles: &[Profile], rounds: &[Round], trend_window: usize) -> Vec<PlayerStanding> {
    let mut ranked = player_standings(profiles, rounds, trend_window)
        .into_iter()
        .filter(|standing| standing.rounds_played > 0)
        .collect_vec();
    ranked.sort_by_key(|standing| standing.best_score);
    assign_ranks(&mut ranked);
    ranked
}

fn assign_ranks(standings: &mut [PlayerStanding]) {
    let mut rank = 1;
    let mut same_score_count = 0;
    let mut last_score = standings.first().and_then(|standing| standing.best_score);

    for standing in standings.iter_mut() {
        if standing.best_score != last_score {
            rank += same_score_count;
            same_score_count = 0;
        }
        same_score_count += 1;
        last_score = standing.best_score;
        standing.rank = Some(rank);
    }

    let ranks = standings.iter().map(|standing| standing.rank).counts();
    for standing in standings.iter_mut() {
        standing.tied = ranks.get(&standing.rank).is_some_and(|count| *count > 1);
    }
}

/// Compares the newer half of the last `window` rounds against the older
/// half. Needs at least four valid rounds.
pub fn trend(rounds: &[&Round], window: usize) -> Option<Trend> {
    let recent = rounds
        .iter()
        .filter_map(|round| round.valid_strokes().map(|strokes| (round.date_of_round, strokes)))
        .sorted_by(|a, b| b.0.cmp(&a.0))
        .take(window)
        .map(|(_, strokes)| f64::from(strokes))
        .collect_vec();
    if recent.len() < TREND_MIN_ROUNDS {
        return None;
    }

    let (newer, older) = recent.split_at(recent.len() / 2);
    let newer = mean(newer.iter().copied())?;
    let older = mean(older.iter().copied())?;
    Some(if newer < older - TREND_THRESHOLD {
        Trend::Improving
    } else if newer > older + TREND_THRESHOLD {
        Trend::Declining
    } else {
        Trend::Stable
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::testing::{profile, round};
    use fake::faker::name::en::Name;
    use fake::{Dummy, Fake, Faker};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[derive(Debug, Dummy)]
    struct TestingPlayer {
        #[dummy(faker = "Name()")]
        name: String,
        #[dummy(faker = "(Faker, 0..8)")]
        rounds: Vec<TestingRound>,
    }

    #[derive(Debug, Dummy)]
    struct TestingRound {
        #[dummy(faker = "-2..105")]
        strokes: i32,
        #[dummy(faker = "0..60")]
        day: u32,
    }

    fn field(seed: u64) -> (Vec<Profile>, Vec<Round>) {
        let mut rng = StdRng::seed_from_u64(seed);
        let players: Vec<TestingPlayer> = (0..25).map(|_| Faker.fake_with_rng(&mut rng)).collect();
        let mut rounds = vec![];
        let profiles = players
            .into_iter()
            .enumerate()
            .map(|(i, player)| {
                let id = format!("p{i}");
                rounds.extend(player.rounds.iter().enumerate().map(|(j, r)| {
                    round(&format!("{id}-{j}"), &id, "c1", r.day, r.strokes)
                }));
                profile(&id, &player.name)
            })
            .collect_vec();
        (profiles, rounds)
    }

    #[test]
    fn per_player_statistics() {
        let profiles = vec![profile("a", "Ann"), profile("b", "Bob")];
        let rounds = vec![
            round("1", "a", "c1", 1, 80),
            round("2", "a", "c1", 2, 77),
            round("3", "a", "c1", 3, 0),
            round("4", "a", "c1", 4, 83),
        ];
        let standings = player_standings(&profiles, &rounds, DEFAULT_TREND_WINDOW);
        assert_eq!(standings.len(), 2);
        assert_eq!(standings[0].rounds_played, 3);
        assert_eq!(standings[0].best_score, Some(77));
        assert_eq!(standings[0].avg_score, Some(80.0));
        assert_eq!(standings[1].rounds_played, 0);
        assert_eq!(standings[1].best_score, None);
        assert_eq!(standings[1].avg_score, None);
        assert_eq!(standings[1].trend, None);
    }

    #[test]
    fn players_without_rounds_are_not_ranked() {
        let profiles = vec![profile("a", "Ann"), profile("b", "Bob"), profile("c", "Cat")];
        let rounds = vec![round("1", "c", "c1", 1, 79), round("2", "a", "c1", 1, 85)];
        let board = leaderboard(&profiles, &rounds, DEFAULT_TREND_WINDOW);
        assert_eq!(
            board.iter().map(|s| s.player_id.as_str()).collect_vec(),
            vec!["c", "a"]
        );
        assert_eq!(board[0].rank, Some(1));
        assert_eq!(board[1].rank, Some(2));
    }

    #[test]
    fn ties_keep_input_order_and_share_rank() {
        let profiles = vec![
            profile("a", "Ann"),
            profile("b", "Bob"),
            profile("c", "Cat"),
            profile("d", "Dan"),
        ];
        let rounds = vec![
            round("1", "a", "c1", 1, 78),
            round("2", "b", "c1", 1, 74),
            round("3", "c", "c1", 1, 78),
            round("4", "d", "c1", 1, 80),
        ];
        let board = leaderboard(&profiles, &rounds, DEFAULT_TREND_WINDOW);
        assert_eq!(
            board.iter().map(|s| (s.player_id.as_str(), s.rank, s.tied)).collect_vec(),
            vec![
                ("b", Some(1), false),
                ("a", Some(2), true),
                ("c", Some(2), true),
                ("d", Some(4), false),
            ]
        );
    }

    #[test]
    fn ranking_is_monotonic() {
        for seed in 0..5 {
            let (profiles, rounds) = field(seed);
            let board = leaderboard(&profiles, &rounds, DEFAULT_TREND_WINDOW);
            assert!(board.iter().all(|s| s.rounds_played > 0));
            assert!(board
                .windows(2)
                .all(|pair| pair[0].best_score <= pair[1].best_score && pair[0].rank <= pair[1].rank));
            for standing in &board {
                let scores = rounds
                    .iter()
                    .filter(|r| r.user_id == standing.player_id)
                    .filter_map(Round::valid_strokes)
                    .collect_vec();
                let sum: i32 = scores.iter().sum();
                let avg = standing.avg_score.unwrap();
                let n = scores.len() as f64;
                assert!((avg * n - f64::from(sum)).abs() <= 0.05 * n + 1e-9);
            }
        }
    }

    #[test]
    fn trend_needs_four_rounds() {
        let rounds = [
            round("1", "a", "c1", 1, 90),
            round("2", "a", "c1", 2, 80),
            round("3", "a", "c1", 3, 70),
        ];
        assert_eq!(trend(&rounds.iter().collect_vec(), DEFAULT_TREND_WINDOW), None);
    }

    #[test]
    fn trend_directions() {
        let improving = [
            round("1", "a", "c1", 1, 90),
            round("2", "a", "c1", 2, 88),
            round("3", "a", "c1", 3, 80),
            round("4", "a", "c1", 4, 81),
        ];
        assert_eq!(
            trend(&improving.iter().collect_vec(), DEFAULT_TREND_WINDOW),
            Some(Trend::Improving)
        );

        let declining = [
            round("1", "a", "c1", 4, 90),
            round("2", "a", "c1", 3, 88),
            round("3", "a", "c1", 2, 80),
            round("4", "a", "c1", 1, 81),
        ];
        assert_eq!(
            trend(&declining.iter().collect_vec(), DEFAULT_TREND_WINDOW),
            Some(Trend::Declining)
        );

        let stable = [
            round("1", "a", "c1", 1, 82),
            round("2", "a", "c1", 2, 81),
            round("3", "a", "c1", 3, 80),
            round("4", "a", "c1", 4, 81),
        ];
        assert_eq!(
            trend(&stable.iter().collect_vec(), DEFAULT_TREND_WINDOW),
            Some(Trend::Stable)
        );
    }

    #[test]
    fn trend_only_looks_at_the_window() {
        let mut rounds = (0..4)
            .map(|day| round(&day.to_string(), "a", "c1", 50 + day, 80))
            .collect_vec();
        rounds.extend((0..6).map(|day| round(&format!("old{day}"), "a", "c1", day, 100)));
        let refs = rounds.iter().collect_vec();
        assert_eq!(trend(&refs, 4), Some(Trend::Stable));
        assert_eq!(trend(&refs, 10), Some(Trend::Improving));
    }
}
