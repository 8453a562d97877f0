//! Personal targets a player sets for themself and how close they are.

mod store;

use chrono::NaiveDate;
use itertools::Itertools;
use rocket_okapi::okapi::schemars::{self, JsonSchema};
use serde::{Deserialize, Serialize};

pub use store::{GoalStore, JsonFileGoalStore, MemoryGoalStore, StoreError};

use crate::model::Round;
use crate::util::{mean, round_to};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GoalTarget {
    /// A round strictly below `score`.
    BreakScore { score: i32 },
    AverageBelow { average: f64 },
    RoundsPlayed { rounds: usize },
    /// Handicap index at or below `index`.
    HandicapBelow { index: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub title: String,
    pub target: GoalTarget,
    pub deadline: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub goal_id: String,
    pub title: String,
    pub current: Option<f64>,
    pub achieved: bool,
    /// Distance still to go, 0 once achieved. `None` without data.
    pub remaining: Option<f64>,
    pub overdue: bool,
}

struct PlayerRecord {
    best: Option<i32>,
    average: Option<f64>,
    rounds: usize,
    handicap_index: Option<f64>,
}

impl GoalTarget {
    /// Current value, whether it is reached and what is left.
    fn progress(self, record: &PlayerRecord) -> (Option<f64>, bool, Option<f64>) {
        match self {
            Self::BreakScore { score } => {
                let best = record.best;
                let achieved = best.is_some_and(|best| best < score);
                let remaining = best.map(|best| (i64::from(best) - i64::from(score) + 1).max(0) as f64);
                (best.map(f64::from), achieved, remaining)
            }
            Self::AverageBelow { average } => {
                let current = record.average.map(|avg| round_to(avg, 1));
                let achieved = record.average.is_some_and(|avg| avg < average);
                let remaining = record
                    .average
                    .map(|avg| if achieved { 0.0 } else { round_to(avg - average, 1) });
                (current, achieved, remaining)
            }
            Self::RoundsPlayed { rounds } => {
                let achieved = record.rounds >= rounds;
                let remaining = rounds.saturating_sub(record.rounds) as f64;
                (Some(record.rounds as f64), achieved, Some(remaining))
            }
            Self::HandicapBelow { index } => {
                let current = record.handicap_index;
                let achieved = current.is_some_and(|current| current <= index);
                let remaining = current.map(|current| round_to((current - index).max(0.0), 1));
                (current, achieved, remaining)
            }
        }
    }
}

pub fn evaluate_goals(
    goals: &[Goal],
    user_id: &str,
    rounds: &[Round],
    handicap_index: Option<f64>,
    today: NaiveDate,
) -> Vec<GoalProgress> {
    let scores = rounds
        .iter()
        .filter(|round| round.user_id == user_id)
        .filter_map(Round::valid_strokes)
        .collect_vec();
    let record = PlayerRecord {
        best: scores.iter().min().copied(),
        average: mean(scores.iter().map(|score| f64::from(*score))),
        rounds: scores.len(),
        handicap_index,
    };

    goals
        .iter()
        .map(|goal| {
            let (current, achieved, remaining) = goal.target.progress(&record);
            GoalProgress {
                goal_id: goal.id.clone(),
                title: goal.title.clone(),
                current,
                achieved,
                remaining,
                overdue: !achieved && goal.deadline.is_some_and(|deadline| deadline < today),
            }
        })
        .collect_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::testing::{date, round};

    pub(super) fn goal(id: &str, target: GoalTarget) -> Goal {
        Goal {
            id: id.to_owned(),
            title: format!("Goal {id}"),
            target,
            deadline: None,
        }
    }

    fn rounds() -> Vec<Round> {
        vec![
            round("r1", "u1", "c1", 1, 84),
            round("r2", "u1", "c1", 2, 80),
            round("r3", "u1", "c1", 3, 0),
            round("r4", "u2", "c1", 3, 70),
        ]
    }

    #[test]
    fn break_score() {
        let goals = [
            goal("a", GoalTarget::BreakScore { score: 80 }),
            goal("b", GoalTarget::BreakScore { score: 81 }),
        ];
        let progress = evaluate_goals(&goals, "u1", &rounds(), None, date(5));
        assert_eq!(progress[0].current, Some(80.0));
        assert!(!progress[0].achieved);
        assert_eq!(progress[0].remaining, Some(1.0));
        assert!(progress[1].achieved);
        assert_eq!(progress[1].remaining, Some(0.0));
    }

    #[test]
    fn extreme_break_targets() {
        let goals = [goal("a", GoalTarget::BreakScore { score: i32::MIN })];
        let rounds = [round("r1", "u1", "c1", 1, i32::MAX)];
        let progress = evaluate_goals(&goals, "u1", &rounds, None, date(5));
        assert!(!progress[0].achieved);
        assert_eq!(progress[0].remaining, Some(f64::from(i32::MAX) - f64::from(i32::MIN) + 1.0));
    }

    #[test]
    fn average_and_rounds() {
        let goals = [
            goal("a", GoalTarget::AverageBelow { average: 81.0 }),
            goal("b", GoalTarget::RoundsPlayed { rounds: 5 }),
        ];
        let progress = evaluate_goals(&goals, "u1", &rounds(), None, date(5));
        assert_eq!(progress[0].current, Some(82.0));
        assert_eq!(progress[0].remaining, Some(1.0));
        assert_eq!(progress[1].current, Some(2.0));
        assert_eq!(progress[1].remaining, Some(3.0));
        assert!(!progress[1].achieved);
    }

    #[test]
    fn without_data() {
        let goals = [
            goal("a", GoalTarget::AverageBelow { average: 81.0 }),
            goal("b", GoalTarget::HandicapBelow { index: 12.0 }),
            goal("c", GoalTarget::BreakScore { score: 90 }),
        ];
        let progress = evaluate_goals(&goals, "nobody", &rounds(), None, date(5));
        assert!(progress
            .iter()
            .all(|p| p.current.is_none() && p.remaining.is_none() && !p.achieved));
    }

    #[test]
    fn handicap_and_deadline() {
        let mut late = goal("a", GoalTarget::HandicapBelow { index: 12.0 });
        late.deadline = Some(date(4));
        let goals = [late, goal("b", GoalTarget::HandicapBelow { index: 15.0 })];
        let progress = evaluate_goals(&goals, "u1", &rounds(), Some(14.2), date(5));
        assert!(progress[0].overdue);
        assert_eq!(progress[0].remaining, Some(2.2));
        assert!(progress[1].achieved);
        assert!(!progress[1].overdue);
    }

    #[test]
    fn targets_are_tagged() {
        let json = serde_json::to_value(goal("a", GoalTarget::BreakScore { score: 90 })).unwrap();
        assert_eq!(json["target"]["kind"], "breakScore");
        assert_eq!(json["target"]["score"], 90);
        let parsed: Goal = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.target, GoalTarget::BreakScore { score: 90 });
    }
}
