//! Pure calculations over club records. Nothing in here does I/O; identical
//! input always gives identical output.

pub mod digest;
pub mod distribution;
pub mod environment;
pub mod handicap;
pub mod leaderboard;
pub mod simulation;

pub use digest::{weekly_digest, WeeklyDigest};
pub use distribution::{scoring_summary, ScoreType, ScoringSummary};
pub use environment::{environmental_breakdown, EnvironmentalBreakdown, WindBand};
pub use handicap::{handicap_index, handicap_record, score_differential, HandicapRecord};
pub use leaderboard::{leaderboard, player_standings, PlayerStanding, Trend, DEFAULT_TREND_WINDOW};
