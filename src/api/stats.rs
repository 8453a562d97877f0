use itertools::Itertools;
use log::debug;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

use crate::api::{Error, Services};
use crate::dto::{
    CourseCheck, CourseValidationRequest, DigestRequest, EnvironmentRequest, HandicapRequest,
    LeaderboardRequest, LineupRequest, ScoringRequest, SimulationRequest,
};
use crate::stats::simulation::{self, PlayerProjection, TeamProjection};
use crate::stats::{
    environmental_breakdown, handicap_record, leaderboard, player_standings, scoring_summary,
    weekly_digest, EnvironmentalBreakdown, HandicapRecord, PlayerStanding, ScoringSummary,
    WeeklyDigest,
};

/// # Scoring distribution
/// Par 3/4/5 averages and the eagle-to-double-bogey histogram of the given holes.
#[openapi(tag = "Statistics")]
#[post("/stats/scoring", data = "<request>")]
pub fn scoring(request: Json<ScoringRequest>) -> Json<ScoringSummary> {
    scoring_summary(&request.hole_scores).into()
}

/// # Environmental breakdown
/// Average score per course type, weather, wind band and home/away.
#[openapi(tag = "Statistics")]
#[post("/stats/environment", data = "<request>")]
pub fn environment(request: Json<EnvironmentRequest>) -> Json<EnvironmentalBreakdown> {
    environmental_breakdown(&request.rounds, &request.courses).into()
}

/// # Leaderboard
#[openapi(tag = "Statistics")]
#[post("/stats/leaderboard", data = "<request>")]
pub fn standings(services: &State<Services>, request: Json<LeaderboardRequest>) -> Json<Vec<PlayerStanding>> {
    let window = request.trend_window.unwrap_or(services.config.trend_window);
    if request.all_players {
        player_standings(&request.profiles, &request.rounds, window).into()
    } else {
        leaderboard(&request.profiles, &request.rounds, window).into()
    }
}

/// # Weekly digest
/// The seven days ending on `weekEnd`.
#[openapi(tag = "Statistics")]
#[post("/stats/digest", data = "<request>")]
pub fn digest(request: Json<DigestRequest>) -> Json<WeeklyDigest> {
    weekly_digest(request.week_end, &request.profiles, &request.rounds, &request.courses).into()
}

/// # Handicap
/// Score differentials and the resulting handicap index of one player.
#[openapi(tag = "Statistics")]
#[post("/stats/handicap", data = "<request>")]
pub fn handicap(request: Json<HandicapRequest>) -> Json<HandicapRecord> {
    handicap_record(&request.player_id, &request.rounds, &request.courses).into()
}

/// # Team simulation
#[openapi(tag = "Simulation")]
#[post("/simulation", data = "<request>")]
pub fn simulate(request: Json<SimulationRequest>) -> Result<Json<TeamProjection>, Error> {
    Ok(simulation::project_team(&request.selection, &request.profiles, &request.rounds, &request.courses)?.into())
}

/// # Lineup suggestion
/// The candidates with the best projections for the format, venue and condition.
#[openapi(tag = "Simulation")]
#[post("/simulation/lineup", data = "<request>")]
pub fn lineup(request: Json<LineupRequest>) -> Result<Json<Vec<PlayerProjection>>, Error> {
    let lineup = simulation::suggest_lineup(
        request.format,
        &request.candidate_ids,
        request.venue,
        request.condition,
        &request.profiles,
        &request.rounds,
        &request.courses,
    )?;
    debug!(
        "Suggested {} for {}",
        lineup.iter().map(|player| player.name.as_str()).join(", "),
        request.format
    );
    Ok(lineup.into())
}

/// # Course checks
/// Validates the hole layout and whether the course could be deleted.
#[openapi(tag = "Courses")]
#[post("/courses/validate", data = "<request>")]
pub fn validate_course(request: Json<CourseValidationRequest>) -> Json<CourseCheck> {
    CourseCheck::new(&request.course, &request.holes, &request.rounds).into()
}
