//! Request and response bodies of the HTTP service. Records travel in the
//! request; the service keeps no copy of them.

mod course;

use chrono::NaiveDate;
use rocket_okapi::okapi::schemars::{self, JsonSchema};
use serde::Deserialize;

pub use course::CourseCheck;

use crate::model::{AdminSquad, Course, CourseHole, HoleScore, Profile, Round, Squad, SquadMember};
use crate::report::ReportFilter;
use crate::stats::simulation::{Condition, MatchFormat, Selection, VenueType};

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoringRequest {
    pub hole_scores: Vec<HoleScore>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentRequest {
    pub rounds: Vec<Round>,
    #[serde(default)]
    pub courses: Vec<Course>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardRequest {
    pub profiles: Vec<Profile>,
    pub rounds: Vec<Round>,
    /// Defaults to the configured window.
    pub trend_window: Option<usize>,
    /// Include players without rounds, unranked and in input order.
    #[serde(default)]
    pub all_players: bool,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DigestRequest {
    pub week_end: NaiveDate,
    pub profiles: Vec<Profile>,
    pub rounds: Vec<Round>,
    #[serde(default)]
    pub courses: Vec<Course>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HandicapRequest {
    pub player_id: String,
    pub rounds: Vec<Round>,
    pub courses: Vec<Course>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRequest {
    pub selection: Selection,
    pub profiles: Vec<Profile>,
    pub rounds: Vec<Round>,
    #[serde(default)]
    pub courses: Vec<Course>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LineupRequest {
    pub format: MatchFormat,
    pub candidate_ids: Vec<String>,
    pub venue: Option<VenueType>,
    pub condition: Option<Condition>,
    pub profiles: Vec<Profile>,
    pub rounds: Vec<Round>,
    #[serde(default)]
    pub courses: Vec<Course>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseValidationRequest {
    pub course: Course,
    pub holes: Vec<CourseHole>,
    /// Rounds that may reference the course.
    #[serde(default)]
    pub rounds: Vec<Round>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    /// Restrict the report to one squad's members.
    pub squad_id: Option<String>,
    #[serde(default)]
    pub squads: Vec<Squad>,
    #[serde(default)]
    pub squad_members: Vec<SquadMember>,
    #[serde(default)]
    pub admin_squads: Vec<AdminSquad>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub weather: Option<String>,
    /// Date in the file name, today when absent. Also ends the report range
    /// when neither `from` nor `to` is given.
    pub date: Option<NaiveDate>,
    pub rounds: Vec<Round>,
    pub profiles: Vec<Profile>,
    #[serde(default)]
    pub courses: Vec<Course>,
}

impl ExportRequest {
    pub fn filter(&self, squad_member_ids: Option<Vec<String>>) -> ReportFilter {
        ReportFilter {
            from: self.from,
            to: self.to,
            squad_member_ids,
            weather: self.weather.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgressRequest {
    pub rounds: Vec<Round>,
    pub handicap_index: Option<f64>,
    /// Reference date for deadlines, today when absent.
    pub today: Option<NaiveDate>,
}
