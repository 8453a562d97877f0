use chrono::Utc;
use log::info;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

use crate::access::Caller;
use crate::api::{Error, Services};
use crate::dto::GoalProgressRequest;
use crate::goals::{evaluate_goals, Goal, GoalProgress};

/// # PUT goals
/// Replaces the caller's goals.
#[openapi(tag = "Goals")]
#[put("/goals/<user_id>", data = "<goals>")]
pub async fn set_goals(
    caller: Caller,
    services: &State<Services>,
    user_id: &str,
    goals: Json<Vec<Goal>>,
) -> Result<Json<Vec<Goal>>, Error> {
    if !caller.can_write_goals(user_id) {
        return Err(Error::Forbidden(caller.user_id));
    }
    let goals = goals.into_inner();
    services.goals.save(user_id, goals.clone()).await?;
    info!("{user_id} now has {} goals", goals.len());
    Ok(goals.into())
}

/// # Goal progress
/// Evaluates the stored goals against the given rounds.
#[openapi(tag = "Goals")]
#[post("/goals/<user_id>/progress", data = "<request>")]
pub async fn goal_progress(
    caller: Caller,
    services: &State<Services>,
    user_id: &str,
    request: Json<GoalProgressRequest>,
) -> Result<Json<Vec<GoalProgress>>, Error> {
    if !caller.can_read_goals(user_id) {
        return Err(Error::Forbidden(caller.user_id));
    }
    let goals = services.goals.load(user_id).await?;
    let today = request.today.unwrap_or_else(|| Utc::now().date_naive());
    Ok(evaluate_goals(&goals, user_id, &request.rounds, request.handicap_index, today).into())
}
