use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

use crate::access::Caller;
use crate::api::{Error, Services};
use crate::goals::Goal;
use crate::weather::WeatherSnapshot;

/// # GET goals
/// The player's own goals; admins may read anyone's.
#[openapi(tag = "Goals")]
#[get("/goals/<user_id>")]
pub async fn get_goals(caller: Caller, services: &State<Services>, user_id: &str) -> Result<Json<Vec<Goal>>, Error> {
    if !caller.can_read_goals(user_id) {
        return Err(Error::Forbidden(caller.user_id));
    }
    Ok(services.goals.load(user_id).await?.into())
}

/// # GET current weather
/// `null` when the conditions can't be looked up.
#[openapi(tag = "Weather")]
#[get("/weather?<lat>&<lon>")]
pub async fn current_weather(services: &State<Services>, lat: f64, lon: f64) -> Json<Option<WeatherSnapshot>> {
    services.weather.lookup(lat, lon).await.into()
}
