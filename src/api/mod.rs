mod guard;
mod mutation;
mod query;
mod reports;
mod stats;

use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{Build, Request, Rocket};
use rocket_okapi::openapi_get_routes;
use rocket_okapi::rapidoc::{make_rapidoc, GeneralConfig, RapiDocConfig};
use rocket_okapi::settings::UrlObject;
use rocket_okapi::swagger_ui::{make_swagger_ui, SwaggerUIConfig};
use serde_json::{json, Value};

use crate::config::Config;
use crate::goals::{GoalStore, JsonFileGoalStore, MemoryGoalStore};
use crate::weather::{OpenMeteo, WeatherLookup};
pub use guard::{Error, USER_ID_HEADER, USER_ROLE_HEADER};
pub use reports::CsvFile;
use mutation::*;
use query::*;
use reports::*;
use stats::*;

/// Everything a route needs besides the request itself.
pub struct Services {
    pub config: Config,
    pub goals: Box<dyn GoalStore>,
    pub weather: Box<dyn WeatherLookup>,
}

impl Services {
    pub fn from_config(config: Config) -> Self {
        let goals: Box<dyn GoalStore> = match &config.goals_dir {
            Some(dir) => Box::new(JsonFileGoalStore::new(dir)),
            None => Box::new(MemoryGoalStore::default()),
        };
        Self {
            weather: Box::new(OpenMeteo::new(config.weather_url.clone())),
            goals,
            config,
        }
    }
}

pub fn launch(config: Config) -> Rocket<Build> {
    build(Services::from_config(config))
}

pub fn build(services: Services) -> Rocket<Build> {
    rocket::build()
        .manage(services)
        .mount(
            "/",
            openapi_get_routes![
                scoring,
                environment,
                standings,
                digest,
                handicap,
                simulate,
                lineup,
                validate_course,
                export,
                get_goals,
                set_goals,
                goal_progress,
                current_weather,
            ],
        )
        .mount(
            "/swagger",
            make_swagger_ui(&SwaggerUIConfig {
                url: "../openapi.json".to_owned(),
                ..Default::default()
            }),
        )
        .mount(
            "/rapidoc",
            make_rapidoc(&RapiDocConfig {
                general: GeneralConfig {
                    spec_urls: vec![UrlObject::new("General", "../openapi.json")],
                    ..Default::default()
                },
                ..Default::default()
            }),
        )
        .register("/", catchers![default_catcher])
}

#[catch(default)]
fn default_catcher(status: Status, _request: &Request) -> (Status, Json<Value>) {
    let reason = status.reason().unwrap_or("Unknown error");
    (status, Json(json!({ "error": reason })))
}
