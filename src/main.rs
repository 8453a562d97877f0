use pgc_stats::api;
use pgc_stats::config::Config;
use rocket::{launch, Build, Rocket};

#[launch]
fn rocket() -> Rocket<Build> {
    api::launch(Config::load())
}
