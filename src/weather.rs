//! Current conditions at a course, used to prefill a new round.

use log::{debug, warn};
use rocket_okapi::okapi::schemars::{self, JsonSchema};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum WeatherCategory {
    Sunny,
    Cloudy,
    Fog,
    Rain,
    Snow,
    Storm,
}

impl WeatherCategory {
    /// WMO weather interpretation codes.
    pub const fn from_wmo_code(code: u8) -> Option<Self> {
        match code {
            0 | 1 => Some(Self::Sunny),
            2 | 3 => Some(Self::Cloudy),
            45 | 48 => Some(Self::Fog),
            51..=67 | 80..=82 => Some(Self::Rain),
            71..=77 | 85 | 86 => Some(Self::Snow),
            95..=99 => Some(Self::Storm),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Sunny => "Sunny",
            Self::Cloudy => "Cloudy",
            Self::Fog => "Fog",
            Self::Rain => "Rain",
            Self::Snow => "Snow",
            Self::Storm => "Storm",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    pub category: WeatherCategory,
    pub temp_c: f64,
    pub wind_kph: f64,
}

#[rocket::async_trait]
pub trait WeatherLookup: Send + Sync {
    /// Best effort: `None` whenever the conditions can't be determined.
    async fn lookup(&self, lat: f64, lon: f64) -> Option<WeatherSnapshot>;
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: CurrentConditions,
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    temperature_2m: f64,
    weather_code: u8,
    wind_speed_10m: f64,
}

impl CurrentConditions {
    fn snapshot(&self) -> Option<WeatherSnapshot> {
        Some(WeatherSnapshot {
            category: WeatherCategory::from_wmo_code(self.weather_code)?,
            temp_c: self.temperature_2m,
            wind_kph: self.wind_speed_10m,
        })
    }
}

pub fn valid_coordinates(lat: f64, lon: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)
}

/// Client for an Open-Meteo compatible forecast endpoint.
#[derive(Debug, Clone)]
pub struct OpenMeteo {
    client: reqwest::Client,
    url: String,
}

impl OpenMeteo {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    async fn fetch(&self, lat: f64, lon: f64) -> Result<ForecastResponse, reqwest::Error> {
        self.client
            .get(&self.url)
            .query(&[
                ("latitude", lat.to_string()),
                ("longitude", lon.to_string()),
                ("current", "temperature_2m,weather_code,wind_speed_10m".to_owned()),
                ("wind_speed_unit", "kmh".to_owned()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<ForecastResponse>()
            .await
    }
}

#[rocket::async_trait]
impl WeatherLookup for OpenMeteo {
    async fn lookup(&self, lat: f64, lon: f64) -> Option<WeatherSnapshot> {
        if !valid_coordinates(lat, lon) {
            debug!("Ignoring weather lookup for {lat},{lon}");
            return None;
        }
        match self.fetch(lat, lon).await {
            Ok(response) => {
                let snapshot = response.current.snapshot();
                if snapshot.is_none() {
                    warn!("Unknown weather code {}", response.current.weather_code);
                }
                snapshot
            }
            Err(e) => {
                warn!("Weather lookup failed: {e}");
                None
            }
        }
    }
}
