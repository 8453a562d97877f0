use chrono::NaiveDate;
use rocket_okapi::okapi::schemars::{self, JsonSchema};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "u8")]
pub enum HolesPlayed {
    Nine,
    Eighteen,
}

impl HolesPlayed {
    pub const fn new(holes: i64) -> Option<Self> {
        match holes {
            9 => Some(Self::Nine),
            18 => Some(Self::Eighteen),
            _ => None,
        }
    }

    pub const fn count(self) -> u8 {
        match self {
            Self::Nine => 9,
            Self::Eighteen => 18,
        }
    }
}

impl From<HolesPlayed> for u8 {
    fn from(value: HolesPlayed) -> Self {
        value.count()
    }
}

/// Anything other than 9 or 18 is treated as unknown instead of rejecting the round.
fn lenient_holes<'de, D>(deserializer: D) -> Result<Option<HolesPlayed>, D::Error>
where
    D: Deserializer<'de>,
{
    let holes = Option::<i64>::deserialize(deserializer)?;
    Ok(holes.and_then(HolesPlayed::new))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub date_of_round: NaiveDate,
    pub total_strokes: Option<i32>,
    pub total_par: Option<i32>,
    #[serde(default, deserialize_with = "lenient_holes")]
    #[schemars(with = "Option<u8>")]
    pub holes_played: Option<HolesPlayed>,
    pub weather: Option<String>,
    pub temp_c: Option<f64>,
    pub wind_speed_kph: Option<f64>,
    pub is_home: Option<bool>,
}

impl Round {
    /// Strokes of a round that counts towards scoring aggregates.
    pub fn valid_strokes(&self) -> Option<i32> {
        self.total_strokes.filter(|strokes| *strokes > 0)
    }

    pub fn is_valid(&self) -> bool {
        self.valid_strokes().is_some()
    }

    pub fn is_nine_holes(&self) -> bool {
        self.holes_played == Some(HolesPlayed::Nine)
    }

    /// Weather text with surrounding whitespace removed, `None` when blank.
    pub fn weather_text(&self) -> Option<&str> {
        self.weather
            .as_deref()
            .map(str::trim)
            .filter(|weather| !weather.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_store_json() {
        let round: Round = serde_json::from_value(json!({
            "id": "r1",
            "userId": "u1",
            "courseId": "c1",
            "dateOfRound": "2024-05-04",
            "totalStrokes": 82,
            "totalPar": 72,
            "holesPlayed": 18,
            "weather": " Sunny ",
            "tempC": 17.5,
            "windSpeedKph": null,
            "isHome": true
        }))
        .unwrap();
        assert_eq!(round.valid_strokes(), Some(82));
        assert_eq!(round.holes_played, Some(HolesPlayed::Eighteen));
        assert_eq!(round.weather_text(), Some("Sunny"));
        assert_eq!(round.wind_speed_kph, None);
    }

    #[test]
    fn odd_hole_counts_and_missing_fields_are_tolerated() {
        let round: Round = serde_json::from_value(json!({
            "id": "r2",
            "userId": "u1",
            "courseId": "c1",
            "dateOfRound": "2024-05-04",
            "totalStrokes": 0,
            "holesPlayed": 12
        }))
        .unwrap();
        assert_eq!(round.holes_played, None);
        assert!(!round.is_valid());
        assert_eq!(round.weather_text(), None);
    }

    #[test]
    fn holes_serialise_as_numbers() {
        let value = serde_json::to_value(HolesPlayed::Nine).unwrap();
        assert_eq!(value, json!(9));
    }
}
