use itertools::Itertools;
use log::debug;
use rocket_okapi::okapi::schemars::{self, JsonSchema};
use serde::{Deserialize, Deserializer, Serialize};

use super::Round;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub enum CourseType {
    Links,
    Parkland,
    Heathland,
    Desert,
    Resort,
}

impl CourseType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "links" => Some(Self::Links),
            "parkland" => Some(Self::Parkland),
            "heathland" => Some(Self::Heathland),
            "desert" => Some(Self::Desert),
            "resort" => Some(Self::Resort),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Links => "Links",
            Self::Parkland => "Parkland",
            Self::Heathland => "Heathland",
            Self::Desert => "Desert",
            Self::Resort => "Resort",
        }
    }

    pub const fn to_colour(self) -> &'static str {
        match self {
            Self::Links => "#4F7CAC",
            Self::Parkland => "#3C896D",
            Self::Heathland => "#8E6C8A",
            Self::Desert => "#D9A441",
            Self::Resort => "#E07A5F",
        }
    }
}

fn lenient_course_type<'de, D>(deserializer: D) -> Result<Option<CourseType>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|raw| {
        let parsed = CourseType::parse(&raw);
        if parsed.is_none() {
            debug!("Unrecognised course type \"{raw}\", treating as untyped");
        }
        parsed
    }))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub name: String,
    pub par: Option<i32>,
    pub rating: Option<f64>,
    pub slope: Option<i32>,
    #[serde(default, deserialize_with = "lenient_course_type")]
    #[schemars(with = "Option<CourseType>")]
    pub course_type: Option<CourseType>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseHole {
    pub course_id: String,
    pub hole_number: u8,
    pub par: u8,
    pub stroke_index: u8,
    pub length_meters: Option<u16>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CourseError {
    #[error("Expected 9 or 18 holes, found {holes}")]
    HoleCount { holes: usize },
    #[error("Hole numbers must run from 1 to {expected} without gaps or repeats")]
    HoleNumbering { expected: usize },
    #[error("Stroke indexes must use each of 1 to {expected} exactly once")]
    StrokeIndex { expected: usize },
    #[error("Par {par} on hole {hole} is not between 3 and 6")]
    HolePar { hole: u8, par: u8 },
    #[error("Hole pars add up to {holes} but the course par is {course}")]
    ParMismatch { holes: i32, course: i32 },
    #[error("Course `{0}` still has rounds recorded against it")]
    HasRounds(String),
}

/// Checks the hole layout stored for `course`. Holes belonging to other
/// courses are ignored.
pub fn validate_layout(course: &Course, holes: &[CourseHole]) -> Result<(), CourseError> {
    let holes = holes
        .iter()
        .filter(|hole| hole.course_id == course.id)
        .sorted_by_key(|hole| hole.hole_number)
        .collect_vec();
    let expected = holes.len();
    if expected != 9 && expected != 18 {
        return Err(CourseError::HoleCount { holes: expected });
    }

    if !holes
        .iter()
        .enumerate()
        .all(|(i, hole)| usize::from(hole.hole_number) == i + 1)
    {
        return Err(CourseError::HoleNumbering { expected });
    }

    let stroke_indexes = holes
        .iter()
        .map(|hole| usize::from(hole.stroke_index))
        .sorted()
        .collect_vec();
    if stroke_indexes != (1..=expected).collect_vec() {
        return Err(CourseError::StrokeIndex { expected });
    }

    if let Some(hole) = holes.iter().find(|hole| !(3..=6).contains(&hole.par)) {
        return Err(CourseError::HolePar {
            hole: hole.hole_number,
            par: hole.par,
        });
    }

    let hole_par: i32 = holes.iter().map(|hole| i32::from(hole.par)).sum();
    match course.par {
        Some(par) if par != hole_par => Err(CourseError::ParMismatch {
            holes: hole_par,
            course: par,
        }),
        _ => Ok(()),
    }
}

/// A course can only be removed once no round points at it.
pub fn can_delete_course(course: &Course, rounds: &[Round]) -> Result<(), CourseError> {
    if rounds.iter().any(|round| round.course_id == course.id) {
        Err(CourseError::HasRounds(course.id.clone()))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    const PARS: [u8; 18] = [4, 4, 3, 5, 4, 4, 3, 4, 5, 4, 4, 3, 5, 4, 4, 3, 4, 5];

    fn course(par: Option<i32>) -> Course {
        Course {
            id: "c1".to_owned(),
            name: "Old Course".to_owned(),
            par,
            rating: Some(71.2),
            slope: Some(128),
            course_type: Some(CourseType::Links),
            location: None,
        }
    }

    fn layout() -> Vec<CourseHole> {
        PARS.iter()
            .enumerate()
            .map(|(i, par)| CourseHole {
                course_id: "c1".to_owned(),
                hole_number: i as u8 + 1,
                par: *par,
                stroke_index: ((i * 7) % 18) as u8 + 1,
                length_meters: Some(350),
            })
            .collect()
    }

    #[test]
    fn valid_layout() {
        assert_eq!(validate_layout(&course(Some(72)), &layout()), Ok(()));
        assert_eq!(validate_layout(&course(None), &layout()), Ok(()));
    }

    #[test]
    fn wrong_hole_count() {
        let holes = layout().into_iter().take(12).collect_vec();
        assert_eq!(
            validate_layout(&course(Some(72)), &holes),
            Err(CourseError::HoleCount { holes: 12 })
        );
    }

    #[test]
    fn holes_of_other_courses_are_ignored() {
        let mut holes = layout();
        holes.push(CourseHole {
            course_id: "c2".to_owned(),
            hole_number: 19,
            par: 9,
            stroke_index: 40,
            length_meters: None,
        });
        assert_eq!(validate_layout(&course(Some(72)), &holes), Ok(()));
    }

    #[test]
    fn duplicated_stroke_index() {
        let mut holes = layout();
        holes[3].stroke_index = holes[4].stroke_index;
        assert_eq!(
            validate_layout(&course(Some(72)), &holes),
            Err(CourseError::StrokeIndex { expected: 18 })
        );
    }

    #[test]
    fn repeated_hole_number() {
        let mut holes = layout();
        holes[17].hole_number = 17;
        assert_eq!(
            validate_layout(&course(Some(72)), &holes),
            Err(CourseError::HoleNumbering { expected: 18 })
        );
    }

    #[test]
    fn par_checks() {
        let mut holes = layout();
        holes[0].par = 2;
        assert_eq!(
            validate_layout(&course(Some(72)), &holes),
            Err(CourseError::HolePar { hole: 1, par: 2 })
        );
        assert_eq!(
            validate_layout(&course(Some(70)), &layout()),
            Err(CourseError::ParMismatch {
                holes: 72,
                course: 70
            })
        );
    }

    #[test]
    fn deletion_guard() {
        let round = Round {
            id: "r1".to_owned(),
            user_id: "u1".to_owned(),
            course_id: "c1".to_owned(),
            date_of_round: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            total_strokes: Some(80),
            total_par: Some(72),
            holes_played: None,
            weather: None,
            temp_c: None,
            wind_speed_kph: None,
            is_home: None,
        };
        assert_eq!(
            can_delete_course(&course(Some(72)), &[round]),
            Err(CourseError::HasRounds("c1".to_owned()))
        );
        assert_eq!(can_delete_course(&course(Some(72)), &[]), Ok(()));
    }

    #[test]
    fn unknown_course_type_is_untyped() {
        let course: Course = serde_json::from_value(json!({
            "id": "c9",
            "name": "Seaside Cliffs",
            "courseType": "Cliff-top"
        }))
        .unwrap();
        assert_eq!(course.course_type, None);

        let course: Course = serde_json::from_value(json!({
            "id": "c9",
            "name": "Royal Heath",
            "courseType": "heathland"
        }))
        .unwrap();
        assert_eq!(course.course_type, Some(CourseType::Heathland));
    }
}
