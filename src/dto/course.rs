use rocket_okapi::okapi::schemars::{self, JsonSchema};
use serde::Serialize;

use crate::model::{can_delete_course, validate_layout, Course, CourseHole, Round};

/// Outcome of the course management checks. Problems are reported, not
/// returned as errors, so a form can show them next to the fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseCheck {
    pub course_id: String,
    pub layout_valid: bool,
    pub layout_problem: Option<String>,
    pub can_delete: bool,
    pub delete_blocked_by: Option<String>,
}

impl CourseCheck {
    pub fn new(course: &Course, holes: &[CourseHole], rounds: &[Round]) -> Self {
        let layout = validate_layout(course, holes);
        let delete = can_delete_course(course, rounds);
        Self {
            course_id: course.id.clone(),
            layout_valid: layout.is_ok(),
            layout_problem: layout.err().map(|e| e.to_string()),
            can_delete: delete.is_ok(),
            delete_blocked_by: delete.err().map(|e| e.to_string()),
        }
    }
}
