//! Records as they come out of the club database. The statistics code only
//! ever reads these.

mod course;
mod hole_score;
mod profile;
mod round;
mod squad;

pub use course::{can_delete_course, validate_layout, Course, CourseError, CourseHole, CourseType};
pub use hole_score::HoleScore;
pub use profile::{ApprovalStatus, Profile, Role, RoleError};
pub use round::{HolesPlayed, Round};
pub use squad::{AdminSquad, Squad, SquadMember};
