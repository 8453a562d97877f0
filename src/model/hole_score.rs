use rocket_okapi::okapi::schemars::{self, JsonSchema};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HoleScore {
    pub round_id: String,
    pub par: Option<i32>,
    pub stroke_index: Option<i32>,
    pub strokes: Option<i32>,
}

impl HoleScore {
    /// `(par, strokes)` when the hole was actually played and has a par.
    pub fn counted(&self) -> Option<(i32, i32)> {
        match (self.par, self.strokes) {
            (Some(par), Some(strokes)) if strokes > 0 => Some((par, strokes)),
            _ => None,
        }
    }

    pub fn to_par(&self) -> Option<i32> {
        self.counted().map(|(par, strokes)| strokes - par)
    }
}
