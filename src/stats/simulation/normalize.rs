use crate::model::Round;

pub const EIGHTEEN_HOLE_PAR: i32 = 72;
/// Assumed par of a nine-hole round that was stored without one.
pub const NINE_HOLE_PAR: i32 = 36;

/// Eighteen-hole equivalent of a round: nine-hole rounds are projected as
/// `72 + 2 × (strokes − par)`, everything else is taken as played.
pub fn normalized_score(round: &Round) -> Option<f64> {
    let strokes = round.valid_strokes()?;
    if round.is_nine_holes() {
        let par = round.total_par.unwrap_or(NINE_HOLE_PAR);
        Some(f64::from(EIGHTEEN_HOLE_PAR) + 2.0 * (f64::from(strokes) - f64::from(par)))
    } else {
        Some(f64::from(strokes))
    }
}

/// Par on the same scale as [`normalized_score`]: a nine-hole round always
/// counts as par 72, an eighteen-hole round without par as well.
pub fn normalized_par(round: &Round) -> Option<f64> {
    round.valid_strokes()?;
    if round.is_nine_holes() {
        Some(f64::from(EIGHTEEN_HOLE_PAR))
    } else {
        Some(f64::from(round.total_par.unwrap_or(EIGHTEEN_HOLE_PAR)))
    }
}
