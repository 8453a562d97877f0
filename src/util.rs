use std::cmp::Ordering;

/// Arithmetic mean, `None` for an empty input.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Share of `part` in `total` as a percentage, 0 when there is nothing to share.
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

/// Score relative to par the way scorecards print it: `-2`, `E`, `+3`.
pub fn fix_score(score: i32) -> String {
    match score.cmp(&0) {
        Ordering::Less => format!("{}", score),
        Ordering::Equal => "E".to_string(),
        Ordering::Greater => format!("+{}", score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_nothing_is_none() {
        assert_eq!(mean(Vec::<f64>::new()), None);
        assert_eq!(mean([70.0, 80.0]), Some(75.0));
    }

    #[test]
    fn rounding() {
        assert_eq!(round_to(76.666_666, 1), 76.7);
        assert_eq!(round_to(4.125, 2), 4.13);
        assert_eq!(round_to(80.0, 1), 80.0);
    }

    #[test]
    fn percentage_never_divides_by_zero() {
        assert_eq!(percentage(3, 0), 0.0);
        assert_eq!(percentage(1, 4), 25.0);
    }

    #[test]
    fn relative_scores() {
        assert_eq!(fix_score(-2), "-2");
        assert_eq!(fix_score(0), "E");
        assert_eq!(fix_score(5), "+5");
    }
}
