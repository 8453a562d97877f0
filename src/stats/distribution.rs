use itertools::Itertools;
use rocket_okapi::okapi::schemars::{self, JsonSchema};
use serde::Serialize;

use crate::model::HoleScore;
use crate::util::{mean, percentage, round_to};

/// Where a single hole landed relative to par.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum ScoreType {
    EagleOrBetter,
    Birdie,
    Par,
    Bogey,
    DoubleOrWorse,
}

impl ScoreType {
    pub const ALL: [Self; 5] = [
        Self::EagleOrBetter,
        Self::Birdie,
        Self::Par,
        Self::Bogey,
        Self::DoubleOrWorse,
    ];

    pub const fn new(strokes: i32, par: i32) -> Self {
        match strokes.saturating_sub(par) {
            ..=-2 => Self::EagleOrBetter,
            -1 => Self::Birdie,
            0 => Self::Par,
            1 => Self::Bogey,
            _ => Self::DoubleOrWorse,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::EagleOrBetter => "Eagle or better",
            Self::Birdie => "Birdie",
            Self::Par => "Par",
            Self::Bogey => "Bogey",
            Self::DoubleOrWorse => "Double bogey or worse",
        }
    }

    pub const fn to_colour(&self) -> &'static str {
        match self {
            Self::EagleOrBetter => "#6A8BE7",
            Self::Birdie => "#A6F8BB",
            Self::Par => "#7E8490",
            Self::Bogey => "#EC928F",
            Self::DoubleOrWorse => "#AB8E77",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParAverages {
    pub par3: Option<f64>,
    pub par4: Option<f64>,
    pub par5: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DistributionBucket {
    pub score_type: ScoreType,
    pub label: String,
    pub count: usize,
    pub percentage: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoringDistribution {
    pub total: usize,
    pub buckets: Vec<DistributionBucket>,
}

impl ScoringDistribution {
    pub fn bucket(&self, score_type: ScoreType) -> Option<&DistributionBucket> {
        self.buckets
            .iter()
            .find(|bucket| bucket.score_type == score_type)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoringSummary {
    pub par_averages: ParAverages,
    pub distribution: ScoringDistribution,
}

pub fn scoring_summary(scores: &[HoleScore]) -> ScoringSummary {
    ScoringSummary {
        par_averages: par_averages(scores),
        distribution: distribution(scores),
    }
}

/// Mean strokes on par 3, 4 and 5 holes, two decimals.
pub fn par_averages(scores: &[HoleScore]) -> ParAverages {
    let average_for = |wanted: i32| {
        mean(
            scores
                .iter()
                .filter_map(HoleScore::counted)
                .filter(|(par, _)| *par == wanted)
                .map(|(_, strokes)| f64::from(strokes)),
        )
        .map(|average| round_to(average, 2))
    };
    ParAverages {
        par3: average_for(3),
        par4: average_for(4),
        par5: average_for(5),
    }
}

/// Every counted hole falls in exactly one of the five buckets.
pub fn distribution(scores: &[HoleScore]) -> ScoringDistribution {
    let counts = scores
        .iter()
        .filter_map(HoleScore::counted)
        .map(|(par, strokes)| ScoreType::new(strokes, par))
        .counts();
    let total = counts.values().sum();
    let buckets = ScoreType::ALL
        .iter()
        .map(|score_type| {
            let count = counts.get(score_type).copied().unwrap_or_default();
            DistributionBucket {
                score_type: *score_type,
                label: score_type.label().to_owned(),
                count,
                percentage: round_to(percentage(count, total), 1),
                color: score_type.to_colour().to_owned(),
            }
        })
        .collect_vec();
    ScoringDistribution { total, buckets }
}
