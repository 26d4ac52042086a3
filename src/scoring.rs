use crate::area::AreaResult;

/// Largest distance from 50% on both sides for a cut to count as perfect.
pub const PERFECT_CUT_TOLERANCE: f64 = 0.1;

/// Deviation from 50% that still scores a full 100.
const FULL_SCORE_DEVIATION: f64 = 0.05;

/// Score of a cut whose smaller side holds `percentage` percent.
///
/// `100 - 2 * |50 - percentage|`, floored at 0 and rounded to one decimal.
/// Non-finite input scores 0.
#[must_use]
pub fn cut_score(percentage: f64) -> f64 {
    if !percentage.is_finite() {
        return 0.0;
    }
    let deviation = (50.0 - percentage).abs();
    if deviation <= FULL_SCORE_DEVIATION {
        return 100.0;
    }
    round_tenth((100.0 - deviation * 2.0).max(0.0))
}

/// Returns `true` if both sides are within [`PERFECT_CUT_TOLERANCE`] of 50%.
#[must_use]
pub fn is_perfect_cut(side_a_percentage: f64, side_b_percentage: f64) -> bool {
    (50.0 - side_a_percentage).abs() <= PERFECT_CUT_TOLERANCE
        && (50.0 - side_b_percentage).abs() <= PERFECT_CUT_TOLERANCE
}

/// Mean of the finite scores, rounded to one decimal; 0 when there are none.
#[must_use]
pub fn daily_score(scores: &[f64]) -> f64 {
    let (sum, count) = scores
        .iter()
        .filter(|s| s.is_finite())
        .fold((0.0, 0_u32), |(sum, n), s| (sum + s, n + 1));
    if count == 0 {
        return 0.0;
    }
    round_tenth(sum / f64::from(count))
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Feedback band for a cut score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentaryTier {
    Perfect,
    NearlyPerfect,
    Good,
    KeepTrying,
    Learning,
}

impl CommentaryTier {
    /// Tier for `score`.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn from_score(score: f64) -> Self {
        if score == 100.0 {
            Self::Perfect
        } else if score >= 96.0 {
            Self::NearlyPerfect
        } else if score >= 80.0 {
            Self::Good
        } else if score >= 50.0 {
            Self::KeepTrying
        } else {
            Self::Learning
        }
    }

    /// Messages shown for this tier.
    #[must_use]
    pub fn messages(self) -> &'static [&'static str] {
        match self {
            Self::Perfect => &[
                "PERFECT CUT!",
                "Flawless!",
                "Bullseye!",
                "Incredible!",
                "Masterful!",
            ],
            Self::NearlyPerfect => &[
                "Nearly perfect!",
                "Razor sharp!",
                "So close!",
                "Outstanding!",
                "Brilliant!",
            ],
            Self::Good => &[
                "Nice cut!",
                "Getting there!",
                "Not bad!",
                "Good work!",
                "Solid!",
            ],
            Self::KeepTrying => &[
                "Keep trying!",
                "Practice makes perfect!",
                "You'll get it!",
                "Getting warmer!",
                "Don't give up!",
            ],
            Self::Learning => &[
                "Shapes can be tricky!",
                "Try a different angle!",
                "Every cut teaches!",
                "Keep experimenting!",
                "You're learning!",
            ],
        }
    }

    /// Message number `pick`, wrapping around the tier's list. Callers pass
    /// a random index to vary feedback.
    #[must_use]
    pub fn message(self, pick: usize) -> &'static str {
        let messages = self.messages();
        messages[pick % messages.len()]
    }
}

/// Score and feedback for one resolved cut.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutScore {
    pub score: f64,
    pub is_perfect: bool,
    pub tier: CommentaryTier,
}

impl CutScore {
    /// Scores a normalised area result.
    #[must_use]
    pub fn from_result(result: &AreaResult) -> Self {
        let score = cut_score(result.side_a_percentage);
        Self {
            score,
            is_perfect: is_perfect_cut(result.side_a_percentage, result.side_b_percentage),
            tier: CommentaryTier::from_score(score),
        }
    }
}

/// Totals over every cut of a day.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreSummary {
    pub scores: Vec<f64>,
    pub daily_average: f64,
    pub perfect_cuts: usize,
}

impl ScoreSummary {
    /// Summarises cut scores in play order.
    #[must_use]
    pub fn from_cuts(cuts: &[CutScore]) -> Self {
        let scores: Vec<f64> = cuts.iter().map(|c| c.score).collect();
        Self {
            daily_average: daily_score(&scores),
            perfect_cuts: cuts.iter().filter(|c| c.is_perfect).count(),
            scores,
        }
    }
}
