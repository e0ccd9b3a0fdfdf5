//! Scoring: tiers, ideal reference bands and result synthesis
//!
//! Turns [`GeometricMeasurements`](crate::models::GeometricMeasurements) into a
//! bounded [`AnalysisResult`](crate::models::AnalysisResult).
//!
//! # Score bounds
//!
//! ```text
//! overall score   [1.0, 10.0]   default 5.0 when a narrative omits it
//! radar axes      [1.0, 10.0]   default 5.0 per axis
//! fallback axes   {9, 7, 5}     by closeness to the ideal band
//! ```
//!
//! # Tiers (half-open, top tier closed)
//!
//! ```text
//! Sub 3    [1, 3)     Chadlite [7, 8)
//! Sub 5    [3, 5)     Chad     [8, 9)
//! Normie   [5, 6)     Adam     [9, 10]
//! HTN      [6, 7)
//! ```

pub mod fallback;
pub mod ideals;
pub mod synthesizer;
pub mod tiers;

pub use fallback::fallback_analysis;
pub use ideals::{ideal_range, IdealRange, IDEAL_RANGES};
pub use synthesizer::{validate_response, Reconciled, ResultSource, ScoreSynthesizer};
pub use tiers::{classify, tier_label, TierDefinition, TIERS};

pub const SCORE_MIN: f64 = 1.0;
pub const SCORE_MAX: f64 = 10.0;
/// Used wherever a score is missing or unusable
pub const NEUTRAL_SCORE: f64 = 5.0;

/// Clamp into [`SCORE_MIN`, `SCORE_MAX`]. NaN maps to [`NEUTRAL_SCORE`].
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        return NEUTRAL_SCORE;
    }
    score.clamp(SCORE_MIN, SCORE_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_score() {
        assert_eq!(clamp_score(999.0), SCORE_MAX);
        assert_eq!(clamp_score(-5.0), SCORE_MIN);
        assert_eq!(clamp_score(f64::NEG_INFINITY), SCORE_MIN);
        assert_eq!(clamp_score(f64::NAN), NEUTRAL_SCORE);
        assert_eq!(clamp_score(7.25), 7.25);
    }
}
