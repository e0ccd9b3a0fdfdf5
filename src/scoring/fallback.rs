//! Rule-based scorer used when no usable narrative is available
//!
//! Five dimensions each score 9, 7 or 5 depending on how close the
//! measurement is to its ideal band. The overall score is their plain mean.
//! Output depends on the measurements alone, so identical input always gives
//! an identical result.

use super::tiers::{classify, UNKNOWN_TIER};
use crate::geometry::round_to;
use crate::models::{AnalysisResult, GeometricMeasurements, RadarScores};
use tracing::debug;

pub const NO_STRENGTHS_PLACEHOLDER: &str = "Analysis in progress";
pub const NO_WEAKNESSES_PLACEHOLDER: &str = "No major issues detected";

pub const FALLBACK_ADVICE: &str = "Consider maintaining good posture and practicing proper tongue \
posture (mewing) for long-term facial development. A lower body fat percentage can help maximize \
facial definition. These scores are based on geometric measurements and should be taken as \
informational rather than definitive.";

const IDEAL: f64 = 9.0;
const NEAR: f64 = 7.0;
const FAR: f64 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub enum Note {
    Strength(String),
    Weakness(String),
}

/// Score for one dimension plus the remark it contributes, if any
#[derive(Debug, Clone, PartialEq)]
pub struct Dimension {
    pub name: &'static str,
    pub score: f64,
    pub note: Option<Note>,
}

impl Dimension {
    fn new(name: &'static str, score: f64, note: Option<Note>) -> Self {
        Self { name, score, note }
    }
}

fn eyes(tilt: f64) -> Dimension {
    let (score, note) = if (4.0..=8.0).contains(&tilt) {
        (
            IDEAL,
            Some(Note::Strength(format!(
                "Positive canthal tilt ({:.1}°) creating hunter eye appearance",
                tilt
            ))),
        )
    } else if (0.0..4.0).contains(&tilt) {
        (
            NEAR,
            Some(Note::Strength(format!(
                "Neutral to slightly positive canthal tilt ({:.1}°)",
                tilt
            ))),
        )
    } else if tilt < 0.0 {
        (
            FAR,
            Some(Note::Weakness(format!(
                "Negative canthal tilt ({:.1}°) may appear tired",
                tilt
            ))),
        )
    } else {
        // steeper than the ideal band
        (NEAR, None)
    };
    Dimension::new("canthal_tilt", score, note)
}

fn jaw_width(ratio: f64) -> Dimension {
    let pct = ratio * 100.0;
    if (0.75..=0.80).contains(&ratio) {
        Dimension::new(
            "bigonial_bizygomatic_ratio",
            IDEAL,
            Some(Note::Strength(format!("Ideal jaw-to-cheekbone ratio ({:.0}%)", pct))),
        )
    } else if (0.70..0.75).contains(&ratio) || (ratio > 0.80 && ratio <= 0.85) {
        Dimension::new("bigonial_bizygomatic_ratio", NEAR, None)
    } else {
        Dimension::new(
            "bigonial_bizygomatic_ratio",
            FAR,
            Some(Note::Weakness(format!(
                "Jaw-to-cheekbone ratio ({:.0}%) outside ideal range",
                pct
            ))),
        )
    }
}

fn jaw_angle(angle: f64) -> Dimension {
    if (125.0..=130.0).contains(&angle) {
        Dimension::new(
            "gonial_angle",
            IDEAL,
            Some(Note::Strength(format!("Well-defined gonial angle ({:.0}°)", angle))),
        )
    } else if (120.0..125.0).contains(&angle) || (angle > 130.0 && angle <= 135.0) {
        Dimension::new("gonial_angle", NEAR, None)
    } else {
        Dimension::new(
            "gonial_angle",
            FAR,
            Some(Note::Weakness(format!(
                "Gonial angle ({:.0}°) outside ideal range",
                angle
            ))),
        )
    }
}

fn midface(ratio: f64) -> Dimension {
    if (0.43..=0.44).contains(&ratio) {
        Dimension::new(
            "midface_ratio",
            IDEAL,
            Some(Note::Strength("Golden ratio midface proportions".to_string())),
        )
    } else if (0.40..0.43).contains(&ratio) || (ratio > 0.44 && ratio <= 0.47) {
        Dimension::new("midface_ratio", NEAR, None)
    } else {
        Dimension::new(
            "midface_ratio",
            FAR,
            Some(Note::Weakness(format!(
                "Midface ratio ({:.0}%) deviates from ideal",
                ratio * 100.0
            ))),
        )
    }
}

fn symmetry(score: f64) -> Dimension {
    let pct = score * 100.0;
    let (value, note) = if score >= 0.95 {
        (IDEAL, Note::Strength(format!("Excellent facial symmetry ({:.0}%)", pct)))
    } else if score >= 0.90 {
        (NEAR, Note::Strength(format!("Good facial symmetry ({:.0}%)", pct)))
    } else {
        (FAR, Note::Weakness(format!("Facial asymmetry detected ({:.0}%)", pct)))
    };
    Dimension::new("symmetry_score", value, Some(note))
}

/// Per-dimension scores in fixed order: eyes, jaw width, jaw angle,
/// midface, symmetry
pub fn score_dimensions(m: &GeometricMeasurements) -> [Dimension; 5] {
    [
        eyes(m.canthal_tilt),
        jaw_width(m.bigonial_bizygomatic_ratio),
        jaw_angle(m.gonial_angle),
        midface(m.midface_ratio),
        symmetry(m.symmetry_score),
    ]
}

/// Build a complete result from the measurements alone
pub fn fallback_analysis(m: &GeometricMeasurements) -> AnalysisResult {
    let dimensions = score_dimensions(m);
    let [eyes, jaw_width, jaw_angle, midface, symmetry] = &dimensions;

    let mean = dimensions.iter().map(|d| d.score).sum::<f64>() / dimensions.len() as f64;
    let overall = round_to(mean, 1);

    let (label, description) = classify(overall)
        .map_or((UNKNOWN_TIER, "Score out of range"), |tier| {
            (tier.label, tier.description)
        });

    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();
    for dimension in &dimensions {
        match &dimension.note {
            Some(Note::Strength(text)) => strengths.push(text.clone()),
            Some(Note::Weakness(text)) => weaknesses.push(text.clone()),
            None => {}
        }
    }

    debug!(
        "Fallback scores: eyes={} jaw_width={} jaw_angle={} midface={} symmetry={} -> {:.1} ({})",
        eyes.score, jaw_width.score, jaw_angle.score, midface.score, symmetry.score, overall, label
    );

    let analysis = format!(
        "Based on the geometric analysis of your facial features, you have achieved an overall \
         score of {:.1}/10, placing you in the {} tier. {}. Your face shows {} notable strengths \
         and {} areas that could be improved.",
        overall,
        label,
        description,
        strengths.len(),
        weaknesses.len()
    );

    if strengths.is_empty() {
        strengths.push(NO_STRENGTHS_PLACEHOLDER.to_string());
    }
    if weaknesses.is_empty() {
        weaknesses.push(NO_WEAKNESSES_PLACEHOLDER.to_string());
    }

    AnalysisResult {
        score: overall,
        tier: label.to_string(),
        analysis,
        strengths,
        weaknesses,
        advice: FALLBACK_ADVICE.to_string(),
        radar: RadarScores::clamped(
            eyes.score,
            (jaw_width.score + jaw_angle.score) / 2.0,
            midface.score,
            symmetry.score,
            overall,
        ),
        measurements: *m,
    }
}
