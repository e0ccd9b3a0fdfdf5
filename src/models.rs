//! Core data models for adamscore
//!
//! Records produced per request: the geometric measurements taken from a
//! landmark set and the final analysis result built from them. Both are
//! plain values, created once and never mutated afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::{clamp_score, NEUTRAL_SCORE};

/// Geometric measurements computed from one (or two) landmark sets.
///
/// Angles are in degrees, ratios are unitless. `facial_thirds` holds the
/// upper, middle and lower spans normalised to sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometricMeasurements {
    /// Positive = outer canthus higher than inner
    pub canthal_tilt: f64,
    pub bigonial_bizygomatic_ratio: f64,
    pub midface_ratio: f64,
    pub gonial_angle: f64,
    pub nasofrontal_angle: f64,
    pub facial_thirds: [f64; 3],
    /// 0.0 - 1.0, higher is more symmetric
    pub symmetry_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipd_face_ratio: Option<f64>,
}

impl Default for GeometricMeasurements {
    /// The documented per-field defaults used when landmarks are missing
    fn default() -> Self {
        use crate::geometry::measurements::*;

        Self {
            canthal_tilt: DEFAULT_CANTHAL_TILT,
            bigonial_bizygomatic_ratio: DEFAULT_BIGONIAL_RATIO,
            midface_ratio: DEFAULT_MIDFACE_RATIO,
            gonial_angle: DEFAULT_GONIAL_ANGLE,
            nasofrontal_angle: DEFAULT_NASOFRONTAL_ANGLE,
            facial_thirds: DEFAULT_FACIAL_THIRDS,
            symmetry_score: DEFAULT_SYMMETRY,
            ipd_face_ratio: Some(DEFAULT_IPD_RATIO),
        }
    }
}

impl GeometricMeasurements {
    pub fn upper_third(&self) -> f64 {
        self.facial_thirds[0]
    }

    pub fn middle_third(&self) -> f64 {
        self.facial_thirds[1]
    }

    pub fn lower_third(&self) -> f64 {
        self.facial_thirds[2]
    }
}

/// Five sub-scores used for multi-axis (radar chart) reporting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadarScores {
    pub eyes: f64,
    pub jaw: f64,
    pub midface: f64,
    pub symmetry: f64,
    pub harmony: f64,
}

impl RadarScores {
    /// Build radar scores, clamping every axis into [1, 10]
    pub fn clamped(eyes: f64, jaw: f64, midface: f64, symmetry: f64, harmony: f64) -> Self {
        Self {
            eyes: clamp_score(eyes),
            jaw: clamp_score(jaw),
            midface: clamp_score(midface),
            symmetry: clamp_score(symmetry),
            harmony: clamp_score(harmony),
        }
    }

    pub fn as_array(&self) -> [(&'static str, f64); 5] {
        [
            ("eyes", self.eyes),
            ("jaw", self.jaw),
            ("midface", self.midface),
            ("symmetry", self.symmetry),
            ("harmony", self.harmony),
        ]
    }
}

impl Default for RadarScores {
    fn default() -> Self {
        Self::clamped(
            NEUTRAL_SCORE,
            NEUTRAL_SCORE,
            NEUTRAL_SCORE,
            NEUTRAL_SCORE,
            NEUTRAL_SCORE,
        )
    }
}

/// Complete, validated analysis for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Overall score in [1.0, 10.0]
    pub score: f64,
    pub tier: String,
    /// Narrative paragraph
    pub analysis: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub advice: String,
    #[serde(rename = "radar_data")]
    pub radar: RadarScores,
    pub measurements: GeometricMeasurements,
}

/// Envelope written by the CLI for machine consumption
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub success: bool,
    pub data: AnalysisResult,
    pub timestamp: DateTime<Utc>,
}

impl AnalysisResponse {
    pub fn new(data: AnalysisResult) -> Self {
        Self {
            success: true,
            data,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radar_scores_are_clamped() {
        let radar = RadarScores::clamped(-5.0, 0.0, 11.0, 7.5, 999.0);
        assert_eq!(radar.eyes, 1.0);
        assert_eq!(radar.jaw, 1.0);
        assert_eq!(radar.midface, 10.0);
        assert_eq!(radar.symmetry, 7.5);
        assert_eq!(radar.harmony, 10.0);
    }

    #[test]
    fn test_default_measurements_thirds_sum_to_one() {
        let m = GeometricMeasurements::default();
        let sum: f64 = m.facial_thirds.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert_eq!(m.ipd_face_ratio, Some(0.44));
    }

    #[test]
    fn test_result_serializes_radar_as_radar_data() {
        let result = AnalysisResult {
            score: 6.5,
            tier: "HTN".into(),
            analysis: String::new(),
            strengths: vec![],
            weaknesses: vec![],
            advice: String::new(),
            radar: RadarScores::default(),
            measurements: GeometricMeasurements::default(),
        };
        let json = serde_json::to_value(&result).expect("serialize result");
        assert_eq!(json["radar_data"]["eyes"], 5.0);
        assert_eq!(json["measurements"]["facial_thirds"][1], 0.34);
    }

    #[test]
    fn test_measurements_without_ipd_deserialize() {
        let json = r#"{
            "canthal_tilt": 5.2,
            "bigonial_bizygomatic_ratio": 0.77,
            "midface_ratio": 0.44,
            "gonial_angle": 127.3,
            "nasofrontal_angle": 132.5,
            "facial_thirds": [0.32, 0.35, 0.33],
            "symmetry_score": 0.92
        }"#;
        let m: GeometricMeasurements = serde_json::from_str(json).expect("parse measurements");
        assert_eq!(m.ipd_face_ratio, None);
        assert_eq!(m.middle_third(), 0.35);
    }
}
