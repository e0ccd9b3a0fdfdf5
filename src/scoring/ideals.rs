//! Ideal reference bands for each measurement

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IdealRange {
    pub key: &'static str,
    pub min: f64,
    /// `None` for open-ended bands (symmetry)
    pub max: Option<f64>,
    pub unit: &'static str,
    pub description: &'static str,
}

impl IdealRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && self.max.map_or(true, |max| value <= max)
    }
}

pub static IDEAL_RANGES: [IdealRange; 8] = [
    IdealRange {
        key: "canthal_tilt",
        min: 4.0,
        max: Some(8.0),
        unit: "deg",
        description: "Angle between inner and outer corners of the eye",
    },
    IdealRange {
        key: "bigonial_bizygomatic_ratio",
        min: 0.75,
        max: Some(0.80),
        unit: "ratio",
        description: "Jaw width relative to cheekbone width",
    },
    IdealRange {
        key: "gonial_angle",
        min: 125.0,
        max: Some(130.0),
        unit: "deg",
        description: "Angle of the jaw bone at the gonion",
    },
    IdealRange {
        key: "midface_ratio",
        min: 0.43,
        max: Some(0.44),
        unit: "ratio",
        description: "Proportion of midface to total face height",
    },
    IdealRange {
        key: "nasofrontal_angle",
        min: 130.0,
        max: Some(135.0),
        unit: "deg",
        description: "Angle between forehead and nose bridge",
    },
    // each third within 0.333 +/- 0.03
    IdealRange {
        key: "facial_thirds",
        min: 0.303,
        max: Some(0.363),
        unit: "ratio",
        description: "Upper, middle, lower face proportions",
    },
    IdealRange {
        key: "symmetry",
        min: 0.95,
        max: None,
        unit: "ratio",
        description: "How symmetrical the face is (1.0 = perfect)",
    },
    IdealRange {
        key: "ipd_face_ratio",
        min: 0.42,
        max: Some(0.46),
        unit: "ratio",
        description: "Eye spacing relative to face width",
    },
];

pub fn ideal_range(key: &str) -> Option<&'static IdealRange> {
    IDEAL_RANGES.iter().find(|range| range.key == key)
}
