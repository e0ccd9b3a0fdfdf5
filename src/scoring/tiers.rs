//! Score tiers
//!
//! Seven contiguous buckets covering [1.0, 10.0]. Every range is half-open
//! except the top one, which also owns 10.0, so each in-range score belongs
//! to exactly one tier.

use serde::Serialize;

/// Label used when a score cannot be classified
pub const UNKNOWN_TIER: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TierDefinition {
    pub key: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    /// Inclusive lower bound
    pub min: f64,
    /// Exclusive upper bound, unless `max_inclusive`
    pub max: f64,
    pub max_inclusive: bool,
}

impl TierDefinition {
    pub fn contains(&self, score: f64) -> bool {
        score >= self.min
            && if self.max_inclusive {
                score <= self.max
            } else {
                score < self.max
            }
    }

    /// Range as shown to people, e.g. "6.0-6.9"
    pub fn display_range(&self) -> String {
        if self.max_inclusive {
            format!("{:.1}-{:.1}", self.min, self.max)
        } else {
            format!("{:.1}-{:.1}", self.min, self.max - 0.1)
        }
    }
}

/// Lowest to highest
pub static TIERS: [TierDefinition; 7] = [
    TierDefinition {
        key: "sub3",
        label: "Sub 3",
        description: "Severe facial underdevelopment, multiple failos",
        min: 1.0,
        max: 3.0,
        max_inclusive: false,
    },
    TierDefinition {
        key: "sub5",
        label: "Sub 5",
        description: "Below average, notable failos present",
        min: 3.0,
        max: 5.0,
        max_inclusive: false,
    },
    TierDefinition {
        key: "normie",
        label: "Normie",
        description: "Average appearance, unremarkable features",
        min: 5.0,
        max: 6.0,
        max_inclusive: false,
    },
    TierDefinition {
        key: "htn",
        label: "HTN",
        description: "High-tier Normie, some attractive features",
        min: 6.0,
        max: 7.0,
        max_inclusive: false,
    },
    TierDefinition {
        key: "chadlite",
        label: "Chadlite",
        description: "Attractive, mostly positive features",
        min: 7.0,
        max: 8.0,
        max_inclusive: false,
    },
    TierDefinition {
        key: "chad",
        label: "Chad",
        description: "Very attractive, minimal failos",
        min: 8.0,
        max: 9.0,
        max_inclusive: false,
    },
    TierDefinition {
        key: "adam",
        label: "Adam",
        description: "Near-perfect facial harmony and aesthetics",
        min: 9.0,
        max: 10.0,
        max_inclusive: true,
    },
];

/// Tier owning `score`, or `None` outside [1.0, 10.0] (and for NaN)
pub fn classify(score: f64) -> Option<&'static TierDefinition> {
    TIERS.iter().find(|tier| tier.contains(score))
}

/// Label for `score`, [`UNKNOWN_TIER`] when out of range
pub fn tier_label(score: f64) -> &'static str {
    classify(score).map_or(UNKNOWN_TIER, |tier| tier.label)
}
