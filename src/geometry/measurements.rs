//! Individual facial measurements
//!
//! Every function here is fail-soft: when a landmark it needs is absent it
//! returns the documented default for that measurement instead of an error,
//! so one missing landmark group never takes down the whole analysis.

use super::primitives::{angle_at, distance_2d, midpoint_2d};
use crate::landmarks::{LandmarkLookup, LandmarkName, LandmarkPoint};

pub const DEFAULT_CANTHAL_TILT: f64 = 0.0;
pub const DEFAULT_BIGONIAL_RATIO: f64 = 0.77;
pub const DEFAULT_MIDFACE_RATIO: f64 = 0.44;
pub const DEFAULT_GONIAL_ANGLE: f64 = 128.0;
pub const DEFAULT_NASOFRONTAL_ANGLE: f64 = 132.0;
pub const DEFAULT_FACIAL_THIRDS: [f64; 3] = [0.33, 0.34, 0.33];
pub const DEFAULT_SYMMETRY: f64 = 0.9;
pub const DEFAULT_IPD_RATIO: f64 = 0.44;

/// Bounds of the profile gonial-angle estimate
pub const PROFILE_GONIAL_MIN: f64 = 115.0;
pub const PROFILE_GONIAL_MAX: f64 = 145.0;

/// Left/right pairs compared for bilateral symmetry
pub const SYMMETRY_PAIRS: [(LandmarkName, LandmarkName); 6] = [
    (LandmarkName::LeftInnerCanthus, LandmarkName::RightInnerCanthus),
    (LandmarkName::LeftOuterCanthus, LandmarkName::RightOuterCanthus),
    (LandmarkName::LeftGonion, LandmarkName::RightGonion),
    (LandmarkName::LeftZygion, LandmarkName::RightZygion),
    (LandmarkName::LeftEyebrowInner, LandmarkName::RightEyebrowInner),
    (LandmarkName::LeftEyebrowOuter, LandmarkName::RightEyebrowOuter),
];

/// Canthal tilt in degrees, averaged over both eyes.
///
/// Image y grows downwards, so `inner.y - outer.y` is positive when the outer
/// corner sits higher. The horizontal leg is taken as an absolute width so
/// the left and right eye (which open towards opposite sides of the image)
/// share one sign convention.
pub fn canthal_tilt<L: LandmarkLookup + ?Sized>(set: &L) -> f64 {
    use LandmarkName::*;

    let (Some(left_inner), Some(left_outer), Some(right_inner), Some(right_outer)) = (
        set.landmark(LeftInnerCanthus),
        set.landmark(LeftOuterCanthus),
        set.landmark(RightInnerCanthus),
        set.landmark(RightOuterCanthus),
    ) else {
        return DEFAULT_CANTHAL_TILT;
    };

    (eye_tilt(&left_inner, &left_outer) + eye_tilt(&right_inner, &right_outer)) / 2.0
}

fn eye_tilt(inner: &LandmarkPoint, outer: &LandmarkPoint) -> f64 {
    (inner.y - outer.y)
        .atan2((outer.x - inner.x).abs())
        .to_degrees()
}

/// Jaw width at the gonions over cheekbone width at the zygions
pub fn bigonial_bizygomatic_ratio<L: LandmarkLookup + ?Sized>(set: &L) -> f64 {
    use LandmarkName::*;

    let (Some(left_gonion), Some(right_gonion), Some(left_zygion), Some(right_zygion)) = (
        set.landmark(LeftGonion),
        set.landmark(RightGonion),
        set.landmark(LeftZygion),
        set.landmark(RightZygion),
    ) else {
        return DEFAULT_BIGONIAL_RATIO;
    };

    let bizygomatic = distance_2d(&left_zygion, &right_zygion);
    if bizygomatic == 0.0 {
        return DEFAULT_BIGONIAL_RATIO;
    }
    distance_2d(&left_gonion, &right_gonion) / bizygomatic
}

/// Pupil-to-upper-lip height over total face height.
///
/// Pupil level is approximated from the left eye corners. Face height runs
/// from the forehead top to the menton; without a forehead point it is
/// estimated as 1.5x the nasion-to-menton span. The nasion is required
/// either way.
pub fn midface_ratio<L: LandmarkLookup + ?Sized>(set: &L) -> f64 {
    use LandmarkName::*;

    let (Some(nasion), Some(upper_lip), Some(chin), Some(inner), Some(outer)) = (
        set.landmark(Nasion),
        set.landmark(UpperLip),
        set.landmark(ChinMenton),
        set.landmark(LeftInnerCanthus),
        set.landmark(LeftOuterCanthus),
    ) else {
        return DEFAULT_MIDFACE_RATIO;
    };

    let total_height = match set.landmark(ForeheadTop) {
        Some(forehead) => (chin.y - forehead.y).abs(),
        None => (chin.y - nasion.y).abs() * 1.5,
    };
    if total_height == 0.0 {
        return DEFAULT_MIDFACE_RATIO;
    }

    let (_, pupil_y) = midpoint_2d(&inner, &outer);
    (upper_lip.y - pupil_y).abs() / total_height
}

/// Gonial angle from a side profile.
///
/// This is a coarse heuristic, not a true measurement: profile landmarks
/// for the ramus are not available, so the slope of the gonion-to-menton
/// line is folded into a 130 degree baseline and clamped to a plausible
/// range.
pub fn gonial_angle_profile<L: LandmarkLookup + ?Sized>(set: &L) -> f64 {
    let (Some(gonion), Some(chin)) = (
        set.landmark(LandmarkName::LeftGonion),
        set.landmark(LandmarkName::ChinMenton),
    ) else {
        return DEFAULT_GONIAL_ANGLE;
    };

    let dx = (chin.x - gonion.x).abs();
    let dy = (chin.y - gonion.y).abs();

    let angle = if dy > 0.0 {
        130.0 - (dx / dy).atan().to_degrees()
    } else {
        DEFAULT_GONIAL_ANGLE
    };
    angle.clamp(PROFILE_GONIAL_MIN, PROFILE_GONIAL_MAX)
}

/// Gonial angle from a frontal view: angle at the left gonion between the
/// upper jaw contour and the menton. Both gonions must be present.
pub fn gonial_angle_front<L: LandmarkLookup + ?Sized>(set: &L) -> f64 {
    use LandmarkName::*;

    let (Some(gonion), Some(_), Some(chin), Some(jaw_upper)) = (
        set.landmark(LeftGonion),
        set.landmark(RightGonion),
        set.landmark(ChinMenton),
        set.landmark(LeftJaw1),
    ) else {
        return DEFAULT_GONIAL_ANGLE;
    };

    angle_at(&jaw_upper, &gonion, &chin)
}

/// Angle at the nasion between glabella and the upper nose bridge
pub fn nasofrontal_angle<L: LandmarkLookup + ?Sized>(set: &L) -> f64 {
    use LandmarkName::*;

    let (Some(glabella), Some(nasion), Some(bridge)) = (
        set.landmark(Glabella),
        set.landmark(Nasion),
        set.landmark(NoseBridge1),
    ) else {
        return DEFAULT_NASOFRONTAL_ANGLE;
    };

    angle_at(&glabella, &nasion, &bridge)
}

/// Upper (forehead -> glabella), middle (glabella -> subnasale) and lower
/// (subnasale -> menton) thirds, normalised to sum to 1.0.
///
/// Without a forehead point the upper span is estimated as 0.3x the
/// glabella-to-menton height.
pub fn facial_thirds<L: LandmarkLookup + ?Sized>(set: &L) -> [f64; 3] {
    use LandmarkName::*;

    let (Some(glabella), Some(subnasale), Some(chin)) = (
        set.landmark(Glabella),
        set.landmark(Subnasale),
        set.landmark(ChinMenton),
    ) else {
        return DEFAULT_FACIAL_THIRDS;
    };

    let upper = match set.landmark(ForeheadTop) {
        Some(forehead) => (glabella.y - forehead.y).abs(),
        None => (glabella.y - chin.y).abs() * 0.3,
    };
    let middle = (subnasale.y - glabella.y).abs();
    let lower = (chin.y - subnasale.y).abs();

    let total = upper + middle + lower;
    if total == 0.0 {
        return DEFAULT_FACIAL_THIRDS;
    }
    [upper / total, middle / total, lower / total]
}

/// Mean bilateral symmetry over [`SYMMETRY_PAIRS`].
///
/// The midline is the mean x of nose tip and menton. Each pair scores
/// `min(dl, dr) / max(dl, dr)` on its horizontal distances to the midline.
/// A pair with both points exactly on the midline carries no left/right
/// information and is left out of the mean; if no pair contributes, the
/// default is returned.
pub fn symmetry_score<L: LandmarkLookup + ?Sized>(set: &L) -> f64 {
    let (Some(nose_tip), Some(chin)) = (
        set.landmark(LandmarkName::NoseTip),
        set.landmark(LandmarkName::ChinMenton),
    ) else {
        return DEFAULT_SYMMETRY;
    };
    let midline_x = (nose_tip.x + chin.x) / 2.0;

    let ratios: Vec<f64> = SYMMETRY_PAIRS
        .iter()
        .filter_map(|&(left, right)| {
            let left_dist = (set.landmark(left)?.x - midline_x).abs();
            let right_dist = (set.landmark(right)?.x - midline_x).abs();
            let max = left_dist.max(right_dist);
            (max > 0.0).then(|| left_dist.min(right_dist) / max)
        })
        .collect();

    if ratios.is_empty() {
        return DEFAULT_SYMMETRY;
    }
    ratios.iter().sum::<f64>() / ratios.len() as f64
}

/// Inter-pupillary distance over bizygomatic width.
///
/// Pupils are approximated as the midpoint of each eye's canthi.
pub fn ipd_face_ratio<L: LandmarkLookup + ?Sized>(set: &L) -> f64 {
    use LandmarkName::*;

    let (
        Some(left_inner),
        Some(left_outer),
        Some(right_inner),
        Some(right_outer),
        Some(left_zygion),
        Some(right_zygion),
    ) = (
        set.landmark(LeftInnerCanthus),
        set.landmark(LeftOuterCanthus),
        set.landmark(RightInnerCanthus),
        set.landmark(RightOuterCanthus),
        set.landmark(LeftZygion),
        set.landmark(RightZygion),
    )
    else {
        return DEFAULT_IPD_RATIO;
    };

    let face_width = distance_2d(&left_zygion, &right_zygion);
    if face_width == 0.0 {
        return DEFAULT_IPD_RATIO;
    }

    let (left_pupil_x, _) = midpoint_2d(&left_inner, &left_outer);
    let (right_pupil_x, _) = midpoint_2d(&right_inner, &right_outer);
    (right_pupil_x - left_pupil_x).abs() / face_width
}
