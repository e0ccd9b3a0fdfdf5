//! Facial geometry engine
//!
//! Pure functions turning landmark sets into [`GeometricMeasurements`].
//!
//! # Measurements
//!
//! ```text
//! canthal_tilt                front   mean per-eye atan2 of canthus line       default 0.0
//! bigonial_bizygomatic_ratio  front   gonion width / zygion width             default 0.77
//! midface_ratio               front   pupil->upper lip / face height          default 0.44
//! gonial_angle                side    profile heuristic, clamped [115, 145]   default 128.0
//!                             front   angle(jaw_1, gonion, menton)            default 128.0
//! nasofrontal_angle           either  angle(glabella, nasion, bridge_1)       default 132.0
//! facial_thirds               front   normalised vertical spans               default (.33,.34,.33)
//! symmetry_score              front   mean min/max midline distance ratio     default 0.9
//! ipd_face_ratio              front   pupil distance / zygion width           default 0.44
//! ```
//!
//! Nothing here fails: missing landmarks degrade individual fields to their
//! defaults and the record is always complete.

pub mod measurements;
pub mod primitives;


pub use primitives::{angle_at, distance_2d, distance_3d, round_to};

use crate::landmarks::{LandmarkLookup, EXPECTED_LANDMARKS};
use crate::models::GeometricMeasurements;
use tracing::debug;

/// Compute every measurement.
///
/// Angles (gonial, nasofrontal) come from the side profile when one is
/// supplied and non-empty, otherwise from the frontal set. Everything else is
/// always measured on the frontal set. Values are rounded to display
/// precision: tilt to 2 decimals, other angles to 1, ratios to 3.
pub fn calculate_all_measurements<L>(front: &L, side: Option<&L>) -> GeometricMeasurements
where
    L: LandmarkLookup + ?Sized,
{
    if front.len() < EXPECTED_LANDMARKS {
        debug!(
            "Front landmark set has {} of {} points; missing measurements use defaults",
            front.len(),
            EXPECTED_LANDMARKS
        );
    }

    let side = side.filter(|s| !s.is_empty());
    let (gonial_angle, nasofrontal_angle) = match side {
        Some(profile) => {
            debug!("Measuring jaw and nasofrontal angles on side profile ({} points)", profile.len());
            (
                measurements::gonial_angle_profile(profile),
                measurements::nasofrontal_angle(profile),
            )
        }
        None => (
            measurements::gonial_angle_front(front),
            measurements::nasofrontal_angle(front),
        ),
    };

    let thirds = measurements::facial_thirds(front);

    GeometricMeasurements {
        canthal_tilt: round_to(measurements::canthal_tilt(front), 2),
        bigonial_bizygomatic_ratio: round_to(measurements::bigonial_bizygomatic_ratio(front), 3),
        midface_ratio: round_to(measurements::midface_ratio(front), 3),
        gonial_angle: round_to(gonial_angle, 1),
        nasofrontal_angle: round_to(nasofrontal_angle, 1),
        facial_thirds: thirds.map(|t| round_to(t, 3)),
        symmetry_score: round_to(measurements::symmetry_score(front), 3),
        ipd_face_ratio: Some(round_to(measurements::ipd_face_ratio(front), 3)),
    }
}
