//! Distance and angle primitives shared by the measurements

use crate::landmarks::LandmarkPoint;
use nalgebra::Vector2;

/// Angle reported when one arm of an angle has zero length (zero cosine)
pub const DEGENERATE_ANGLE: f64 = 90.0;

/// Euclidean distance in the image plane (x, y)
pub fn distance_2d(p1: &LandmarkPoint, p2: &LandmarkPoint) -> f64 {
    (p2.xy() - p1.xy()).norm()
}

/// Euclidean distance including relative depth
pub fn distance_3d(p1: &LandmarkPoint, p2: &LandmarkPoint) -> f64 {
    nalgebra::distance(p1, p2)
}

/// Angle at `p2` between the rays `p2 -> p1` and `p2 -> p3`, in degrees.
///
/// Always within [0, 180] and symmetric under swapping `p1` and `p3`. The
/// cosine is clamped before `acos` so rounding noise on nearly collinear
/// points cannot produce NaN.
pub fn angle_at(p1: &LandmarkPoint, p2: &LandmarkPoint, p3: &LandmarkPoint) -> f64 {
    let v1: Vector2<f64> = p1.xy() - p2.xy();
    let v2: Vector2<f64> = p3.xy() - p2.xy();

    let cos = v1.dot(&v2) / (v1.norm() * v2.norm());
    if !cos.is_finite() {
        return DEGENERATE_ANGLE;
    }
    cos.clamp(-1.0, 1.0).acos().to_degrees()
}

/// Midpoint of two points in the image plane
pub fn midpoint_2d(p1: &LandmarkPoint, p2: &LandmarkPoint) -> (f64, f64) {
    ((p1.x + p2.x) / 2.0, (p1.y + p2.y) / 2.0)
}

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
